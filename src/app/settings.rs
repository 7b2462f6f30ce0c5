use eframe::egui::Color32;

/// Relationship categories that can generate edges. The closed set keeps
/// per-category force dispatch out of stringly-typed defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LinkCategory {
    Category,
    Author,
    Issue,
}

impl LinkCategory {
    pub const ALL: [LinkCategory; 3] = [
        LinkCategory::Category,
        LinkCategory::Author,
        LinkCategory::Issue,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LinkCategory::Category => "Content type",
            LinkCategory::Author => "Author",
            LinkCategory::Issue => "Issue",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategorySettings {
    pub enabled: bool,
    pub strength: f32,
    pub distance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualSettings {
    pub width: f32,
    pub opacity: f32,
    pub color: Color32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RepulsionSettings {
    pub strength: f32,
    pub max_distance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionSettings {
    pub radius: f32,
    pub strength: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsSettings {
    pub repulsion: RepulsionSettings,
    pub collision: CollisionSettings,
    pub center_force: bool,
}

/// The single configuration object. The settings panel hands the engine a
/// complete new value on every control change; nothing mutates it in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkSettings {
    pub category: CategorySettings,
    pub author: CategorySettings,
    pub issue: CategorySettings,
    pub visual: VisualSettings,
    pub physics: PhysicsSettings,
}

impl LinkSettings {
    pub fn for_category(&self, category: LinkCategory) -> &CategorySettings {
        match category {
            LinkCategory::Category => &self.category,
            LinkCategory::Author => &self.author,
            LinkCategory::Issue => &self.issue,
        }
    }

    pub fn for_category_mut(&mut self, category: LinkCategory) -> &mut CategorySettings {
        match category {
            LinkCategory::Category => &mut self.category,
            LinkCategory::Author => &mut self.author,
            LinkCategory::Issue => &mut self.issue,
        }
    }
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            category: CategorySettings {
                enabled: false,
                strength: 0.1,
                distance: 100.0,
            },
            author: CategorySettings {
                enabled: true,
                strength: 0.2,
                distance: 40.0,
            },
            issue: CategorySettings {
                enabled: true,
                strength: 1.0,
                distance: 20.0,
            },
            visual: VisualSettings {
                width: 0.1,
                opacity: 0.0,
                color: Color32::from_rgb(0xd7, 0xd7, 0xd7),
            },
            physics: PhysicsSettings {
                repulsion: RepulsionSettings {
                    strength: -400.0,
                    max_distance: 220.0,
                },
                collision: CollisionSettings {
                    radius: 1.0,
                    strength: 0.6,
                },
                center_force: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_lookup_is_consistent_with_fields() {
        let mut settings = LinkSettings::default();
        settings.for_category_mut(LinkCategory::Issue).distance = 55.0;

        assert_eq!(settings.issue.distance, 55.0);
        assert_eq!(
            settings.for_category(LinkCategory::Author).strength,
            settings.author.strength
        );
    }

    #[test]
    fn defaults_match_the_shipped_configuration() {
        let settings = LinkSettings::default();
        assert!(!settings.category.enabled);
        assert!(settings.author.enabled);
        assert!(settings.issue.enabled);
        assert_eq!(settings.physics.repulsion.strength, -400.0);
        assert!(settings.physics.center_force);
    }
}
