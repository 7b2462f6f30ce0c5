use super::settings::{LinkCategory, LinkSettings};

/// Resting spring parameters for one edge category.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkForceParams {
    pub distance: f32,
    pub strength: f32,
}

/// Fallback for an edge whose category cannot be resolved. Near-zero
/// strength keeps such an edge inert instead of propagating garbage.
pub const FALLBACK_LINK_PARAMS: LinkForceParams = LinkForceParams {
    distance: 80.0,
    strength: 0.0,
};

/// Global physics parameters plus the per-category spring lookup, derived
/// from one `LinkSettings` snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
    link: [LinkForceParams; 3],
    pub repulsion_strength: f32,
    pub repulsion_max_distance: f32,
    pub collision_radius: f32,
    pub collision_strength: f32,
    pub center_force: bool,
}

fn category_index(category: LinkCategory) -> usize {
    match category {
        LinkCategory::Category => 0,
        LinkCategory::Author => 1,
        LinkCategory::Issue => 2,
    }
}

impl ForceParams {
    pub fn from_settings(settings: &LinkSettings) -> Self {
        let mut link = [FALLBACK_LINK_PARAMS; 3];
        for category in LinkCategory::ALL {
            let block = settings.for_category(category);
            link[category_index(category)] = LinkForceParams {
                distance: block.distance,
                // Disabled categories rest at zero strength. The link
                // generator already omits their edges; this guards the
                // same invariant from the force side.
                strength: if block.enabled { block.strength } else { 0.0 },
            };
        }

        Self {
            link,
            repulsion_strength: settings.physics.repulsion.strength,
            repulsion_max_distance: settings.physics.repulsion.max_distance,
            collision_radius: settings.physics.collision.radius,
            collision_strength: settings.physics.collision.strength,
            center_force: settings.physics.center_force,
        }
    }

    pub fn link_params(&self, category: Option<LinkCategory>) -> LinkForceParams {
        match category {
            Some(category) => self.link[category_index(category)],
            None => FALLBACK_LINK_PARAMS,
        }
    }
}
