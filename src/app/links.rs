use std::collections::HashMap;

use crate::content::ContentNode;

use super::settings::{LinkCategory, LinkSettings};

/// One derived relationship edge. Edges are disposable: every settings
/// change regenerates the full list from scratch, nothing is patched.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub category: LinkCategory,
    /// Bucket key the pair shared (kind, author slug, or issue id).
    pub group: String,
    /// Strength/distance effective at generation time.
    pub strength: f32,
    pub distance: f32,
}

fn category_key<'node>(node: &'node ContentNode, category: LinkCategory) -> Option<&'node str> {
    match category {
        LinkCategory::Category => Some(node.kind_key()),
        LinkCategory::Author => node.author.as_deref(),
        LinkCategory::Issue => node.issue.as_deref(),
    }
}

/// Buckets nodes by one category's key, preserving node-list order both
/// across buckets (first-seen key order) and within each bucket.
fn bucket_nodes<'node>(
    nodes: &'node [ContentNode],
    category: LinkCategory,
) -> Vec<(&'node str, Vec<usize>)> {
    let mut order: Vec<(&str, Vec<usize>)> = Vec::new();
    let mut index_of_key: HashMap<&str, usize> = HashMap::new();

    for (index, node) in nodes.iter().enumerate() {
        // Nodes missing the key are excluded from this category only.
        let Some(key) = category_key(node, category) else {
            continue;
        };

        match index_of_key.get(key) {
            Some(&bucket) => order[bucket].1.push(index),
            None => {
                index_of_key.insert(key, order.len());
                order.push((key, vec![index]));
            }
        }
    }

    order
}

/// Derives the complete edge list for the current settings snapshot.
///
/// Pure and deterministic: identical inputs yield an identical list, in
/// order and content. Disabled categories are skipped outright rather than
/// emitted at zero strength. A pair sharing several categories gets one
/// edge per category; parallel edges are intentionally not merged.
pub fn generate_links(nodes: &[ContentNode], settings: &LinkSettings) -> Vec<Link> {
    let mut links = Vec::new();

    for category in LinkCategory::ALL {
        let category_settings = settings.for_category(category);
        if !category_settings.enabled {
            continue;
        }

        for (key, bucket) in bucket_nodes(nodes, category) {
            // All-pairs clique within the bucket, i < j on node-list order.
            for (offset, &source) in bucket.iter().enumerate() {
                for &target in &bucket[offset + 1..] {
                    links.push(Link {
                        source: nodes[source].id.clone(),
                        target: nodes[target].id.clone(),
                        category,
                        group: key.to_owned(),
                        strength: category_settings.strength,
                        distance: category_settings.distance,
                    });
                }
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::NodeKind;

    fn node(id: &str, kind: NodeKind, author: Option<&str>, issue: Option<&str>) -> ContentNode {
        ContentNode {
            id: id.to_owned(),
            kind,
            title: id.to_owned(),
            description: None,
            descriptor: None,
            image_url: None,
            author: author.map(str::to_owned),
            author_image: None,
            tags: None,
            issue: issue.map(str::to_owned),
            link: None,
            x: None,
            y: None,
            z: None,
        }
    }

    fn count_category(links: &[Link], category: LinkCategory) -> usize {
        links
            .iter()
            .filter(|link| link.category == category)
            .count()
    }

    #[test]
    fn disabled_category_produces_no_edges_of_that_tag() {
        let nodes = vec![
            node("a", NodeKind::Article, Some("x"), Some("1")),
            node("b", NodeKind::Article, Some("x"), Some("1")),
        ];
        let mut settings = LinkSettings::default();
        settings.category.enabled = false;
        settings.author.enabled = false;
        settings.issue.enabled = true;

        let links = generate_links(&nodes, &settings);
        assert_eq!(count_category(&links, LinkCategory::Category), 0);
        assert_eq!(count_category(&links, LinkCategory::Author), 0);
        assert_eq!(count_category(&links, LinkCategory::Issue), 1);
    }

    #[test]
    fn bucket_sizes_yield_pairwise_clique_counts() {
        // Buckets of size 3 and 2 by author: 3 + 1 = 4 author edges.
        let nodes = vec![
            node("a", NodeKind::Article, Some("x"), None),
            node("b", NodeKind::Video, Some("x"), None),
            node("c", NodeKind::Article, Some("x"), None),
            node("d", NodeKind::Video, Some("y"), None),
            node("e", NodeKind::Article, Some("y"), None),
        ];
        let mut settings = LinkSettings::default();
        settings.category.enabled = false;
        settings.author.enabled = true;
        settings.issue.enabled = false;

        let links = generate_links(&nodes, &settings);
        assert_eq!(links.len(), 4);
        assert!(links.iter().all(|link| link.category == LinkCategory::Author));
    }

    #[test]
    fn generation_is_deterministic() {
        let nodes = vec![
            node("a", NodeKind::Article, Some("x"), Some("1")),
            node("b", NodeKind::Article, Some("y"), Some("1")),
            node("c", NodeKind::Video, Some("x"), Some("2")),
            node("d", NodeKind::Video, Some("y"), Some("2")),
        ];
        let mut settings = LinkSettings::default();
        settings.category.enabled = true;

        let first = generate_links(&nodes, &settings);
        let second = generate_links(&nodes, &settings);
        assert_eq!(first, second);
    }

    #[test]
    fn shared_category_and_author_yield_two_parallel_edges() {
        let nodes = vec![
            node("a", NodeKind::Article, Some("x"), None),
            node("b", NodeKind::Article, Some("x"), None),
            node("c", NodeKind::Video, Some("y"), None),
        ];
        let mut settings = LinkSettings::default();
        settings.category.enabled = true;
        settings.author.enabled = true;
        settings.issue.enabled = false;

        let links = generate_links(&nodes, &settings);
        assert_eq!(links.len(), 2);
        for link in &links {
            assert_eq!(link.source, "a");
            assert_eq!(link.target, "b");
        }
        assert_eq!(count_category(&links, LinkCategory::Category), 1);
        assert_eq!(count_category(&links, LinkCategory::Author), 1);
        assert!(!links.iter().any(|link| link.source == "c" || link.target == "c"));
    }

    #[test]
    fn single_node_dataset_yields_no_edges() {
        let nodes = vec![node("a", NodeKind::Article, Some("x"), Some("1"))];
        let mut settings = LinkSettings::default();
        settings.category.enabled = true;

        assert!(generate_links(&nodes, &settings).is_empty());
    }

    #[test]
    fn nodes_without_a_key_are_excluded_from_that_category_only() {
        let nodes = vec![
            node("a", NodeKind::Article, None, Some("1")),
            node("b", NodeKind::Article, Some("x"), Some("1")),
        ];
        let mut settings = LinkSettings::default();
        settings.category.enabled = true;
        settings.author.enabled = true;
        settings.issue.enabled = true;

        let links = generate_links(&nodes, &settings);
        assert_eq!(count_category(&links, LinkCategory::Author), 0);
        assert_eq!(count_category(&links, LinkCategory::Category), 1);
        assert_eq!(count_category(&links, LinkCategory::Issue), 1);
    }

    #[test]
    fn edges_capture_strength_and_distance_at_generation_time() {
        let nodes = vec![
            node("a", NodeKind::Article, None, Some("1")),
            node("b", NodeKind::Article, None, Some("1")),
        ];
        let mut settings = LinkSettings::default();
        settings.category.enabled = false;
        settings.issue.strength = 0.75;
        settings.issue.distance = 33.0;

        let links = generate_links(&nodes, &settings);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].strength, 0.75);
        assert_eq!(links[0].distance, 33.0);
        assert_eq!(links[0].group, "1");
    }
}
