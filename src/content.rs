use std::collections::HashSet;
use std::fs;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

const SAMPLE_CONTENT: &str = include_str!("../assets/sample_content.json");

/// Closed set of content kinds. Serde names match the upstream CMS export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "article")]
    Article,
    #[serde(rename = "youtube_video")]
    Video,
    #[serde(rename = "special_project")]
    SpecialProject,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            NodeKind::Article => "ARTICLE",
            NodeKind::Video => "VIDEO",
            NodeKind::SpecialProject => "SPECIAL PROJECT",
        }
    }
}

/// One content item. Created once at startup, never created or destroyed
/// at runtime; only the simulation-owned position state mutates.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub descriptor: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub author_image: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub x: Option<f32>,
    #[serde(default)]
    pub y: Option<f32>,
    #[serde(default)]
    pub z: Option<f32>,
}

impl ContentNode {
    /// Kind key used for same-category bucketing.
    pub fn kind_key(&self) -> &'static str {
        match self.kind {
            NodeKind::Article => "article",
            NodeKind::Video => "youtube_video",
            NodeKind::SpecialProject => "special_project",
        }
    }

    /// Resolves the outbound link against an optional base URL. Absolute
    /// links pass through; relative ones need a base to be usable.
    pub fn resolved_link(&self, base_url: Option<&str>) -> Option<String> {
        let link = self.link.as_deref()?;
        if let Ok(absolute) = url::Url::parse(link) {
            return Some(absolute.into());
        }
        let base = url::Url::parse(base_url?).ok()?;
        base.join(link).ok().map(Into::into)
    }
}

#[derive(Clone, Debug, Deserialize)]
struct ContentSet {
    nodes: Vec<ContentNode>,
}

fn validate(nodes: &[ContentNode]) -> Result<()> {
    let mut seen = HashSet::new();
    for node in nodes {
        if node.id.is_empty() {
            bail!("content node with empty id (title: {:?})", node.title);
        }
        if !seen.insert(node.id.as_str()) {
            bail!("duplicate content node id: {}", node.id);
        }
    }
    Ok(())
}

fn parse_content(source: &str) -> Result<Vec<ContentNode>> {
    let set: ContentSet = serde_json::from_str(source).context("parsing content JSON")?;
    validate(&set.nodes)?;
    Ok(set.nodes)
}

/// Loads the startup content source: an explicit JSON file when given,
/// otherwise the embedded sample set.
pub fn load_content(content_path: Option<&str>) -> Result<Vec<ContentNode>> {
    match content_path {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("reading content source {path}"))?;
            parse_content(&source)
        }
        None => parse_content(SAMPLE_CONTENT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_sample_parses_and_validates() {
        let nodes = load_content(None).expect("sample content must parse");
        assert!(!nodes.is_empty());
        assert!(nodes.iter().any(|node| node.author.is_some()));
        assert!(nodes.iter().any(|node| node.issue.is_some()));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let source = r#"{"nodes":[
            {"id":"a1","type":"article","title":"One"},
            {"id":"a1","type":"article","title":"Two"}
        ]}"#;
        assert!(parse_content(source).is_err());
    }

    #[test]
    fn relative_links_resolve_against_base_url() {
        let source = r#"{"nodes":[
            {"id":"a1","type":"article","title":"One","link":"/stories/one"},
            {"id":"a2","type":"article","title":"Two","link":"https://example.org/x"}
        ]}"#;
        let nodes = parse_content(source).unwrap();

        assert_eq!(
            nodes[0].resolved_link(Some("https://magazine.example")),
            Some("https://magazine.example/stories/one".to_owned())
        );
        assert_eq!(nodes[0].resolved_link(None), None);
        assert_eq!(
            nodes[1].resolved_link(None),
            Some("https://example.org/x".to_owned())
        );
    }

    #[test]
    fn unknown_kind_fails_to_parse() {
        let source = r#"{"nodes":[{"id":"a1","type":"podcast","title":"One"}]}"#;
        assert!(parse_content(source).is_err());
    }
}
