//! Knowledge-node context formatting
//!
//! Builds the human-readable study-material block that gets appended to the
//! system prompt. Pure functions over read-only [`KnowledgeNode`] data; the
//! full node list is an explicit parameter so prerequisite/next-topic ids can
//! be resolved without any global lookup.

use serde::{Deserialize, Serialize};

/// A node in the knowledge graph (external entity, consumed read-only)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeNode {
    pub id: String,
    pub name: String,
    /// Schooling level tag, e.g. "primary", "junior", "senior"
    pub level: String,
    /// Subject category tag, e.g. "algebra", "geometry"
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub next_topics: Vec<String>,
}

/// Display labels for level tags. Open table: add a pair to support a new tag.
pub const LEVEL_LABELS: &[(&str, &str)] = &[
    ("primary", "Primary school"),
    ("junior", "Middle school"),
    ("senior", "High school"),
];

/// Display labels for category tags. Open table: add a pair to support a new tag.
pub const CATEGORY_LABELS: &[(&str, &str)] = &[
    ("algebra", "Algebra"),
    ("geometry", "Geometry"),
    ("statistics", "Statistics & probability"),
    ("functions", "Functions"),
    ("sequences", "Sequences"),
    ("calculus", "Calculus"),
];

fn label(table: &'static [(&'static str, &'static str)], tag: &str) -> &'static str {
    table.iter().find(|(t, _)| *t == tag).map(|(_, l)| *l).unwrap_or("")
}

/// Resolve ids to display names via the node list; unknown ids are dropped
fn resolve_names(ids: &[String], all_nodes: &[KnowledgeNode]) -> Vec<String> {
    ids.iter()
        .filter_map(|id| all_nodes.iter().find(|n| &n.id == id))
        .map(|n| n.name.clone())
        .collect()
}

/// Format a knowledge node as a study-material block
///
/// Returns the empty string when `node` is `None`. Deterministic, no side
/// effects: header with the node's name, level/category labels, optional
/// description and content sections, then prerequisite and next-topic name
/// lists resolved through `all_nodes`.
pub fn build_context(node: Option<&KnowledgeNode>, all_nodes: &[KnowledgeNode]) -> String {
    let Some(node) = node else {
        return String::new();
    };

    let mut out = format!("[Topic] {}\n", node.name);
    out.push_str(&format!("[Level] {}\n", label(LEVEL_LABELS, &node.level)));
    out.push_str(&format!("[Category] {}\n\n", label(CATEGORY_LABELS, &node.category)));

    if let Some(description) = &node.description
        && !description.is_empty()
    {
        out.push_str(&format!("[Overview] {}\n\n", description));
    }
    if let Some(content) = &node.content
        && !content.is_empty()
    {
        out.push_str(&format!("[Details]\n{}\n\n", content));
    }

    let prerequisites = resolve_names(&node.prerequisites, all_nodes);
    let next_topics = resolve_names(&node.next_topics, all_nodes);

    if !prerequisites.is_empty() {
        out.push_str(&format!("[Prerequisites] {}\n", prerequisites.join(", ")));
    }
    if !next_topics.is_empty() {
        out.push_str(&format!("[Next topics] {}\n", next_topics.join(", ")));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str) -> KnowledgeNode {
        KnowledgeNode {
            id: id.to_string(),
            name: name.to_string(),
            level: "junior".to_string(),
            category: "algebra".to_string(),
            description: None,
            content: None,
            prerequisites: vec![],
            next_topics: vec![],
        }
    }

    #[test]
    fn test_absent_node_yields_empty_string() {
        assert_eq!(build_context(None, &[]), "");
    }

    #[test]
    fn test_header_and_labels() {
        let n = node("lin-eq", "Linear equations");
        let ctx = build_context(Some(&n), &[]);
        assert!(ctx.starts_with("[Topic] Linear equations\n"));
        assert!(ctx.contains("[Level] Middle school"));
        assert!(ctx.contains("[Category] Algebra"));
    }

    #[test]
    fn test_unknown_tags_render_empty_labels() {
        let mut n = node("x", "X");
        n.level = "kindergarten".to_string();
        n.category = "topology".to_string();
        let ctx = build_context(Some(&n), &[]);
        assert!(ctx.contains("[Level] \n"));
        assert!(ctx.contains("[Category] \n"));
    }

    #[test]
    fn test_description_and_content_sections() {
        let mut n = node("quad", "Quadratic equations");
        n.description = Some("Equations of degree two".to_string());
        n.content = Some("ax^2 + bx + c = 0".to_string());
        let ctx = build_context(Some(&n), &[]);
        assert!(ctx.contains("[Overview] Equations of degree two"));
        assert!(ctx.contains("[Details]\nax^2 + bx + c = 0"));
    }

    #[test]
    fn test_prerequisites_resolved_and_unknown_dropped() {
        let mut n = node("quad", "Quadratic equations");
        n.prerequisites = vec!["lin-eq".to_string(), "missing".to_string()];
        n.next_topics = vec!["poly".to_string()];

        let all = vec![node("lin-eq", "Linear equations"), node("poly", "Polynomials"), n.clone()];
        let ctx = build_context(Some(&n), &all);
        assert!(ctx.contains("[Prerequisites] Linear equations\n"));
        assert!(!ctx.contains("missing"));
        assert!(ctx.contains("[Next topics] Polynomials\n"));
    }

    #[test]
    fn test_no_link_sections_when_lists_empty() {
        let n = node("lin-eq", "Linear equations");
        let ctx = build_context(Some(&n), &[]);
        assert!(!ctx.contains("[Prerequisites]"));
        assert!(!ctx.contains("[Next topics]"));
    }

    #[test]
    fn test_node_deserializes_camel_case() {
        let json = r#"{
            "id": "seq-1",
            "name": "Arithmetic sequences",
            "level": "senior",
            "category": "sequences",
            "nextTopics": ["seq-2"]
        }"#;
        let n: KnowledgeNode = serde_json::from_str(json).unwrap();
        assert_eq!(n.next_topics, vec!["seq-2"]);
        assert!(n.description.is_none());
        assert!(n.prerequisites.is_empty());
    }
}
