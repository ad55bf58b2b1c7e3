//! Renderable element descriptors and the snapshot transform
//!
//! The transform is pure: same snapshot in, same element list out. Widths are
//! computed once here and carried on the element, never recomputed per frame.

use nexus_types::{EntityType, GraphSnapshot};
use serde::Serialize;

use super::edges::edge_width;

// =============================================================================
// ELEMENTS
// =============================================================================

/// Styling data for a rendered node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeElement {
    pub id: String,
    pub label: String,
    /// `UNKNOWN` when the snapshot left it out
    pub entity_type: EntityType,
    /// Passed through as-is: `None` means "not reported", not zero
    pub claim_count: Option<u32>,
}

/// Styling data for a rendered edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeElement {
    pub id: String,
    pub source: String,
    pub target: String,
    pub strength: Option<f64>,
    /// Stroke width from [`edge_width`], fixed at transform time
    pub width: f64,
}

/// One renderable element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "group", rename_all = "snake_case")]
pub enum RenderElement {
    Node(NodeElement),
    Edge(EdgeElement),
}

impl RenderElement {
    pub fn id(&self) -> &str {
        match self {
            RenderElement::Node(n) => &n.id,
            RenderElement::Edge(e) => &e.id,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, RenderElement::Node(_))
    }
}

/// Reference to an element on the surface (the target of a pointer gesture)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Node(String),
    Edge(String),
}

impl ElementRef {
    pub fn id(&self) -> &str {
        match self {
            ElementRef::Node(id) | ElementRef::Edge(id) => id,
        }
    }
}

// =============================================================================
// TRANSFORM
// =============================================================================

/// Convert a snapshot into renderable elements: all nodes first, then all edges.
///
/// Edges referencing unknown nodes are still emitted; the surface drops them.
pub fn transform_snapshot(snapshot: &GraphSnapshot) -> Vec<RenderElement> {
    let nodes = snapshot.nodes.iter().map(|node| {
        RenderElement::Node(NodeElement {
            id: node.id.clone(),
            label: node.label.clone(),
            entity_type: node.entity_type.clone().unwrap_or_default(),
            claim_count: node.claim_count,
        })
    });

    let edges = snapshot.edges.iter().map(|edge| {
        RenderElement::Edge(EdgeElement {
            id: edge.id.clone(),
            source: edge.source.clone(),
            target: edge.target.clone(),
            strength: edge.strength,
            width: edge_width(edge.strength),
        })
    });

    nodes.chain(edges).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_types::{GraphEdge, GraphNode};
    use pretty_assertions::assert_eq;

    fn snapshot() -> GraphSnapshot {
        GraphSnapshot {
            meta: None,
            nodes: vec![
                GraphNode {
                    id: "A".into(),
                    label: "Acme".into(),
                    entity_type: Some(EntityType::Organization),
                    claim_count: Some(3),
                },
                GraphNode {
                    id: "B".into(),
                    label: "Bob".into(),
                    entity_type: None,
                    claim_count: None,
                },
            ],
            edges: vec![GraphEdge {
                id: "A||B".into(),
                source: "A".into(),
                target: "B".into(),
                strength: Some(0.5),
            }],
            adjacency: None,
        }
    }

    #[test]
    fn test_nodes_before_edges() {
        let elements = transform_snapshot(&snapshot());
        let kinds: Vec<bool> = elements.iter().map(|e| e.is_node()).collect();
        assert_eq!(kinds, vec![true, true, false]);
    }

    #[test]
    fn test_defaults_and_passthrough() {
        let elements = transform_snapshot(&snapshot());
        match &elements[1] {
            RenderElement::Node(n) => {
                assert_eq!(n.entity_type, EntityType::Unknown);
                assert_eq!(n.claim_count, None);
            }
            other => panic!("expected node, got {:?}", other),
        }
        match &elements[2] {
            RenderElement::Edge(e) => assert!((e.width - 2.5).abs() < 1e-9),
            other => panic!("expected edge, got {:?}", other),
        }
    }

    #[test]
    fn test_transform_is_deterministic() {
        let snap = snapshot();
        assert_eq!(transform_snapshot(&snap), transform_snapshot(&snap));
    }

    #[test]
    fn test_element_serializes_with_group_tag() {
        let elements = transform_snapshot(&snapshot());
        let json = serde_json::to_value(&elements[0]).unwrap();
        assert_eq!(json["group"], "node");
        assert_eq!(json["entity_type"], "ORGANIZATION");
    }
}
