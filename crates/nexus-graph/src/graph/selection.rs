//! Selection state machine
//!
//! ```text
//!            selectNode(n)              selectEdge(e)
//!   Idle ────────────────► NodeSelected ◄──────────► EdgeSelected
//!    ▲                          │                         │
//!    └──────── clear() ─────────┴─────────────────────────┘
//! ```
//!
//! Every transition clears all markers first, so markers from a previous
//! selection never leak into the next one.

use super::surface::{GraphSurface, HighlightClass};
use crate::error::GraphError;

/// Current selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    NodeSelected(String),
    EdgeSelected(String),
}

/// Flat view of [`Selection`]: at most one field is `Some`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub selected_entity: Option<String>,
    pub selected_edge: Option<String>,
}

impl From<&Selection> for SelectionState {
    fn from(selection: &Selection) -> Self {
        match selection {
            Selection::Idle => Self::default(),
            Selection::NodeSelected(id) => Self {
                selected_entity: Some(id.clone()),
                selected_edge: None,
            },
            Selection::EdgeSelected(id) => Self {
                selected_entity: None,
                selected_edge: Some(id.clone()),
            },
        }
    }
}

/// Owns the selection and keeps surface markers in sync with it
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selection: Selection,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn state(&self) -> SelectionState {
        SelectionState::from(&self.selection)
    }

    /// Select a node: it and its incident edges become "selected", the other
    /// endpoints of those edges become "neighbor".
    pub fn select_node(
        &mut self,
        surface: &mut dyn GraphSurface,
        node_id: &str,
    ) -> Result<(), GraphError> {
        if !surface.has_node(node_id) {
            return Err(GraphError::NodeNotFound(node_id.to_string()));
        }

        surface.clear_classes();
        surface.apply_class(node_id, HighlightClass::Selected);

        for edge in surface.incident_edges(node_id) {
            surface.apply_class(&edge.id, HighlightClass::Selected);
            let neighbour = edge.other_endpoint(node_id);
            if neighbour != node_id {
                surface.apply_class(neighbour, HighlightClass::Neighbor);
            }
        }

        self.selection = Selection::NodeSelected(node_id.to_string());
        tracing::debug!(node = node_id, "node selected");
        Ok(())
    }

    /// Select an edge: it and both endpoints become "selected".
    pub fn select_edge(
        &mut self,
        surface: &mut dyn GraphSurface,
        edge_id: &str,
    ) -> Result<(), GraphError> {
        let (source, target) = surface
            .edge_endpoints(edge_id)
            .ok_or_else(|| GraphError::EdgeNotFound(edge_id.to_string()))?;

        surface.clear_classes();
        surface.apply_class(edge_id, HighlightClass::Selected);
        surface.apply_class(&source, HighlightClass::Selected);
        surface.apply_class(&target, HighlightClass::Selected);

        self.selection = Selection::EdgeSelected(edge_id.to_string());
        tracing::debug!(edge = edge_id, "edge selected");
        Ok(())
    }

    /// Back to idle, all markers removed
    pub fn clear(&mut self, surface: &mut dyn GraphSurface) {
        surface.clear_classes();
        self.selection = Selection::Idle;
    }

    /// Forget the selection without touching a surface (the surface is being rebuilt)
    pub fn reset(&mut self) {
        self.selection = Selection::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::headless::HeadlessSurface;
    use crate::graph::types::transform_snapshot;
    use nexus_types::{GraphEdge, GraphNode, GraphSnapshot};
    use pretty_assertions::assert_eq;

    fn node(id: &str) -> GraphNode {
        GraphNode {
            id: id.into(),
            label: id.into(),
            entity_type: None,
            claim_count: None,
        }
    }

    fn edge(a: &str, b: &str) -> GraphEdge {
        GraphEdge {
            id: GraphEdge::pair_id(a, b),
            source: a.into(),
            target: b.into(),
            strength: Some(0.3),
        }
    }

    /// A - B - C, plus D isolated
    fn surface() -> HeadlessSurface {
        let snapshot = GraphSnapshot {
            meta: None,
            nodes: vec![node("A"), node("B"), node("C"), node("D")],
            edges: vec![edge("A", "B"), edge("B", "C")],
            adjacency: None,
        };
        let mut surface = HeadlessSurface::new(800, 600);
        surface.add_elements(&transform_snapshot(&snapshot));
        surface
    }

    fn marked(surface: &HeadlessSurface, class: HighlightClass) -> Vec<String> {
        let mut ids: Vec<String> = surface
            .node_ids()
            .into_iter()
            .chain(surface.edge_ids())
            .filter(|id| surface.classes_of(id).contains(&class))
            .collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_select_node_marks_neighbours() {
        let mut surface = surface();
        let mut selection = SelectionController::new();
        selection.select_node(&mut surface, "B").unwrap();

        assert_eq!(
            selection.selection(),
            &Selection::NodeSelected("B".to_string())
        );
        assert_eq!(
            marked(&surface, HighlightClass::Selected),
            vec!["A||B", "B", "B||C"]
        );
        assert_eq!(marked(&surface, HighlightClass::Neighbor), vec!["A", "C"]);
    }

    #[test]
    fn test_node_then_edge_leaves_no_stale_markers() {
        let mut surface = surface();
        let mut selection = SelectionController::new();
        selection.select_node(&mut surface, "B").unwrap();
        selection.select_edge(&mut surface, "A||B").unwrap();

        assert_eq!(
            marked(&surface, HighlightClass::Selected),
            vec!["A", "A||B", "B"]
        );
        assert!(marked(&surface, HighlightClass::Neighbor).is_empty());
        assert_eq!(
            selection.state(),
            SelectionState {
                selected_entity: None,
                selected_edge: Some("A||B".to_string()),
            }
        );
    }

    #[test]
    fn test_edge_then_node_leaves_no_stale_markers() {
        let mut surface = surface();
        let mut selection = SelectionController::new();
        selection.select_edge(&mut surface, "B||C").unwrap();
        selection.select_node(&mut surface, "A").unwrap();

        assert_eq!(marked(&surface, HighlightClass::Selected), vec!["A", "A||B"]);
        assert_eq!(marked(&surface, HighlightClass::Neighbor), vec!["B"]);
    }

    #[test]
    fn test_isolated_node_has_no_neighbours() {
        let mut surface = surface();
        let mut selection = SelectionController::new();
        selection.select_node(&mut surface, "D").unwrap();
        assert_eq!(marked(&surface, HighlightClass::Selected), vec!["D"]);
        assert!(marked(&surface, HighlightClass::Neighbor).is_empty());
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut surface = surface();
        let mut selection = SelectionController::new();
        selection.select_node(&mut surface, "B").unwrap();
        selection.clear(&mut surface);

        assert_eq!(selection.selection(), &Selection::Idle);
        assert!(marked(&surface, HighlightClass::Selected).is_empty());
        assert!(marked(&surface, HighlightClass::Neighbor).is_empty());
    }

    #[test]
    fn test_unknown_ids_leave_state_untouched() {
        let mut surface = surface();
        let mut selection = SelectionController::new();
        selection.select_node(&mut surface, "A").unwrap();

        assert_eq!(
            selection.select_node(&mut surface, "Z"),
            Err(GraphError::NodeNotFound("Z".to_string()))
        );
        assert_eq!(
            selection.select_edge(&mut surface, "X||Y"),
            Err(GraphError::EdgeNotFound("X||Y".to_string()))
        );
        assert_eq!(
            selection.selection(),
            &Selection::NodeSelected("A".to_string())
        );
        assert_eq!(marked(&surface, HighlightClass::Selected), vec!["A", "A||B"]);
    }
}
