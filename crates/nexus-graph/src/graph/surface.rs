//! Rendering surface capability interface
//!
//! Controllers never touch a concrete renderer. They see only this narrow
//! interface, so a headless surface can stand in for tests and the CLI.

use egui::{Color32, Pos2};
use image::RgbaImage;

use super::animation::AnimationSpec;
use super::types::{ElementRef, RenderElement};
use crate::error::GraphError;

/// Visual marker applied to a rendered element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HighlightClass {
    Selected,
    Neighbor,
}

impl HighlightClass {
    /// Class name as used in stylesheets
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightClass::Selected => "selected",
            HighlightClass::Neighbor => "neighbor",
        }
    }
}

/// An edge as the surface holds it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRef {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl EdgeRef {
    /// The endpoint opposite `node_id`
    pub fn other_endpoint(&self, node_id: &str) -> &str {
        if self.source == node_id {
            &self.target
        } else {
            &self.source
        }
    }
}

/// What the view-state core needs from a rendering engine.
///
/// Edges whose endpoints are not on the surface are dropped by `add_elements`.
pub trait GraphSurface {
    /// Add elements; nodes must come before the edges that reference them
    fn add_elements(&mut self, elements: &[RenderElement]);

    /// Remove every element and marker
    fn remove_all(&mut self);

    fn has_node(&self, id: &str) -> bool;

    fn has_edge(&self, id: &str) -> bool;

    fn node_ids(&self) -> Vec<String>;

    fn edge_ids(&self) -> Vec<String>;

    /// Edges with `node_id` as either endpoint
    fn incident_edges(&self, node_id: &str) -> Vec<EdgeRef>;

    /// `(source, target)` of an edge
    fn edge_endpoints(&self, edge_id: &str) -> Option<(String, String)>;

    /// Apply a marker to a node or edge (no-op for unknown ids)
    fn apply_class(&mut self, id: &str, class: HighlightClass);

    /// Remove every marker from every element
    fn clear_classes(&mut self);

    /// Markers currently on an element, in stable order
    fn classes_of(&self, id: &str) -> Vec<HighlightClass>;

    /// Current zoom level
    fn zoom(&self) -> f32;

    /// Animate the viewport to center `node_id` at `zoom`
    fn animate_to(
        &mut self,
        node_id: &str,
        zoom: f32,
        spec: AnimationSpec,
    ) -> Result<(), GraphError>;

    /// Screen position of an element, relative to the surface origin
    fn resolve_anchor(&self, id: &str) -> Option<Pos2>;

    /// Element under a surface-relative position; nodes win over edges
    fn hit_test(&self, position: Pos2) -> Option<ElementRef>;

    /// Surface origin in page coordinates
    fn screen_origin(&self) -> Pos2;

    /// Rasterize the current view
    fn rasterize(&self, background: Color32, scale: f32) -> Result<RgbaImage, GraphError>;
}
