//! Focus navigation
//!
//! Centers the view on a node and selects it. The zoom never drops below
//! `min_zoom`, and a view already zoomed further in keeps its zoom.

use egui::Pos2;

use super::animation::AnimationSpec;
use super::selection::SelectionController;
use super::surface::GraphSurface;
use crate::error::GraphError;

/// Result of a successful focus
#[derive(Debug, Clone, PartialEq)]
pub struct FocusedNode {
    pub id: String,
    /// Anchor of the node before the camera moved
    pub anchor: Option<Pos2>,
    /// Zoom the camera is animating to
    pub zoom: f32,
}

/// Focus/zoom driver
#[derive(Debug, Clone, Copy)]
pub struct FocusNavigator {
    pub min_zoom: f32,
    pub animation: AnimationSpec,
}

impl Default for FocusNavigator {
    fn default() -> Self {
        Self {
            min_zoom: 0.8,
            animation: AnimationSpec::ease_out(400),
        }
    }
}

impl FocusNavigator {
    pub fn new(min_zoom: f32, animation: AnimationSpec) -> Self {
        Self {
            min_zoom,
            animation,
        }
    }

    /// Zoom a focus move should land on given the current zoom
    pub fn target_zoom(&self, current: f32) -> f32 {
        current.max(self.min_zoom)
    }

    /// Select `node_id` and fly the camera to it.
    ///
    /// An absent node is reported as [`GraphError::NodeNotFound`] with no
    /// change to selection or camera.
    pub fn focus(
        &self,
        surface: &mut dyn GraphSurface,
        selection: &mut SelectionController,
        node_id: &str,
    ) -> Result<FocusedNode, GraphError> {
        if !surface.has_node(node_id) {
            tracing::warn!(node = node_id, "focus target not on surface");
            return Err(GraphError::NodeNotFound(node_id.to_string()));
        }

        selection.select_node(surface, node_id)?;

        let anchor = surface.resolve_anchor(node_id);
        let zoom = self.target_zoom(surface.zoom());
        surface.animate_to(node_id, zoom, self.animation)?;

        Ok(FocusedNode {
            id: node_id.to_string(),
            anchor,
            zoom,
        })
    }
}
