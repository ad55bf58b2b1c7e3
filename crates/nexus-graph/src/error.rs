//! Graph view-state error types.

use thiserror::Error;

/// Errors raised by the view-state core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Node id is not present on the rendering surface.
    #[error("Node '{0}' not found in the current graph")]
    NodeNotFound(String),

    /// Edge id is not present on the rendering surface.
    #[error("Edge '{0}' not found in the current graph")]
    EdgeNotFound(String),

    /// Raster export requested for a zero-sized viewport.
    #[error("Cannot rasterize an empty viewport ({width}x{height})")]
    EmptyView {
        /// Viewport width in pixels.
        width: u32,
        /// Viewport height in pixels.
        height: u32,
    },

    /// Raster export would exceed the pixel budget.
    #[error("Raster of {width}x{height} exceeds {limit} pixels")]
    ViewTooLarge {
        /// Requested width in pixels (saturated).
        width: u32,
        /// Requested height in pixels (saturated).
        height: u32,
        /// Pixel budget.
        limit: u64,
    },
}

impl GraphError {
    /// Get an error code for this error type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NodeNotFound(_) => "NODE_NOT_FOUND",
            Self::EdgeNotFound(_) => "EDGE_NOT_FOUND",
            Self::EmptyView { .. } => "EMPTY_VIEW",
            Self::ViewTooLarge { .. } => "VIEW_TOO_LARGE",
        }
    }
}
