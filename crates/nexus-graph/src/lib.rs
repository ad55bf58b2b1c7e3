//! Nexus Graph View-State
//!
//! This crate contains ONLY the view-state core - no HTTP, no app shell.
//! It is used by `nexus-explorer`, which owns the API, panel and lifecycle.

pub mod error;
pub mod graph;

pub use error::GraphError;
pub use graph::{
    edge_width,
    entity_type_fill,
    transform_snapshot,
    AnimationSpec,
    Camera2D,
    EdgeElement,
    EdgeRef,
    Easing,
    ElementRef,
    FocusNavigator,
    FocusedNode,
    GraphSurface,
    HeadlessSurface,
    HighlightClass,
    NodeElement,
    RenderElement,
    Selection,
    SelectionController,
    SelectionState,
};
