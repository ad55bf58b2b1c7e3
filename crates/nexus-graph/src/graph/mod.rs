//! Knowledge Graph View-State Module
//!
//! Turns a raw snapshot into renderable elements and keeps selection,
//! highlight and camera state consistent while the user explores.
//!
//! # Architecture
//!
//! ```text
//! GraphSnapshot (from server)
//!        │
//!        ▼
//! transform_snapshot (nodes first, then edges; widths attached here)
//!        │
//!        ▼
//! GraphSurface (capability interface: add / classes / animate / anchors)
//!        │
//!        ├──► SelectionController (Idle | NodeSelected | EdgeSelected)
//!        │         └──► HighlightClass markers ("selected" / "neighbor")
//!        │
//!        └──► FocusNavigator (select + center + zoom floor)
//!                    │
//!                    ▼
//!              Camera2D (ease-out tween)
//! ```
//!
//! `HeadlessSurface` is the in-memory surface used by the CLI and tests.

pub mod animation;
pub mod camera;
pub mod colors;
pub mod edges;
pub mod focus;
pub mod headless;
pub mod selection;
pub mod spatial;
pub mod surface;
pub mod types;

pub use animation::{AnimationSpec, Easing, Tween};
pub use camera::Camera2D;
pub use colors::{entity_type_fill, highlight_stroke, parse_hex_color};
pub use edges::edge_width;
pub use focus::{FocusNavigator, FocusedNode};
pub use headless::HeadlessSurface;
pub use selection::{Selection, SelectionController, SelectionState};
pub use spatial::{DiscIndex, NodeDisc};
pub use surface::{EdgeRef, GraphSurface, HighlightClass};
pub use types::*;
