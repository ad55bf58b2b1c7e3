//! Nexus Explorer - interactive knowledge-graph client
//!
//! Turns a graph snapshot from the backend into a rendered view, and keeps
//! selection, viewport, tooltip and the inspection panel in step with what
//! the user does.
//!
//! ## Layout
//! - `nexus-types`: wire types (snapshot, entity and edge detail)
//! - `nexus-graph`: view-state core (transform, selection, focus, surface)
//! - this crate: backend access, panel, notifications, session, orchestration
//!
//! Gesture flow:
//! pointer event -> InteractionOrchestrator -> {Selection, Focus, DataGateway} -> Panel / Notifications
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nexus_explorer::{
//!     DataGateway, ExplorerConfig, HttpGraphApi, InteractionEvent, InteractionOrchestrator,
//!     Session, Target,
//! };
//! use nexus_graph::HeadlessSurface;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExplorerConfig::load(None)?;
//! let gateway = DataGateway::new(HttpGraphApi::new(&config.api_base)?);
//! let mut session = Session::new(HeadlessSurface::new(1280, 800), &config);
//! session.load_snapshot(&gateway).await?;
//!
//! let mut orchestrator = InteractionOrchestrator::new();
//! let tap = InteractionEvent::tap(Target::Node("Acme Corp".into()));
//! orchestrator.handle(&mut session, &gateway, &tap).await;
//! println!("{}", session.panel().html());
//! # Ok(())
//! # }
//! ```

// Error taxonomy
pub mod error;

// Configuration (YAML + environment)
pub mod config;

// Backend access
pub mod api;
pub mod gateway;

// User-facing state
pub mod notify;
pub mod panel;
pub mod tooltip;

// Session context and gesture wiring
pub mod orchestrator;
pub mod session;

// PNG / JSON export
pub mod export;

pub use api::{GraphApi, HttpGraphApi, StaticGraphApi};
pub use config::ExplorerConfig;
pub use error::{ApiError, ExplorerError};
pub use gateway::{DataGateway, Fetched};
pub use notify::{Notice, Notification, NotificationCenter, Severity};
pub use orchestrator::{
    GestureKind, InteractionEvent, InteractionOrchestrator, LookupOutcome, LookupRequest,
    PendingLookup, Resolution, Target, TargetKind,
};
pub use panel::{PanelRenderer, PanelView};
pub use session::{Session, SessionPhase};
pub use tooltip::TooltipController;
