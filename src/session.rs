//! Explorer session
//!
//! The context object every interaction runs against: one live snapshot, one
//! rendering surface, one selection, plus the panel, tooltip and
//! notification state that hang off them.
//!
//! Lifecycle: `new` (Empty) -> `reload` (Active, generation n) -> `reload`
//! again disposes the surface content and starts generation n + 1. A failed
//! initial load leaves the session Empty.

use std::time::{Duration, Instant};

use egui::{Pos2, Vec2};
use nexus_graph::{
    transform_snapshot, FocusNavigator, FocusedNode, GraphSurface, Selection, SelectionController,
    SelectionState,
};
use nexus_types::GraphSnapshot;

use crate::api::GraphApi;
use crate::config::ExplorerConfig;
use crate::error::ExplorerError;
use crate::gateway::DataGateway;
use crate::notify::{Notice, NotificationCenter};
use crate::orchestrator::{GestureKind, InteractionEvent, Target};
use crate::panel::PanelRenderer;
use crate::tooltip::TooltipController;

pub const SNAPSHOT_FAILURE_MESSAGE: &str =
    "Failed to load the graph snapshot. Check that the graph server is running.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No snapshot loaded
    Empty,
    /// Snapshot `generation` is on the surface
    Active { generation: u64 },
}

pub struct Session<S> {
    phase: SessionPhase,
    generation: u64,
    snapshot: Option<GraphSnapshot>,
    surface: S,
    selection: SelectionController,
    navigator: FocusNavigator,
    panel: PanelRenderer,
    tooltip: TooltipController,
    notifications: NotificationCenter,
    snapshot_failure_duration: Duration,
    search_field: String,
}

impl<S: GraphSurface> Session<S> {
    pub fn new(surface: S, config: &ExplorerConfig) -> Self {
        Self {
            phase: SessionPhase::Empty,
            generation: 0,
            snapshot: None,
            surface,
            selection: SelectionController::new(),
            navigator: config.focus_navigator(),
            panel: PanelRenderer::new(),
            tooltip: TooltipController::new(config.tooltip_offset()),
            notifications: NotificationCenter::new(config.notification_duration()),
            snapshot_failure_duration: config.snapshot_failure_duration(),
            search_field: String::new(),
        }
    }

    /// Fetch the snapshot and make it live.
    ///
    /// On failure a long-lived error notice is shown and the current
    /// snapshot (if any) stays in place.
    pub async fn load_snapshot<A: GraphApi>(
        &mut self,
        gateway: &DataGateway<A>,
    ) -> Result<(), ExplorerError> {
        match gateway.fetch_snapshot().await {
            Ok(snapshot) => {
                self.reload(snapshot);
                Ok(())
            }
            Err(e) => {
                self.notifications.push(
                    Notice::error(SNAPSHOT_FAILURE_MESSAGE).lasting(self.snapshot_failure_duration),
                );
                Err(e)
            }
        }
    }

    /// Replace the snapshot wholesale: old surface content is disposed,
    /// selection goes Idle, panel shows the default, tooltip hides.
    pub fn reload(&mut self, snapshot: GraphSnapshot) {
        self.surface.remove_all();
        self.surface.add_elements(&transform_snapshot(&snapshot));
        self.selection.reset();
        self.panel.render_default();
        self.tooltip.hide();

        self.generation += 1;
        self.phase = SessionPhase::Active {
            generation: self.generation,
        };
        tracing::info!(
            generation = self.generation,
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            rendered_edges = self.surface.edge_ids().len(),
            "snapshot active"
        );
        self.snapshot = Some(snapshot);
    }

    /// Select and center a node. An absent node raises one error notice
    /// and leaves everything else as it was.
    pub fn focus(&mut self, node_id: &str) -> Option<FocusedNode> {
        match self
            .navigator
            .focus(&mut self.surface, &mut self.selection, node_id)
        {
            Ok(focused) => Some(focused),
            Err(e) => {
                tracing::warn!(code = e.code(), node = node_id, "focus failed");
                self.notifications.push(Notice::error(format!(
                    "Node \"{}\" is not in the graph.",
                    node_id
                )));
                None
            }
        }
    }

    pub fn select_edge(&mut self, edge_id: &str) -> Result<(), ExplorerError> {
        self.selection
            .select_edge(&mut self.surface, edge_id)
            .map_err(ExplorerError::from)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear(&mut self.surface);
    }

    /// What lies under a surface-relative position
    pub fn target_at(&self, position: Pos2) -> Target {
        Target::from(self.surface.hit_test(position))
    }

    /// Pointer `gesture` at a surface-relative position, aimed at whatever is under it
    pub fn pointer_event(&self, gesture: GestureKind, position: Pos2) -> InteractionEvent {
        InteractionEvent::Pointer {
            gesture,
            target: self.target_at(position),
            position,
        }
    }

    /// Show tooltip `text` at a surface-relative position
    pub fn show_tooltip(&mut self, text: impl Into<String>, position: Pos2) {
        let origin = self.surface.screen_origin();
        self.tooltip.show(text, position, origin);
    }

    pub fn move_tooltip(&mut self, position: Pos2) {
        let origin = self.surface.screen_origin();
        self.tooltip.reposition(position, origin);
    }

    pub fn hide_tooltip(&mut self) {
        self.tooltip.on_pointer_leave();
    }

    pub fn page_scrolled(&mut self, scroll: Vec2) {
        self.tooltip.on_page_scroll(scroll);
    }

    pub fn visibility_changed(&mut self, hidden: bool) {
        self.tooltip.on_visibility_change(hidden);
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notifications.push(notice);
    }

    /// Expire notifications whose deadline has passed
    pub fn tick(&mut self, now: Instant) -> bool {
        self.notifications.tick(now)
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, SessionPhase::Active { .. })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Option<&GraphSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn panel(&self) -> &PanelRenderer {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut PanelRenderer {
        &mut self.panel
    }

    pub fn tooltip(&self) -> &TooltipController {
        &self.tooltip
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn search_field(&self) -> &str {
        &self.search_field
    }

    pub fn set_search_field(&mut self, value: impl Into<String>) {
        self.search_field = value.into();
    }
}
