//! Interaction orchestrator
//!
//! Maps pointer and page events to controller calls through a fixed table
//! keyed by `(GestureKind, TargetKind)`. The table is built once and can be
//! enumerated, so the full behavior is testable without real pointer events.
//!
//! Lookups run in two phases:
//!
//! ```text
//!   dispatch(event) ──► PendingLookup { token, request }
//!                                │
//!                      gateway fetch (await)
//!                                │
//!   resolve(pending, outcome) ──► Applied | Aborted | Discarded
//! ```
//!
//! Every lookup and every background tap issues a new token. A response is
//! applied only if its token is still the latest and the snapshot has not
//! been reloaded since; otherwise it is discarded without any side effect.

use std::collections::HashMap;

use egui::{Pos2, Vec2};
use nexus_graph::{ElementRef, GraphSurface};
use nexus_types::{EdgeDetail, EntityDetail};

use crate::api::GraphApi;
use crate::gateway::{DataGateway, Fetched};
use crate::notify::Notice;
use crate::panel::format_strength;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GestureKind {
    Tap,
    Hover,
    Move,
    Leave,
    Activate,
    Submit,
    Scroll,
    Visibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetKind {
    Node,
    Edge,
    Background,
    RelatedEntity,
    SearchField,
    Page,
}

/// What a pointer gesture landed on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Node(String),
    Edge(String),
    Background,
}

impl Target {
    pub fn kind(&self) -> TargetKind {
        match self {
            Target::Node(_) => TargetKind::Node,
            Target::Edge(_) => TargetKind::Edge,
            Target::Background => TargetKind::Background,
        }
    }
}

/// Hit-test result as a gesture target; empty space is the background
impl From<Option<ElementRef>> for Target {
    fn from(hit: Option<ElementRef>) -> Self {
        match hit {
            Some(ElementRef::Node(id)) => Target::Node(id),
            Some(ElementRef::Edge(id)) => Target::Edge(id),
            None => Target::Background,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// Pointer gesture at a surface-relative position
    Pointer {
        gesture: GestureKind,
        target: Target,
        position: Pos2,
    },
    /// A related-entity reference in the panel was activated
    RelatedEntity(String),
    /// The search box was submitted
    SearchSubmit(String),
    /// The page scrolled to this offset
    PageScroll(Vec2),
    /// The document was hidden or shown
    VisibilityChange { hidden: bool },
}

impl InteractionEvent {
    pub fn tap(target: Target) -> Self {
        Self::Pointer {
            gesture: GestureKind::Tap,
            target,
            position: Pos2::ZERO,
        }
    }

    pub fn hover(target: Target, position: Pos2) -> Self {
        Self::Pointer {
            gesture: GestureKind::Hover,
            target,
            position,
        }
    }

    pub fn pointer_move(target: Target, position: Pos2) -> Self {
        Self::Pointer {
            gesture: GestureKind::Move,
            target,
            position,
        }
    }

    pub fn leave(target: Target) -> Self {
        Self::Pointer {
            gesture: GestureKind::Leave,
            target,
            position: Pos2::ZERO,
        }
    }

    /// Table key for this event
    pub fn key(&self) -> (GestureKind, TargetKind) {
        match self {
            Self::Pointer {
                gesture, target, ..
            } => (*gesture, target.kind()),
            Self::RelatedEntity(_) => (GestureKind::Activate, TargetKind::RelatedEntity),
            Self::SearchSubmit(_) => (GestureKind::Submit, TargetKind::SearchField),
            Self::PageScroll(_) => (GestureKind::Scroll, TargetKind::Page),
            Self::VisibilityChange { .. } => (GestureKind::Visibility, TargetKind::Page),
        }
    }
}

/// Where an entity lookup came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOrigin {
    NodeTap,
    RelatedEntity,
    Search,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupRequest {
    Entity {
        name: String,
        origin: LookupOrigin,
    },
    Edge {
        edge_id: String,
        source: String,
        target: String,
        strength: Option<f64>,
    },
}

/// A lookup waiting for its response
#[derive(Debug, Clone, PartialEq)]
pub struct PendingLookup {
    pub token: u64,
    /// Session generation the lookup was issued against
    pub generation: u64,
    pub request: LookupRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Entity(Fetched<EntityDetail>),
    Edge(Fetched<EdgeDetail>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Result applied to selection, viewport and panel
    Applied,
    /// No result (or the target vanished); a notice was shown, nothing else changed
    Aborted,
    /// Superseded by a later gesture; nothing changed
    Discarded,
}

/// What a handler asks the orchestrator to do after its synchronous effects
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Invalidate in-flight lookups
    Supersede,
    Lookup(LookupRequest),
}

pub type Handler<S> = fn(&mut Session<S>, &InteractionEvent) -> Effect;

pub struct InteractionOrchestrator<S> {
    handlers: HashMap<(GestureKind, TargetKind), Handler<S>>,
    latest_token: u64,
}

impl<S: GraphSurface> Default for InteractionOrchestrator<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GraphSurface> InteractionOrchestrator<S> {
    pub fn new() -> Self {
        let mut handlers: HashMap<(GestureKind, TargetKind), Handler<S>> = HashMap::new();
        handlers.insert((GestureKind::Tap, TargetKind::Node), tap_node::<S>);
        handlers.insert((GestureKind::Tap, TargetKind::Edge), tap_edge::<S>);
        handlers.insert((GestureKind::Tap, TargetKind::Background), tap_background::<S>);
        handlers.insert((GestureKind::Hover, TargetKind::Node), hover_node::<S>);
        handlers.insert((GestureKind::Hover, TargetKind::Edge), hover_edge::<S>);
        handlers.insert((GestureKind::Move, TargetKind::Node), pointer_move::<S>);
        handlers.insert((GestureKind::Move, TargetKind::Edge), pointer_move::<S>);
        handlers.insert((GestureKind::Leave, TargetKind::Node), pointer_leave::<S>);
        handlers.insert((GestureKind::Leave, TargetKind::Edge), pointer_leave::<S>);
        handlers.insert(
            (GestureKind::Activate, TargetKind::RelatedEntity),
            activate_related::<S>,
        );
        handlers.insert((GestureKind::Submit, TargetKind::SearchField), submit_search::<S>);
        handlers.insert((GestureKind::Scroll, TargetKind::Page), page_scroll::<S>);
        handlers.insert((GestureKind::Visibility, TargetKind::Page), visibility::<S>);

        Self {
            handlers,
            latest_token: 0,
        }
    }

    /// Every wired `(gesture, target)` pair, sorted
    pub fn handlers(&self) -> Vec<(GestureKind, TargetKind)> {
        let mut keys: Vec<_> = self.handlers.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn latest_token(&self) -> u64 {
        self.latest_token
    }

    /// Apply the synchronous part of `event`. Returns the lookup to run, if any.
    pub fn dispatch(
        &mut self,
        session: &mut Session<S>,
        event: &InteractionEvent,
    ) -> Option<PendingLookup> {
        let key = event.key();
        let Some(handler) = self.handlers.get(&key).copied() else {
            tracing::trace!(?key, "no handler");
            return None;
        };

        match handler(session, event) {
            Effect::None => None,
            Effect::Supersede => {
                self.latest_token += 1;
                None
            }
            Effect::Lookup(request) => {
                self.latest_token += 1;
                tracing::debug!(token = self.latest_token, ?request, "lookup issued");
                Some(PendingLookup {
                    token: self.latest_token,
                    generation: session.generation(),
                    request,
                })
            }
        }
    }

    /// Run the fetch for a pending lookup
    pub async fn fetch<A: GraphApi>(
        gateway: &DataGateway<A>,
        pending: &PendingLookup,
    ) -> LookupOutcome {
        match &pending.request {
            LookupRequest::Entity { name, .. } => {
                LookupOutcome::Entity(gateway.fetch_entity(name).await)
            }
            LookupRequest::Edge { source, target, .. } => {
                LookupOutcome::Edge(gateway.fetch_edge(source, target).await)
            }
        }
    }

    /// Apply a lookup's outcome, unless a later gesture or a reload superseded it
    pub fn resolve(
        &mut self,
        session: &mut Session<S>,
        pending: PendingLookup,
        outcome: LookupOutcome,
    ) -> Resolution {
        if pending.token != self.latest_token || pending.generation != session.generation() {
            tracing::debug!(
                token = pending.token,
                latest = self.latest_token,
                "stale lookup response discarded"
            );
            return Resolution::Discarded;
        }

        match (pending.request, outcome) {
            (LookupRequest::Entity { origin, .. }, LookupOutcome::Entity(fetched)) => {
                apply_entity(session, origin, fetched)
            }
            (
                LookupRequest::Edge {
                    edge_id, strength, ..
                },
                LookupOutcome::Edge(fetched),
            ) => apply_edge(session, &edge_id, strength, fetched),
            (request, _) => {
                tracing::warn!(?request, "lookup outcome does not match request");
                Resolution::Aborted
            }
        }
    }

    /// `dispatch`, then fetch and `resolve` in order
    pub async fn handle<A: GraphApi>(
        &mut self,
        session: &mut Session<S>,
        gateway: &DataGateway<A>,
        event: &InteractionEvent,
    ) -> Option<Resolution> {
        let pending = self.dispatch(session, event)?;
        let outcome = Self::fetch(gateway, &pending).await;
        Some(self.resolve(session, pending, outcome))
    }
}

fn apply_entity<S: GraphSurface>(
    session: &mut Session<S>,
    origin: LookupOrigin,
    fetched: Fetched<EntityDetail>,
) -> Resolution {
    let Some(detail) = fetched.value else {
        if let Some(notice) = fetched.notice {
            session.notify(notice);
        }
        return Resolution::Aborted;
    };

    if session.focus(&detail.canonical).is_none() {
        return Resolution::Aborted;
    }
    session.panel_mut().render_entity(&detail);
    if origin == LookupOrigin::Search {
        session.set_search_field(detail.canonical.clone());
    }
    Resolution::Applied
}

fn apply_edge<S: GraphSurface>(
    session: &mut Session<S>,
    edge_id: &str,
    strength: Option<f64>,
    fetched: Fetched<EdgeDetail>,
) -> Resolution {
    let Some(detail) = fetched.value else {
        if let Some(notice) = fetched.notice {
            session.notify(notice);
        }
        return Resolution::Aborted;
    };

    if let Err(e) = session.select_edge(edge_id) {
        tracing::warn!(code = e.code(), edge = edge_id, "edge vanished before response");
        session.notify(Notice::error("That relationship is no longer in the graph."));
        return Resolution::Aborted;
    }
    session.panel_mut().render_edge(&detail, strength);
    Resolution::Applied
}

/// Tooltip text for a node: label, type, claim count, degree
pub fn node_tooltip<S: GraphSurface>(session: &Session<S>, node_id: &str) -> Option<String> {
    let snapshot = session.snapshot()?;
    let node = snapshot.node(node_id)?;
    let entity_type = node.entity_type.clone().unwrap_or_default();
    let claims = node
        .claim_count
        .map(|c| c.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    Some(format!(
        "{}\nType: {}\nClaims: {}\nConnections: {}",
        node.label,
        entity_type,
        claims,
        snapshot.degree(node_id)
    ))
}

/// Tooltip text for an edge: endpoint labels and strength
pub fn edge_tooltip<S: GraphSurface>(session: &Session<S>, edge_id: &str) -> Option<String> {
    let snapshot = session.snapshot()?;
    let edge = snapshot.edge(edge_id)?;
    let label = |id: &str| {
        snapshot
            .node(id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| id.to_string())
    };
    Some(format!(
        "{} \u{2194} {}\nStrength: {}",
        label(&edge.source),
        label(&edge.target),
        format_strength(edge.strength)
    ))
}

fn tap_node<S: GraphSurface>(_: &mut Session<S>, event: &InteractionEvent) -> Effect {
    match event {
        InteractionEvent::Pointer {
            target: Target::Node(id),
            ..
        } => Effect::Lookup(LookupRequest::Entity {
            name: id.clone(),
            origin: LookupOrigin::NodeTap,
        }),
        _ => Effect::None,
    }
}

fn tap_edge<S: GraphSurface>(session: &mut Session<S>, event: &InteractionEvent) -> Effect {
    let InteractionEvent::Pointer {
        target: Target::Edge(edge_id),
        ..
    } = event
    else {
        return Effect::None;
    };

    let Some((source, target)) = session.surface().edge_endpoints(edge_id) else {
        tracing::warn!(edge = %edge_id, "tapped edge is not on the surface");
        return Effect::None;
    };
    let strength = session
        .snapshot()
        .and_then(|s| s.edge(edge_id).or_else(|| s.edge_between(&source, &target)))
        .and_then(|e| e.strength);

    Effect::Lookup(LookupRequest::Edge {
        edge_id: edge_id.clone(),
        source,
        target,
        strength,
    })
}

fn tap_background<S: GraphSurface>(session: &mut Session<S>, _: &InteractionEvent) -> Effect {
    session.clear_selection();
    session.panel_mut().render_default();
    Effect::Supersede
}

fn hover_node<S: GraphSurface>(session: &mut Session<S>, event: &InteractionEvent) -> Effect {
    if let InteractionEvent::Pointer {
        target: Target::Node(id),
        position,
        ..
    } = event
    {
        if let Some(text) = node_tooltip(session, id) {
            session.show_tooltip(text, *position);
        }
    }
    Effect::None
}

fn hover_edge<S: GraphSurface>(session: &mut Session<S>, event: &InteractionEvent) -> Effect {
    if let InteractionEvent::Pointer {
        target: Target::Edge(id),
        position,
        ..
    } = event
    {
        if let Some(text) = edge_tooltip(session, id) {
            session.show_tooltip(text, *position);
        }
    }
    Effect::None
}

fn pointer_move<S: GraphSurface>(session: &mut Session<S>, event: &InteractionEvent) -> Effect {
    if let InteractionEvent::Pointer { position, .. } = event {
        session.move_tooltip(*position);
    }
    Effect::None
}

fn pointer_leave<S: GraphSurface>(session: &mut Session<S>, _: &InteractionEvent) -> Effect {
    session.hide_tooltip();
    Effect::None
}

fn activate_related<S: GraphSurface>(_: &mut Session<S>, event: &InteractionEvent) -> Effect {
    match event {
        InteractionEvent::RelatedEntity(name) => Effect::Lookup(LookupRequest::Entity {
            name: name.clone(),
            origin: LookupOrigin::RelatedEntity,
        }),
        _ => Effect::None,
    }
}

fn submit_search<S: GraphSurface>(_: &mut Session<S>, event: &InteractionEvent) -> Effect {
    match event {
        InteractionEvent::SearchSubmit(term) => Effect::Lookup(LookupRequest::Entity {
            name: term.trim().to_string(),
            origin: LookupOrigin::Search,
        }),
        _ => Effect::None,
    }
}

fn page_scroll<S: GraphSurface>(session: &mut Session<S>, event: &InteractionEvent) -> Effect {
    if let InteractionEvent::PageScroll(scroll) = event {
        session.page_scrolled(*scroll);
    }
    Effect::None
}

fn visibility<S: GraphSurface>(session: &mut Session<S>, event: &InteractionEvent) -> Effect {
    if let InteractionEvent::VisibilityChange { hidden } = event {
        session.visibility_changed(*hidden);
    }
    Effect::None
}
