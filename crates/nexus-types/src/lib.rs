//! Shared API Types for the Nexus explorer
//!
//! This crate is the SINGLE SOURCE OF TRUTH for all types crossing the HTTP boundary.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐         ┌──────────────────┐
//! │  Graph backend   │  JSON   │  Explorer client │
//! │  (read-only)     │ ──────► │  (nexus)         │
//! └──────────────────┘         └──────────────────┘
//!   GET /api/graph/snapshot      GraphSnapshot
//!   GET /api/entity/{name}       EntityDetail
//!   GET /api/edge?src=&tgt=      EdgeDetail
//! ```
//!
//! ## Rules
//!
//! 1. All wire types live here - no inline struct definitions in the client
//! 2. Optional fields are `#[serde(default)]` so older backends still decode
//! 3. `null` stays `None` - nothing is coerced to zero

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// SNAPSHOT API
// ============================================================================

/// Complete graph as of one load. Immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GraphSnapshot {
    /// Generation metadata (absent on older backends)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SnapshotMeta>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Node id -> neighbour ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjacency: Option<BTreeMap<String, Vec<String>>>,
}

impl GraphSnapshot {
    /// Find a node by id
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find an edge by id
    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Find the edge joining two nodes, in either direction
    pub fn edge_between(&self, a: &str, b: &str) -> Option<&GraphEdge> {
        self.edges
            .iter()
            .find(|e| (e.source == a && e.target == b) || (e.source == b && e.target == a))
    }

    /// Number of edges incident to a node.
    ///
    /// Uses the adjacency map when the backend sent one, otherwise counts edges.
    pub fn degree(&self, id: &str) -> usize {
        if let Some(neighbours) = self.adjacency.as_ref().and_then(|adj| adj.get(id)) {
            return neighbours.len();
        }
        self.edges
            .iter()
            .filter(|e| e.source == id || e.target == id)
            .count()
    }
}

/// Snapshot generation metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMeta {
    /// ISO-8601 UTC timestamp
    pub generated_at: String,
    pub node_count: usize,
    pub edge_count: usize,
}

/// A node in the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub entity_type: Option<EntityType>,
    #[serde(default)]
    pub claim_count: Option<u32>,
}

/// An undirected relationship between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Signed weight in [-1, 1]
    #[serde(default)]
    pub strength: Option<f64>,
}

impl GraphEdge {
    /// Edge id the backend assigns to the pair `{a, b}`: endpoints in sorted order joined by `||`
    pub fn pair_id(a: &str, b: &str) -> String {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        format!("{}||{}", first, second)
    }

    /// The endpoint opposite `node_id`, if `node_id` is an endpoint
    pub fn other_endpoint(&self, node_id: &str) -> Option<&str> {
        if self.source == node_id {
            Some(&self.target)
        } else if self.target == node_id {
            Some(&self.source)
        } else {
            None
        }
    }
}

// ============================================================================
// ENTITY TYPES
// ============================================================================

/// Entity classification. The set is open: unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    Organization,
    Geo,
    Person,
    Event,
    #[default]
    Unknown,
    Other(String),
}

impl EntityType {
    pub fn as_str(&self) -> &str {
        match self {
            EntityType::Organization => "ORGANIZATION",
            EntityType::Geo => "GEO",
            EntityType::Person => "PERSON",
            EntityType::Event => "EVENT",
            EntityType::Unknown => "UNKNOWN",
            EntityType::Other(label) => label,
        }
    }
}

impl From<String> for EntityType {
    fn from(s: String) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ORGANIZATION" | "ORGANISATION" => EntityType::Organization,
            "GEO" => EntityType::Geo,
            "PERSON" => EntityType::Person,
            "EVENT" => EntityType::Event,
            "" | "UNKNOWN" => EntityType::Unknown,
            _ => EntityType::Other(s),
        }
    }
}

impl From<&str> for EntityType {
    fn from(s: &str) -> Self {
        EntityType::from(s.to_string())
    }
}

impl From<EntityType> for String {
    fn from(t: EntityType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DETAIL API
// ============================================================================

/// A sourced, dated assertion about an entity or relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub content: String,
    #[serde(default)]
    pub source: Option<String>,
    /// When the claim was ingested
    #[serde(default)]
    pub date_added: Option<String>,
    /// When the claimed fact happened
    #[serde(default)]
    pub claim_date: Option<String>,
}

/// Entity detail, fetched per node on demand (never cached)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDetail {
    pub canonical: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub claims: Vec<Claim>,
    #[serde(default)]
    pub related_entities: Vec<String>,
}

/// Relationship detail, keyed by its endpoint pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDetail {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub claims: Vec<Claim>,
}
