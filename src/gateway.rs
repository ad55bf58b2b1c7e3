//! Detail fetching with failure classification
//!
//! The gateway is the only place transport errors are seen. Entity and edge
//! lookups come back as [`Fetched`]: a value or nothing, plus the notice the
//! user should see. Callers abort the rest of a gesture on `None`.

use nexus_types::{EdgeDetail, EntityDetail, GraphSnapshot};

use crate::api::GraphApi;
use crate::error::ExplorerError;
use crate::notify::Notice;

const ENTITY_FAILURE: &str = "Failed to load entity details.";
const EDGE_FAILURE: &str = "Failed to load relationship details.";

/// Outcome of a detail lookup
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: Option<T>,
    /// Message to show; set on every failure
    pub notice: Option<Notice>,
}

impl<T> Fetched<T> {
    pub fn found(value: T) -> Self {
        Self {
            value: Some(value),
            notice: None,
        }
    }

    pub fn missing(notice: Notice) -> Self {
        Self {
            value: None,
            notice: Some(notice),
        }
    }
}

pub struct DataGateway<A> {
    api: A,
}

impl<A: GraphApi> DataGateway<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Load the full graph. The one lookup whose failure is returned as an error.
    pub async fn fetch_snapshot(&self) -> Result<GraphSnapshot, ExplorerError> {
        tracing::info!("loading graph snapshot");
        match self.api.get_snapshot().await {
            Ok(snapshot) => {
                tracing::info!(
                    nodes = snapshot.nodes.len(),
                    edges = snapshot.edges.len(),
                    "snapshot loaded"
                );
                Ok(snapshot)
            }
            Err(e) => {
                tracing::error!(code = e.code(), error = %e, "snapshot load failed");
                Err(ExplorerError::SnapshotLoadFailure {
                    detail: e.to_string(),
                })
            }
        }
    }

    /// Entity detail by canonical name or alias
    pub async fn fetch_entity(&self, name: &str) -> Fetched<EntityDetail> {
        let name = name.trim();
        if name.is_empty() {
            return Fetched::missing(Notice::error("Enter an entity name."));
        }

        tracing::debug!(entity = name, "fetching entity");
        let error = match self.api.get_entity(name).await {
            Ok(detail) => return Fetched::found(detail),
            Err(e) => ExplorerError::from(e),
        };
        match error {
            ExplorerError::NotFound { .. } => {
                tracing::info!(entity = name, "entity not found");
                Fetched::missing(Notice::error(format!("Entity \"{}\" not found.", name)))
            }
            failure => {
                log_failure("entity", name, &failure);
                Fetched::missing(Notice::error(ENTITY_FAILURE))
            }
        }
    }

    /// Relationship detail for an endpoint pair.
    ///
    /// Empty endpoints and self-pairs are rejected without a request.
    pub async fn fetch_edge(&self, src: &str, tgt: &str) -> Fetched<EdgeDetail> {
        let (src, tgt) = (src.trim(), tgt.trim());
        if let Err(e) = validate_edge_request(src, tgt) {
            tracing::warn!(src, tgt, error = %e, "edge request rejected");
            return Fetched::missing(Notice::error(e.to_string()));
        }

        tracing::debug!(src, tgt, "fetching edge");
        let error = match self.api.get_edge(src, tgt).await {
            Ok(detail) => return Fetched::found(detail),
            Err(e) => ExplorerError::from(e),
        };
        match error {
            ExplorerError::NotFound { .. } => {
                tracing::info!(src, tgt, "relationship not found");
                Fetched::missing(Notice::error(format!(
                    "No relationship found between \"{}\" and \"{}\".",
                    src, tgt
                )))
            }
            failure => {
                log_failure("edge", &format!("{} -> {}", src, tgt), &failure);
                Fetched::missing(Notice::error(EDGE_FAILURE))
            }
        }
    }
}

fn validate_edge_request(src: &str, tgt: &str) -> Result<(), ExplorerError> {
    if src.is_empty() || tgt.is_empty() {
        return Err(ExplorerError::InvalidRequest("Both endpoints are required.".to_string()));
    }
    if src == tgt {
        return Err(ExplorerError::InvalidRequest(
            "Source and target refer to the same entity.".to_string(),
        ));
    }
    Ok(())
}

/// Diagnostic detail for developers; the user only sees the generic notice
fn log_failure(kind: &str, key: &str, error: &ExplorerError) {
    tracing::error!(kind, key, code = error.code(), error = %error, "lookup failed");
}
