//! Error taxonomy for the explorer client.
//!
//! Transport errors stop at the gateway: callers above it only see
//! "no result" plus a notice. `ExplorerError` is what the shell itself
//! can fail with (snapshot load, config, export).

use nexus_graph::GraphError;
use thiserror::Error;

/// Errors raised by the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code.
        status: u16,
        /// Response body (may be empty).
        body: String,
    },

    /// Connection, DNS or I/O failure.
    #[error("network error: {0}")]
    Network(String),

    /// Body did not decode into the expected type.
    #[error("decode error: {0}")]
    Decode(String),

    /// Request could not be built (bad base URL, empty parameter).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// Get an error code for this error type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Status { status: 404, .. } => "NOT_FOUND",
            Self::Status { .. } => "HTTP_STATUS",
            Self::Network(_) => "NETWORK",
            Self::Decode(_) => "DECODE",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }
}

/// Errors surfaced by the explorer shell.
#[derive(Debug, Error)]
pub enum ExplorerError {
    /// Entity, edge or node is absent. User-correctable.
    #[error("{what} not found")]
    NotFound {
        /// Human description of the missing thing.
        what: String,
    },

    /// Network or server failure.
    #[error("transport failure: {detail}")]
    TransportFailure {
        /// Diagnostic detail.
        detail: String,
    },

    /// The initial snapshot could not be loaded.
    #[error("snapshot load failed: {detail}")]
    SnapshotLoadFailure {
        /// Diagnostic detail.
        detail: String,
    },

    /// Request rejected before it was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration could not be read or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// Export could not be produced or written.
    #[error("export failed: {0}")]
    Export(String),

    /// View-state error from the graph core.
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExplorerError {
    /// Get an error code for this error type.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::TransportFailure { .. } => "TRANSPORT_FAILURE",
            Self::SnapshotLoadFailure { .. } => "SNAPSHOT_LOAD_FAILURE",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Config(_) => "CONFIG",
            Self::Export(_) => "EXPORT",
            Self::Graph(e) => e.code(),
            Self::Io(_) => "IO",
        }
    }
}

impl From<ApiError> for ExplorerError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Status { status: 404, body } => Self::NotFound { what: body },
            ApiError::InvalidRequest(msg) => Self::InvalidRequest(msg),
            other => Self::TransportFailure {
                detail: other.to_string(),
            },
        }
    }
}
