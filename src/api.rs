//! Graph backend API client
//!
//! Three read-only endpoints:
//!
//! - `GET /api/graph/snapshot`
//! - `GET /api/entity/{name}` (name as a percent-encoded path segment)
//! - `GET /api/edge?src=&tgt=` (percent-encoded query parameters)

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use nexus_types::{EdgeDetail, EntityDetail, GraphEdge, GraphSnapshot};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::ApiError;

/// Bodies longer than this are truncated in error messages
const ERROR_BODY_LIMIT: usize = 200;

/// Read access to the graph backend.
///
/// `HttpGraphApi` talks to the real server; `StaticGraphApi` serves fixed records.
#[async_trait]
pub trait GraphApi: Send + Sync {
    async fn get_snapshot(&self) -> Result<GraphSnapshot, ApiError>;

    /// Entity by canonical name or alias
    async fn get_entity(&self, name: &str) -> Result<EntityDetail, ApiError>;

    /// Relationship between two entities
    async fn get_edge(&self, src: &str, tgt: &str) -> Result<EdgeDetail, ApiError>;
}

/// HTTP implementation of [`GraphApi`]
pub struct HttpGraphApi {
    http: Client,
    base_url: Url,
}

impl HttpGraphApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("bad api base '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "api base '{}' cannot carry paths",
                base_url
            )));
        }

        // No request timeout; stale responses are dropped by the token guard
        let http = Client::builder()
            .build()
            .map_err(|e| ApiError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn snapshot_url(&self) -> Url {
        self.endpoint(&["api", "graph", "snapshot"])
    }

    pub fn entity_url(&self, name: &str) -> Url {
        self.endpoint(&["api", "entity", name])
    }

    pub fn edge_url(&self, src: &str, tgt: &str) -> Url {
        let mut url = self.endpoint(&["api", "edge"]);
        url.query_pairs_mut()
            .append_pair("src", src)
            .append_pair("tgt", tgt);
        url
    }

    /// Base URL with `segments` appended (each segment percent-encoded)
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "GET");

        let response = self
            .http
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl GraphApi for HttpGraphApi {
    async fn get_snapshot(&self) -> Result<GraphSnapshot, ApiError> {
        self.get(self.snapshot_url()).await
    }

    async fn get_entity(&self, name: &str) -> Result<EntityDetail, ApiError> {
        self.get(self.entity_url(name)).await
    }

    async fn get_edge(&self, src: &str, tgt: &str) -> Result<EdgeDetail, ApiError> {
        self.get(self.edge_url(src, tgt)).await
    }
}

/// In-memory backend serving fixed records.
///
/// Entities are keyed by canonical name; aliases resolve to their canonical
/// record. Edges are keyed by unordered endpoint pair. Every request is
/// recorded so callers can check what reached the backend.
#[derive(Default)]
pub struct StaticGraphApi {
    snapshot: Option<GraphSnapshot>,
    entities: BTreeMap<String, EntityDetail>,
    aliases: BTreeMap<String, String>,
    edges: BTreeMap<String, EdgeDetail>,
    failure: Option<ApiError>,
    requests: Mutex<Vec<String>>,
}

impl StaticGraphApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, snapshot: GraphSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_entity(mut self, detail: EntityDetail) -> Self {
        for alias in &detail.aliases {
            self.aliases.insert(alias.clone(), detail.canonical.clone());
        }
        self.entities.insert(detail.canonical.clone(), detail);
        self
    }

    pub fn with_edge(mut self, detail: EdgeDetail) -> Self {
        let key = GraphEdge::pair_id(&detail.source, &detail.target);
        self.edges.insert(key, detail);
        self
    }

    /// Fail every request with `error`
    pub fn failing(mut self, error: ApiError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Requests received so far, as `"snapshot"`, `"entity:<name>"` or `"edge:<src>:<tgt>"`
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn record(&self, request: String) -> Result<(), ApiError> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(request);
        }
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    fn not_found(name: &str) -> ApiError {
        ApiError::Status {
            status: 404,
            body: format!("Entity '{}' not found.", name),
        }
    }
}

#[async_trait]
impl GraphApi for StaticGraphApi {
    async fn get_snapshot(&self) -> Result<GraphSnapshot, ApiError> {
        self.record("snapshot".to_string())?;
        self.snapshot.clone().ok_or(ApiError::Status {
            status: 503,
            body: "graph index not loaded".to_string(),
        })
    }

    async fn get_entity(&self, name: &str) -> Result<EntityDetail, ApiError> {
        self.record(format!("entity:{}", name))?;
        self.entities
            .get(self.canonical(name))
            .cloned()
            .ok_or_else(|| Self::not_found(name))
    }

    async fn get_edge(&self, src: &str, tgt: &str) -> Result<EdgeDetail, ApiError> {
        self.record(format!("edge:{}:{}", src, tgt))?;
        let (src, tgt) = (self.canonical(src), self.canonical(tgt));
        for name in [src, tgt] {
            if !self.entities.contains_key(name) {
                return Err(Self::not_found(name));
            }
        }
        self.edges
            .get(&GraphEdge::pair_id(src, tgt))
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                body: format!("No relationship between '{}' and '{}'.", src, tgt),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::DataGateway;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer one request on an ephemeral port with a canned response
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_snapshot_url() {
        let api = HttpGraphApi::new("http://127.0.0.1:8099").unwrap();
        assert_eq!(
            api.snapshot_url().as_str(),
            "http://127.0.0.1:8099/api/graph/snapshot"
        );
    }

    #[test]
    fn test_base_with_prefix_and_trailing_slash() {
        let api = HttpGraphApi::new("https://graph.example.org/nexus/").unwrap();
        assert_eq!(
            api.entity_url("Acme").as_str(),
            "https://graph.example.org/nexus/api/entity/Acme"
        );
    }

    #[test]
    fn test_entity_name_is_path_encoded() {
        let api = HttpGraphApi::new("http://localhost:8099").unwrap();
        assert_eq!(
            api.entity_url("Acme Corp/EU").as_str(),
            "http://localhost:8099/api/entity/Acme%20Corp%2FEU"
        );
    }

    #[test]
    fn test_edge_params_are_query_encoded() {
        let api = HttpGraphApi::new("http://localhost:8099").unwrap();
        let url = api.edge_url("A & B", "C=D");
        assert_eq!(url.path(), "/api/edge");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("src".to_string(), "A & B".to_string()),
                ("tgt".to_string(), "C=D".to_string())
            ]
        );
    }

    #[test]
    fn test_rejects_bad_base() {
        assert!(matches!(
            HttpGraphApi::new("not a url"),
            Err(ApiError::InvalidRequest(_))
        ));
        assert!(matches!(
            HttpGraphApi::new("mailto:ops@example.org"),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_static_api_resolves_aliases_and_logs_requests() {
        let api = StaticGraphApi::new().with_entity(EntityDetail {
            canonical: "Acme Corp".into(),
            aliases: vec!["Acme".into()],
            claims: vec![],
            related_entities: vec![],
        });

        let detail = api.get_entity("Acme").await.unwrap();
        assert_eq!(detail.canonical, "Acme Corp");
        assert!(api.get_entity("Ghost").await.unwrap_err().is_not_found());
        assert_eq!(api.requests(), vec!["entity:Acme", "entity:Ghost"]);
    }

    #[tokio::test]
    async fn test_http_404_is_not_found() {
        let base = serve_once("404 Not Found", r#"{"detail":"Entity 'Ghost' not found."}"#).await;
        let api = HttpGraphApi::new(&base).unwrap();

        let err = api.get_entity("Ghost").await.unwrap_err();
        assert!(err.is_not_found());
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("Ghost"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_ghost_lookup_through_gateway() {
        let base = serve_once("404 Not Found", r#"{"detail":"Entity 'Ghost' not found."}"#).await;
        let gateway = DataGateway::new(HttpGraphApi::new(&base).unwrap());

        let fetched = gateway.fetch_entity("Ghost").await;
        assert!(fetched.value.is_none());
        assert_eq!(
            fetched.notice.unwrap().message,
            "Entity \"Ghost\" not found."
        );
    }

    #[tokio::test]
    async fn test_http_success_and_server_error() {
        let body = r#"{"canonical":"Acme Corp","aliases":["Acme"],"claims":[],"related_entities":["Globex"]}"#;
        let base = serve_once("200 OK", body).await;
        let detail = HttpGraphApi::new(&base)
            .unwrap()
            .get_entity("Acme")
            .await
            .unwrap();
        assert_eq!(detail.canonical, "Acme Corp");
        assert_eq!(detail.related_entities, vec!["Globex".to_string()]);

        let base = serve_once("500 Internal Server Error", "index corrupt").await;
        let err = HttpGraphApi::new(&base)
            .unwrap()
            .get_snapshot()
            .await
            .unwrap_err();
        assert_eq!(err.code(), "HTTP_STATUS");
    }
}
