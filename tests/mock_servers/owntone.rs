//! Mock OwnTone server for testing
//!
//! Serves canned JSON for `/api/...` requests and raw bytes for artwork paths.
//! Requests are matched on path plus *decoded* query string, e.g.
//! `/api/search?type=tracks&expression=genre is "Pop"`.

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Canned artwork response
#[derive(Debug, Clone)]
struct MockImage {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

/// Mock OwnTone server state
#[derive(Default)]
struct MockOwnToneState {
    json: HashMap<String, Value>,
    statuses: HashMap<String, StatusCode>,
    images: HashMap<String, MockImage>,
    requests: Vec<String>,
}

/// Mock OwnTone Server
pub struct MockOwnToneServer {
    addr: SocketAddr,
    state: Arc<RwLock<MockOwnToneState>>,
    handle: JoinHandle<()>,
}

impl MockOwnToneServer {
    /// Start a mock OwnTone server on a random port
    pub async fn start() -> Self {
        let state = Arc::new(RwLock::new(MockOwnToneState::default()));

        let app = Router::new()
            .fallback(handle_request)
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Get the server address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL with trailing slash
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Serve `body` for `path_and_query` (query values unencoded)
    pub async fn set_json(&self, path_and_query: &str, body: Value) {
        let mut state = self.state.write().await;
        state.json.insert(path_and_query.to_string(), body);
    }

    /// Answer `path_and_query` with a bare status code
    pub async fn set_status(&self, path_and_query: &str, status: StatusCode) {
        let mut state = self.state.write().await;
        state.statuses.insert(path_and_query.to_string(), status);
    }

    /// Serve raw image bytes at `path`
    pub async fn set_image(&self, path: &str, bytes: &[u8], content_type: Option<&str>) {
        let mut state = self.state.write().await;
        state.images.insert(
            path.to_string(),
            MockImage {
                bytes: bytes.to_vec(),
                content_type: content_type.map(|s| s.to_string()),
            },
        );
    }

    /// Requests received so far, in arrival order
    pub async fn requests(&self) -> Vec<String> {
        self.state.read().await.requests.clone()
    }

    /// Number of requests whose key starts with `prefix`
    pub async fn request_count(&self, prefix: &str) -> usize {
        self.requests()
            .await
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }

    /// Stop the mock server
    pub async fn stop(self) {
        self.handle.abort();
    }
}

/// Path plus decoded query, the lookup key for canned responses
fn request_key(uri: &Uri, query: Option<&str>) -> String {
    match query {
        Some(query) if !query.is_empty() => {
            let pairs: Vec<String> = url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            format!("{}?{}", uri.path(), pairs.join("&"))
        }
        _ => uri.path().to_string(),
    }
}

async fn handle_request(
    State(state): State<Arc<RwLock<MockOwnToneState>>>,
    uri: Uri,
    RawQuery(query): RawQuery,
) -> Response {
    let key = request_key(&uri, query.as_deref());

    let mut state = state.write().await;
    state.requests.push(key.clone());

    if let Some(status) = state.statuses.get(&key) {
        return (*status).into_response();
    }
    if let Some(body) = state.json.get(&key) {
        return Json(body.clone()).into_response();
    }
    if let Some(image) = state.images.get(uri.path()) {
        return match &image.content_type {
            Some(ct) => {
                ([(header::CONTENT_TYPE, ct.clone())], image.bytes.clone()).into_response()
            }
            None => image.bytes.clone().into_response(),
        };
    }

    StatusCode::NOT_FOUND.into_response()
}
