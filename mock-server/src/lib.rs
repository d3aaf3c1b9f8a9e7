use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::State,
    http::{header, HeaderMap, Uri},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{debug, info};

pub use axum::http::StatusCode;

#[derive(Deserialize)]
pub struct GenerateQueries {
    pub user_content: String,
    #[serde(default = "default_n_queries")]
    pub n_queries: u32,
}

#[derive(Deserialize)]
pub struct Search {
    pub keyword: String,
}

#[derive(Deserialize)]
pub struct SearchQueries {
    pub user_content: String,
    #[serde(default = "default_n_queries")]
    pub n_queries: u32,
}

fn default_n_queries() -> u32 {
    1
}

/// A request as the server received it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Value,
}

/// Status and raw body returned in place of the normal handler output.
#[derive(Clone, Debug)]
pub struct CannedResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Default)]
struct Inner {
    recorded: Vec<RecordedRequest>,
    canned: Option<CannedResponse>,
}

/// Shared server state: the accepted key, every request seen, and an
/// optional canned response. Handles are cheap clones of one state.
#[derive(Clone)]
pub struct MockState {
    api_key: Arc<str>,
    inner: Arc<Mutex<Inner>>,
}

impl MockState {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: Arc::from(api_key),
            inner: Arc::default(),
        }
    }

    /// Answer every following request with `status` and `body`, after the
    /// request has been recorded and authenticated.
    pub fn respond_with(&self, status: StatusCode, body: impl Into<String>) {
        self.lock().canned = Some(CannedResponse {
            status,
            body: body.into(),
        });
    }

    pub fn clear_response(&self) {
        self.lock().canned = None;
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.lock().recorded.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.lock().recorded.last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-assertion.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub fn app(state: MockState) -> Router {
    Router::new()
        .route("/generate_queries", post(generate_queries))
        .route("/search", post(search))
        .route("/search_queries", post(search_queries))
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock aivene server listening");
    }
    axum::serve(listener, app(state)).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

/// Record the request, then apply authentication and any canned response.
/// `Err` carries the response to send instead of the handler's own.
fn intake(state: &MockState, uri: &Uri, headers: &HeaderMap, body: &Value) -> Result<(), Response> {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let authorization = header_str(header::AUTHORIZATION);
    debug!(path = uri.path(), "request received");

    let mut inner = state.lock();
    inner.recorded.push(RecordedRequest {
        path: uri.path().to_string(),
        authorization: authorization.clone(),
        content_type: header_str(header::CONTENT_TYPE),
        body: body.clone(),
    });

    let expected = format!("Bearer {}", state.api_key);
    if authorization.as_deref() != Some(expected.as_str()) {
        return Err(detail(StatusCode::UNAUTHORIZED, "invalid token"));
    }
    if let Some(canned) = &inner.canned {
        return Err((canned.status, canned.body.clone()).into_response());
    }
    Ok(())
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T, Response> {
    serde_json::from_value(body).map_err(|e| detail(StatusCode::UNPROCESSABLE_ENTITY, &e.to_string()))
}

fn require(field: &str, value: &str) -> Result<(), Response> {
    if value.is_empty() {
        return Err(detail(
            StatusCode::UNPROCESSABLE_ENTITY,
            &format!("{field} must not be empty"),
        ));
    }
    Ok(())
}

fn queries_for(user_content: &str, n_queries: u32) -> Vec<String> {
    (1..=n_queries).map(|i| format!("{user_content} {i}")).collect()
}

fn results_for(keyword: &str) -> Vec<Value> {
    vec![
        json!({
            "title": format!("{keyword} - latest news"),
            "url": "https://news.example.com/1",
        }),
        json!({
            "title": format!("{keyword} - analysis"),
            "url": "https://news.example.com/2",
        }),
    ]
}

async fn generate_queries(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Response> {
    intake(&state, &uri, &headers, &body)?;
    let input: GenerateQueries = decode(body)?;
    require("user_content", &input.user_content)?;
    Ok(Json(json!({
        "queries": queries_for(&input.user_content, input.n_queries),
    })))
}

async fn search(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Response> {
    intake(&state, &uri, &headers, &body)?;
    let input: Search = decode(body.clone())?;
    require("keyword", &input.keyword)?;
    Ok(Json(json!({
        "params": body,
        "results": results_for(&input.keyword),
    })))
}

async fn search_queries(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Response> {
    intake(&state, &uri, &headers, &body)?;
    let input: SearchQueries = decode(body.clone())?;
    require("user_content", &input.user_content)?;
    let searches: Vec<Value> = queries_for(&input.user_content, input.n_queries)
        .into_iter()
        .map(|query| {
            let results = results_for(&query);
            json!({ "query": query, "results": results })
        })
        .collect();
    Ok(Json(json!({
        "params": body,
        "searches": searches,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_queries_defaults_n_queries_to_one() {
        let input: GenerateQueries = serde_json::from_str(r#"{"user_content":"gpus"}"#).unwrap();
        assert_eq!(input.n_queries, 1);
    }

    #[test]
    fn search_rejects_missing_keyword() {
        let result: Result<Search, _> = serde_json::from_str(r#"{"depth":50}"#);
        assert!(result.is_err());
    }

    #[test]
    fn queries_are_numbered() {
        assert_eq!(queries_for("gpu", 2), vec!["gpu 1", "gpu 2"]);
        assert!(queries_for("gpu", 0).is_empty());
    }

    #[test]
    fn canned_response_can_be_cleared() {
        let state = MockState::new("k");
        state.respond_with(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(state.lock().canned.is_some());
        state.clear_response();
        assert!(state.lock().canned.is_none());
    }
}
