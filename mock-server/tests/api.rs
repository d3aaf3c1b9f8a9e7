use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, MockState};
use serde_json::{json, Value};
use tower::ServiceExt;

const KEY: &str = "test-key";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(uri: &str, token: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_returns_401_with_detail() {
    let resp = app(MockState::new(KEY))
        .oneshot(json_request("/search", None, r#"{"keyword":"gpu"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await, json!({"detail": "invalid token"}));
}

#[tokio::test]
async fn wrong_token_returns_401() {
    let resp = app(MockState::new(KEY))
        .oneshot(json_request("/generate_queries", Some("nope"), r#"{"user_content":"gpu"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- generate_queries ---

#[tokio::test]
async fn generate_queries_returns_requested_count() {
    let resp = app(MockState::new(KEY))
        .oneshot(json_request(
            "/generate_queries",
            Some(KEY),
            r#"{"user_content":"gpu market","n_queries":3}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["queries"], json!(["gpu market 1", "gpu market 2", "gpu market 3"]));
}

#[tokio::test]
async fn generate_queries_empty_content_returns_422() {
    let resp = app(MockState::new(KEY))
        .oneshot(json_request("/generate_queries", Some(KEY), r#"{"user_content":""}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(resp).await["detail"], "user_content must not be empty");
}

// --- search ---

#[tokio::test]
async fn search_echoes_params_and_returns_results() {
    let resp = app(MockState::new(KEY))
        .oneshot(json_request("/search", Some(KEY), r#"{"keyword":"gpu","depth":0}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["params"], json!({"keyword": "gpu", "depth": 0}));
    assert_eq!(body["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn search_missing_keyword_returns_422() {
    let resp = app(MockState::new(KEY))
        .oneshot(json_request("/search", Some(KEY), r#"{"depth":50}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(resp).await["detail"].is_string());
}

#[tokio::test]
async fn search_queries_runs_one_search_per_query() {
    let resp = app(MockState::new(KEY))
        .oneshot(json_request(
            "/search_queries",
            Some(KEY),
            r#"{"user_content":"ai chips","n_queries":2}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let searches = body["searches"].as_array().unwrap();
    assert_eq!(searches.len(), 2);
    assert_eq!(searches[1]["query"], "ai chips 2");
}

#[tokio::test]
async fn get_is_not_allowed() {
    let resp = app(MockState::new(KEY))
        .oneshot(Request::builder().uri("/search").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- recording and canned responses ---

#[tokio::test]
async fn requests_are_recorded() {
    let state = MockState::new(KEY);
    app(state.clone())
        .oneshot(json_request("/search", Some("wrong"), r#"{"keyword":"gpu"}"#))
        .await
        .unwrap();

    let recorded = state.last_request().unwrap();
    assert_eq!(recorded.path, "/search");
    assert_eq!(recorded.authorization.as_deref(), Some("Bearer wrong"));
    assert_eq!(recorded.content_type.as_deref(), Some("application/json"));
    assert_eq!(recorded.body, json!({"keyword": "gpu"}));
}

#[tokio::test]
async fn canned_response_replaces_handler_output() {
    let state = MockState::new(KEY);
    state.respond_with(StatusCode::INTERNAL_SERVER_ERROR, "");

    let resp = app(state.clone())
        .oneshot(json_request("/search", Some(KEY), r#"{"keyword":"gpu"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_bytes(resp).await.is_empty());

    state.clear_response();
    let resp = app(state.clone())
        .oneshot(json_request("/search", Some(KEY), r#"{"keyword":"gpu"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.recorded().len(), 2);
}

#[tokio::test]
async fn canned_response_does_not_bypass_auth() {
    let state = MockState::new(KEY);
    state.respond_with(StatusCode::OK, "ok");

    let resp = app(state)
        .oneshot(json_request("/search", None, r#"{"keyword":"gpu"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
