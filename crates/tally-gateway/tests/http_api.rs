use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tally_core::{
    ActorId, CounterError, LikeAction, LikeState, Likes, Slug, ViewCount, ViewRecorded, Views,
};
use tally_gateway::{App, AppState, Backend};
use tower::ServiceExt;

async fn memory_app() -> Router {
    let state = Backend::Memory.connect().await.unwrap();
    App::router(state)
}

fn get(uri: &str, ip: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("x-forwarded-for", ip)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, ip: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("x-forwarded-for", ip)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = memory_app().await;

    let (status, body) = send(&app, get("/health", "1.1.1.1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn unknown_slug_reads_as_zero() {
    let app = memory_app().await;

    let (status, body) = send(&app, get("/likes?slug=never-seen", "1.1.1.1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "count": 0, "liked": false }));

    let (status, body) = send(&app, get("/views?slug=never-seen", "1.1.1.1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "count": 0 }));
}

#[tokio::test]
async fn like_scenario_across_visitors() {
    let app = memory_app().await;

    let (_, body) = send(
        &app,
        post("/likes", "10.0.0.1", json!({ "slug": "my-post", "action": "like" })),
    )
    .await;
    assert_eq!(body, json!({ "count": 1, "liked": true }));

    let (_, body) = send(
        &app,
        post("/likes", "10.0.0.2", json!({ "slug": "my-post", "action": "like" })),
    )
    .await;
    assert_eq!(body, json!({ "count": 2, "liked": true }));

    let (_, body) = send(
        &app,
        post("/likes", "10.0.0.1", json!({ "slug": "my-post", "action": "unlike" })),
    )
    .await;
    assert_eq!(body, json!({ "count": 1, "liked": false }));

    let (status, body) = send(&app, get("/likes?slug=my-post", "10.0.0.3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "count": 1, "liked": false }));

    let (_, body) = send(&app, get("/likes?slug=my-post", "10.0.0.2")).await;
    assert_eq!(body, json!({ "count": 1, "liked": true }));
}

#[tokio::test]
async fn repeated_like_from_same_visitor_counts_once() {
    let app = memory_app().await;

    for _ in 0..3 {
        let (status, body) = send(
            &app,
            post("/likes", "10.0.0.1", json!({ "slug": "my-post", "action": "like" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "count": 1, "liked": true }));
    }
}

#[tokio::test]
async fn views_are_not_deduplicated_by_the_server() {
    let app = memory_app().await;

    let (_, first) = send(&app, post("/views", "10.0.0.1", json!({ "slug": "my-post" }))).await;
    let (_, second) = send(&app, post("/views", "10.0.0.1", json!({ "slug": "my-post" }))).await;

    assert_eq!(first, json!({ "count": 1, "isNewView": true }));
    assert_eq!(second, json!({ "count": 2, "isNewView": true }));

    let (_, body) = send(&app, get("/views?slug=my-post", "10.0.0.9")).await;
    assert_eq!(body, json!({ "count": 2 }));
}

#[tokio::test]
async fn missing_or_invalid_slug_is_rejected() {
    let app = memory_app().await;

    let (status, body) = send(&app, get("/likes", "1.1.1.1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("slug"));

    let (status, _) = send(&app, get("/views?slug=", "1.1.1.1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        post("/likes", "1.1.1.1", json!({ "slug": "  ", "action": "like" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, post("/views", "1.1.1.1", json!({ "slug": "a:b" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unicode_slugs_are_accepted() {
    let app = memory_app().await;

    let (status, body) = send(&app, get("/likes?slug=caf%C3%A9", "10.0.0.1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "count": 0, "liked": false }));

    let (status, body) = send(
        &app,
        post("/likes", "10.0.0.1", json!({ "slug": "caf\u{e9}", "action": "like" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "count": 1, "liked": true }));

    let (_, body) = send(&app, get("/likes?slug=caf%C3%A9", "10.0.0.1")).await;
    assert_eq!(body, json!({ "count": 1, "liked": true }));
}

#[tokio::test]
async fn malformed_bodies_are_rejected() {
    let app = memory_app().await;

    let (status, _) = send(&app, post("/likes", "1.1.1.1", json!({ "slug": "my-post" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        post("/likes", "1.1.1.1", json!({ "slug": "my-post", "action": "love" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid action"));

    // Nothing was recorded for the rejected action.
    let (_, body) = send(&app, get("/likes?slug=my-post", "1.1.1.1")).await;
    assert_eq!(body, json!({ "count": 0, "liked": false }));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/views")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn fingerprint_identifies_visitors_without_proxy_headers() {
    let app = memory_app().await;

    let like = |agent: &'static str| {
        Request::builder()
            .method(Method::POST)
            .uri("/likes")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, agent)
            .header(header::ACCEPT_LANGUAGE, "en-US")
            .body(Body::from(
                json!({ "slug": "my-post", "action": "like" }).to_string(),
            ))
            .unwrap()
    };

    send(&app, like("firefox")).await;
    send(&app, like("firefox")).await;
    let (_, body) = send(&app, like("safari")).await;

    assert_eq!(body, json!({ "count": 2, "liked": true }));
}

#[tokio::test]
async fn file_backend_serves_the_same_contract() {
    let dir = tempfile::tempdir().unwrap();
    let state = Backend::select(None, dir.path()).connect().await.unwrap();
    let app = App::router(state);

    send(
        &app,
        post("/likes", "10.0.0.1", json!({ "slug": "my-post", "action": "like" })),
    )
    .await;
    let (_, body) = send(&app, get("/likes?slug=my-post", "10.0.0.1")).await;
    assert_eq!(body, json!({ "count": 1, "liked": true }));

    assert!(dir.path().join("likes.json").exists());
}

struct DownLikes;

#[async_trait]
impl Likes for DownLikes {
    async fn apply(
        &self,
        _slug: &Slug,
        _actor: &ActorId,
        _action: LikeAction,
    ) -> Result<LikeState, CounterError> {
        Err(CounterError::Storage("connection refused".to_string()))
    }

    async fn peek(&self, _slug: &Slug, _actor: &ActorId) -> Result<LikeState, CounterError> {
        Err(CounterError::Storage("connection refused".to_string()))
    }
}

struct DownViews;

#[async_trait]
impl Views for DownViews {
    async fn record(&self, _slug: &Slug, _actor: &ActorId) -> Result<ViewRecorded, CounterError> {
        Err(CounterError::Storage("connection refused".to_string()))
    }

    async fn peek(&self, _slug: &Slug) -> Result<ViewCount, CounterError> {
        Err(CounterError::Storage("connection refused".to_string()))
    }
}

#[tokio::test]
async fn storage_failures_are_service_unavailable() {
    let app = App::router(AppState::new(Arc::new(DownLikes), Arc::new(DownViews)));

    let (status, body) = send(
        &app,
        post("/likes", "1.1.1.1", json!({ "slug": "my-post", "action": "like" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, get("/views?slug=my-post", "1.1.1.1")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // Input errors are still reported before storage is touched.
    let (status, _) = send(&app, get("/likes?slug=", "1.1.1.1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
