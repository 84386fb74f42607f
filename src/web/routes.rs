use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use maud::Render;
use serde::Serialize;

use super::AppState;
use crate::clipboard::copy_to_clipboard;
use crate::feed::PostListResponse;
use crate::render::{self, PostCard};

const SCROLL_INTO_VIEW: HeaderName = HeaderName::from_static("x-scroll-into-view");
const REVISION: HeaderName = HeaderName::from_static("x-revision");

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/fragments/status", get(status_fragment))
        .route("/fragments/posts", get(posts_fragment))
        .route("/refresh", post(refresh))
        .route("/posts/:id/toggle", post(toggle_post))
        .route("/posts/:id/copy", post(copy_post))
        .route("/api/posts", get(api_posts))
        .route("/api/stats", get(api_stats))
        .route("/healthz", get(health))
}

// ========== HTML Routes ==========

async fn home(State(state): State<AppState>) -> Response {
    let status = state.controller.status();
    let view = state.controller.view().read().await;
    Html(render::render_page(&view, status, Instant::now()).into_string()).into_response()
}

async fn status_fragment(State(state): State<AppState>) -> Response {
    let status = state.controller.status();
    let view = state.controller.view().read().await;
    Html(render::render_status_region(&view, status, Instant::now()).into_string()).into_response()
}

async fn posts_fragment(State(state): State<AppState>) -> Response {
    let view = state.controller.view().read().await;
    Html(render::render_posts_region(&view).into_string()).into_response()
}

// ========== Action Routes ==========

async fn refresh(State(state): State<AppState>) -> Response {
    // Failures are already rendered as the error banner and fallback post.
    if let Err(e) = state.controller.manual_refresh().await {
        tracing::debug!("Manual refresh failed: {e}");
    }

    let view = state.controller.view().read().await;
    Html(render::render_posts_region(&view).into_string()).into_response()
}

async fn toggle_post(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut view = state.controller.view().write().await;
    let id = view.resolve_id(&id);

    let Some(outcome) = view.toggle_full_content(&id) else {
        return (StatusCode::NOT_FOUND, "Post not found").into_response();
    };
    let Some((index, post)) = view.post(&id) else {
        return (StatusCode::NOT_FOUND, "Post not found").into_response();
    };

    let card = PostCard::new(post, index, view.channel_url())
        .with_state(view.cards().get(&id).unwrap_or_default())
        .render()
        .into_string();

    let scroll = HeaderValue::from_static(if outcome.scroll_into_view {
        "true"
    } else {
        "false"
    });
    let revision = HeaderValue::from(view.revision());

    (
        [(SCROLL_INTO_VIEW, scroll), (REVISION, revision)],
        Html(card),
    )
        .into_response()
}

async fn copy_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !is_same_origin(&headers) {
        tracing::warn!(post_id = %id, "Rejected cross-origin copy request");
        return (StatusCode::FORBIDDEN, "Cross-origin request").into_response();
    }

    // Only text the server already holds is ever written to the clipboard.
    let (id, text) = {
        let view = state.controller.view().read().await;
        let id = view.resolve_id(&id);
        let Some((_, post)) = view.post(&id) else {
            return (StatusCode::NOT_FOUND, "Post not found").into_response();
        };
        let text = post.content.clone();
        (id, text)
    };

    // The outcome is reported to the user as a toast either way.
    let _ = copy_to_clipboard(
        state.clipboard.as_ref(),
        state.controller.view(),
        &id,
        &text,
    )
    .await;

    let status = state.controller.status();
    let view = state.controller.view().read().await;
    Html(render::render_status_region(&view, status, Instant::now()).into_string()).into_response()
}

/// Requests without an `Origin` header (same-origin GETs, non-browser
/// clients) pass; otherwise the origin's authority must equal `Host`.
fn is_same_origin(headers: &HeaderMap) -> bool {
    let Some(origin) = headers.get(header::ORIGIN) else {
        return true;
    };
    let Some(host) = headers.get(header::HOST).and_then(|h| h.to_str().ok()) else {
        return false;
    };
    origin
        .to_str()
        .ok()
        .and_then(|o| o.split_once("://"))
        .is_some_and(|(_, authority)| authority.trim_end_matches('/') == host)
}

// ========== API Routes ==========

async fn api_posts(State(state): State<AppState>) -> Response {
    let view = state.controller.view().read().await;
    match view.snapshot() {
        Some(list) => Json(PostListResponse::success(list)).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(PostListResponse {
                status: "error".to_string(),
                posts: Vec::new(),
                count: 0,
                last_update: None,
                error: Some("No posts loaded yet".to_string()),
            }),
        )
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_posts: u64,
    pub last_update: Option<String>,
    pub channel: String,
    pub next_refresh_secs: u32,
}

async fn api_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let status = state.controller.status();
    let view = state.controller.view().read().await;
    Json(StatsResponse {
        total_posts: view.total_posts().value.unwrap_or(0),
        last_update: view.last_update().map(render::format::display_timestamp),
        channel: view.channel_url().to_string(),
        next_refresh_secs: status.countdown,
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Local::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(origin: Option<&str>, host: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_str(host).unwrap());
        if let Some(origin) = origin {
            headers.insert(header::ORIGIN, HeaderValue::from_str(origin).unwrap());
        }
        headers
    }

    #[test]
    fn test_same_origin_check() {
        assert!(is_same_origin(&headers(None, "127.0.0.1:8080")));
        assert!(is_same_origin(&headers(
            Some("http://127.0.0.1:8080"),
            "127.0.0.1:8080"
        )));
        assert!(!is_same_origin(&headers(
            Some("https://evil.example"),
            "127.0.0.1:8080"
        )));
        assert!(!is_same_origin(&headers(Some("null"), "127.0.0.1:8080")));
    }
}
