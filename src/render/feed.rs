//! Dynamic regions of the dashboard: the post container and the status bar.

use std::time::Instant;

use maud::{html, Markup, Render};

use crate::poller::RefreshStatus;
use crate::render::card::PostCard;
use crate::render::format::display_timestamp;
use crate::view::{Container, FeedView, Toast, ToastPhase};

/// Placeholder shown while a fetch is running.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadingState;

impl Render for LoadingState {
    fn render(&self) -> Markup {
        html! {
            div class="loading" {
                div class="spinner" {}
                p { "Loading posts from the server..." }
            }
        }
    }
}

/// Shown when the upstream returned no posts.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    pub channel_url: &'a str,
}

impl<'a> EmptyState<'a> {
    #[must_use]
    pub const fn new(channel_url: &'a str) -> Self {
        Self { channel_url }
    }

    fn handle(&self) -> String {
        let name = self
            .channel_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        format!("@{name}")
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="no-posts" {
                i class="fas fa-inbox" {}
                h3 { "No posts yet" }
                p { "New posts from the channel will show up here as soon as they are published." }
                p class="subscribe" {
                    i class="fab fa-telegram" {}
                    " Subscribe to the channel: "
                    a href=(self.channel_url) target="_blank" rel="noopener noreferrer" class="telegram-link" {
                        (self.handle())
                    }
                }
            }
        }
    }
}

/// Error banner with a retry control.
#[derive(Debug, Clone)]
pub struct ErrorBanner<'a> {
    pub message: &'a str,
}

impl Render for ErrorBanner<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="error-message" role="alert" {
                i class="fas fa-exclamation-triangle" {}
                h3 { "Loading failed" }
                p { (self.message) }
                button type="button" class="retry-btn" onclick="refreshPosts()" {
                    i class="fas fa-redo" {}
                    " Try again"
                }
            }
        }
    }
}

/// Render the post container for the current view.
#[must_use]
pub fn render_container(view: &FeedView) -> Markup {
    match view.container() {
        Container::Loading => LoadingState.render(),
        Container::Empty => EmptyState::new(view.channel_url()).render(),
        Container::Cards(posts) => html! {
            @for (index, post) in posts.iter().enumerate() {
                (PostCard::new(post, index, view.channel_url())
                    .with_state(view.cards().get(&post.id).unwrap_or_default()))
            }
        },
    }
}

/// The posts region: optional error banner followed by the container.
#[must_use]
pub fn render_posts_region(view: &FeedView) -> Markup {
    html! {
        div id="posts-region" data-revision=(view.revision()) {
            @if let Some(message) = view.banner() {
                (ErrorBanner { message })
            }
            div id="posts-container" class="posts-container" {
                (render_container(view))
            }
        }
    }
}

/// A single toast notification.
#[derive(Debug, Clone)]
pub struct ToastView<'a> {
    pub toast: &'a Toast,
    pub phase: ToastPhase,
    pub now: Instant,
}

impl Render for ToastView<'_> {
    fn render(&self) -> Markup {
        let toast = self.toast;
        let class = match self.phase {
            ToastPhase::Shown => format!("notification {} show", toast.kind.class()),
            _ => format!("notification {}", toast.kind.class()),
        };
        let remaining_ms = toast.remaining(self.now).as_millis().to_string();

        html! {
            div class=(class) id=(format!("toast-{}", toast.id)) data-remaining-ms=(remaining_ms) {
                i class=(toast.kind.icon()) {}
                " " (toast.message)
            }
        }
    }
}

/// The status region: counters, countdown, refresh control and toasts.
#[must_use]
pub fn render_status_region(view: &FeedView, status: RefreshStatus, now: Instant) -> Markup {
    let total = view.total_posts();
    let total_class = if total.is_pulsing(now) {
        "stat-number pulse"
    } else {
        "stat-number"
    };
    let refresh_icon = if status.refreshing {
        "fas fa-sync fa-spin"
    } else {
        "fas fa-redo"
    };

    html! {
        div id="status-region" data-revision=(view.revision()) {
            div class="stats-bar" {
                div class="stat" {
                    span id="total-posts" class=(total_class) {
                        (total.value.map_or_else(|| "-".to_string(), |v| v.to_string()))
                    }
                    span class="stat-label" { "posts" }
                }
                div class="stat" {
                    span class="stat-label" { "Last update: " }
                    span class="last-update" {
                        (view.last_update().map_or_else(|| "-".to_string(), display_timestamp))
                    }
                }
                div class="stat" {
                    span class="stat-label" { "Next refresh in " }
                    span id="countdown" { (status.countdown) }
                    span class="stat-label" { "s" }
                }
                button type="button" id="refresh-btn" class="refresh-btn" onclick="refreshPosts()" disabled[status.refreshing] {
                    i class=(refresh_icon) {}
                    " Refresh"
                }
            }
            div class="notifications" {
                @for (toast, phase) in view.notifications().active(now) {
                    (ToastView { toast, phase, now })
                }
            }
        }
    }
}
