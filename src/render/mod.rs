//! Maud HTML rendering for the dashboard.
//!
//! - `format`: post text to markup (links, line breaks, truncation)
//! - `card`: the post card component
//! - `feed`: posts and status regions, empty/loading/error states
//! - `layout`: page skeleton with the inline swap script

pub mod card;
pub mod feed;
pub mod format;
pub mod layout;

use std::time::Instant;

use maud::{html, Markup};

use crate::poller::RefreshStatus;
use crate::view::FeedView;

pub use card::{PostCard, PostPresentation};
pub use feed::{render_container, render_posts_region, render_status_region};
pub use format::{format_content, truncate_content};
pub use layout::BaseLayout;

/// Title shown in the browser tab and page header.
pub const PAGE_TITLE: &str = "Channel Feed";

/// Render the full dashboard page.
#[must_use]
pub fn render_page(view: &FeedView, status: RefreshStatus, now: Instant) -> Markup {
    let content = html! {
        (render_status_region(view, status, now))
        (render_posts_region(view))
    };

    BaseLayout::new(PAGE_TITLE)
        .with_channel(view.channel_url())
        .render(content)
}
