//! In-memory view state of the dashboard page.
//!
//! Everything the page shows is rebuilt from the latest accepted fetch.
//! Responses carry the sequence number of the fetch that produced them and
//! only the newest one is applied, so an overlapping slow request can never
//! overwrite fresher data.

pub mod cards;
pub mod toast;

use std::time::Instant;

use chrono::Local;
use tracing::{debug, info};

use crate::constants::{
    DISPLAY_TIME_FORMAT, FALLBACK_POST_CONTENT, FALLBACK_POST_ID, LOAD_FAILED_MESSAGE,
    STATS_PULSE_FOR,
};
use crate::feed::{FetchError, Post, PostId, PostKind, PostList};

pub use cards::{CardRegistry, CardState, ToggleControl, ToggleOutcome, READ_MORE, SHOW_LESS};
pub use toast::{Notifications, Toast, ToastKind, ToastPhase};

/// What the post container currently holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Container {
    #[default]
    Loading,
    Empty,
    Cards(Vec<Post>),
}

/// The total-posts counter, pulsing briefly whenever it grows.
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalPosts {
    pub value: Option<u64>,
    pulsed_at: Option<Instant>,
}

impl TotalPosts {
    pub fn update(&mut self, count: u64, now: Instant) {
        if count > self.value.unwrap_or(0) {
            self.pulsed_at = Some(now);
        }
        self.value = Some(count);
    }

    #[must_use]
    pub fn is_pulsing(&self, now: Instant) -> bool {
        self.pulsed_at
            .is_some_and(|at| now.saturating_duration_since(at) < STATS_PULSE_FOR)
    }
}

/// Dashboard state shared between the refresh controller and request handlers.
#[derive(Debug)]
pub struct FeedView {
    channel_url: String,
    container: Container,
    banner: Option<String>,
    cards: CardRegistry,
    total_posts: TotalPosts,
    last_update: Option<String>,
    snapshot: Option<PostList>,
    notifications: Notifications,
    applied_seq: u64,
    revision: u64,
}

impl FeedView {
    #[must_use]
    pub fn new(channel_url: &str) -> Self {
        Self {
            channel_url: channel_url.trim_end_matches('/').to_string(),
            container: Container::Loading,
            banner: None,
            cards: CardRegistry::default(),
            total_posts: TotalPosts::default(),
            last_update: None,
            snapshot: None,
            notifications: Notifications::default(),
            applied_seq: 0,
            revision: 0,
        }
    }

    #[must_use]
    pub fn channel_url(&self) -> &str {
        &self.channel_url
    }

    #[must_use]
    pub fn container(&self) -> &Container {
        &self.container
    }

    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    #[must_use]
    pub fn cards(&self) -> &CardRegistry {
        &self.cards
    }

    #[must_use]
    pub fn total_posts(&self) -> TotalPosts {
        self.total_posts
    }

    /// Raw timestamp of the last successful upstream update.
    #[must_use]
    pub fn last_update(&self) -> Option<&str> {
        self.last_update.as_deref()
    }

    /// The most recently accepted post list, if any fetch has succeeded.
    #[must_use]
    pub fn snapshot(&self) -> Option<&PostList> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    #[must_use]
    pub fn applied_seq(&self) -> u64 {
        self.applied_seq
    }

    /// Bumped whenever the container or a card changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the container with the loading placeholder for fetch `seq`.
    ///
    /// Ignored when a newer fetch has already been applied.
    pub fn begin_load(&mut self, seq: u64) {
        if seq > self.applied_seq {
            self.container = Container::Loading;
            self.cards.clear();
            self.revision += 1;
        }
    }

    /// Replace the container with `posts`, or the empty state when there are none.
    pub fn render_posts(&mut self, posts: Vec<Post>) {
        self.cards.rebuild(&posts);
        self.container = if posts.is_empty() {
            Container::Empty
        } else {
            Container::Cards(posts)
        };
        self.revision += 1;
    }

    /// Apply a successful fetch. Returns `false` if the response was stale.
    pub fn apply_success(&mut self, seq: u64, list: PostList, now: Instant) -> bool {
        if !self.accept(seq) {
            return false;
        }

        info!(seq, posts = list.posts.len(), count = list.count, "Rendering posts");
        self.render_posts(list.posts.clone());
        self.total_posts.update(list.count, now);
        self.last_update.clone_from(&list.last_update);
        self.banner = None;
        self.snapshot = Some(list);
        true
    }

    /// Apply a failed fetch: show the error banner and the fallback post.
    ///
    /// Returns `false` if the response was stale.
    pub fn apply_failure(&mut self, seq: u64, error: &FetchError) -> bool {
        if !self.accept(seq) {
            return false;
        }

        self.banner = Some(format!("{LOAD_FAILED_MESSAGE} ({error})"));
        let fallback = fallback_post(&self.channel_url);
        self.render_posts(vec![fallback]);
        true
    }

    /// Flip a card's full text. See [`CardRegistry::toggle`].
    pub fn toggle_full_content(&mut self, id: &PostId) -> Option<ToggleOutcome> {
        let outcome = self.cards.toggle(id)?;
        self.revision += 1;
        Some(outcome)
    }

    /// Look up a rendered post by id.
    #[must_use]
    pub fn post(&self, id: &PostId) -> Option<(usize, &Post)> {
        match &self.container {
            Container::Cards(posts) => posts.iter().enumerate().find(|(_, p)| &p.id == id),
            _ => None,
        }
    }

    /// Map a raw id (as found in a URL path) to the id of a rendered post.
    ///
    /// `"42"` matches both `42` and `"42"` from the upstream.
    #[must_use]
    pub fn resolve_id(&self, raw: &str) -> PostId {
        match &self.container {
            Container::Cards(posts) => posts
                .iter()
                .find(|p| p.id.to_string() == raw)
                .map_or_else(|| PostId::from(raw), |p| p.id.clone()),
            _ => PostId::from(raw),
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) -> u64 {
        self.notifications.show(message, kind, now)
    }

    fn accept(&mut self, seq: u64) -> bool {
        if seq <= self.applied_seq {
            debug!(seq, applied = self.applied_seq, "Discarding stale response");
            return false;
        }
        self.applied_seq = seq;
        true
    }
}

/// The synthetic post shown when the upstream cannot be loaded.
#[must_use]
pub fn fallback_post(channel_url: &str) -> Post {
    Post {
        id: PostId::Int(FALLBACK_POST_ID),
        date: Local::now().format(DISPLAY_TIME_FORMAT).to_string(),
        content: FALLBACK_POST_CONTENT.to_string(),
        kind: PostKind::Text,
        telegram_link: Some(channel_url.trim_end_matches('/').to_string()),
        timestamp: None,
        channel: None,
    }
}
