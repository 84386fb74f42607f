//! Per-card interactive state, keyed by post id.

use std::collections::HashMap;

use crate::constants::TRUNCATE_CHARS;
use crate::feed::{Post, PostId};

/// Label and icon of the expand control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleControl {
    pub label: &'static str,
    pub icon: &'static str,
}

pub const READ_MORE: ToggleControl = ToggleControl {
    label: "Read more",
    icon: "fas fa-book-open",
};

pub const SHOW_LESS: ToggleControl = ToggleControl {
    label: "Show less",
    icon: "fas fa-book",
};

/// State of one rendered card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardState {
    /// Content is longer than the truncation threshold.
    pub truncated: bool,
    /// The full-text block is visible.
    pub expanded: bool,
}

impl CardState {
    #[must_use]
    pub fn control(&self) -> ToggleControl {
        if self.expanded {
            SHOW_LESS
        } else {
            READ_MORE
        }
    }
}

/// Result of toggling a card's full text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub expanded: bool,
    pub control: ToggleControl,
    /// The block was just revealed and should be scrolled into view.
    pub scroll_into_view: bool,
}

/// Card states for the currently rendered posts.
///
/// Rebuilt on every render; expansion does not survive a refresh.
#[derive(Debug, Clone, Default)]
pub struct CardRegistry {
    cards: HashMap<PostId, CardState>,
}

impl CardRegistry {
    /// Replace all entries with fresh, collapsed states for `posts`.
    pub fn rebuild(&mut self, posts: &[Post]) {
        self.cards.clear();
        for post in posts {
            let truncated = post.content.chars().count() > TRUNCATE_CHARS;
            self.cards.insert(
                post.id.clone(),
                CardState {
                    truncated,
                    expanded: false,
                },
            );
        }
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    #[must_use]
    pub fn get(&self, id: &PostId) -> Option<CardState> {
        self.cards.get(id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Flip the full-text visibility of a truncated card.
    ///
    /// Returns `None` for unknown ids and for cards that have no hidden text.
    pub fn toggle(&mut self, id: &PostId) -> Option<ToggleOutcome> {
        let state = self.cards.get_mut(id).filter(|s| s.truncated)?;
        state.expanded = !state.expanded;
        Some(ToggleOutcome {
            expanded: state.expanded,
            control: state.control(),
            scroll_into_view: state.expanded,
        })
    }
}
