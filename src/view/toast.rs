//! Transient toast notifications.
//!
//! Toasts are timestamped on creation and their phase is derived from the
//! elapsed time, so no timer task is needed to hide or remove them.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::constants::{TOAST_ENTER_DELAY, TOAST_EXIT_GRACE, TOAST_VISIBLE_FOR};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Success,
    Error,
}

impl ToastKind {
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Success => "fas fa-check-circle",
            Self::Error => "fas fa-exclamation-circle",
        }
    }
}

/// Where a toast is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Attached but not yet visible; becomes visible on the next frame.
    Entering,
    Shown,
    /// Exit transition running.
    Leaving,
    Expired,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    created_at: Instant,
}

impl Toast {
    #[must_use]
    pub fn phase(&self, now: Instant) -> ToastPhase {
        let age = now.saturating_duration_since(self.created_at);
        if age < TOAST_ENTER_DELAY {
            ToastPhase::Entering
        } else if age < TOAST_VISIBLE_FOR {
            ToastPhase::Shown
        } else if age < TOAST_VISIBLE_FOR + TOAST_EXIT_GRACE {
            ToastPhase::Leaving
        } else {
            ToastPhase::Expired
        }
    }

    /// Time left until the toast is removed.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        (TOAST_VISIBLE_FOR + TOAST_EXIT_GRACE)
            .saturating_sub(now.saturating_duration_since(self.created_at))
    }
}

/// All toasts currently attached to the page. No queueing or dedup.
#[derive(Debug, Default)]
pub struct Notifications {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl Notifications {
    /// Attach a new toast and return its id.
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind, now: Instant) -> u64 {
        self.prune(now);
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            message: message.into(),
            kind,
            created_at: now,
        });
        self.next_id
    }

    /// Drop expired toasts.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.phase(now) != ToastPhase::Expired);
    }

    /// Toasts still attached at `now`, oldest first.
    pub fn active(&self, now: Instant) -> impl Iterator<Item = (&Toast, ToastPhase)> {
        self.toasts
            .iter()
            .map(move |t| (t, t.phase(now)))
            .filter(|(_, phase)| *phase != ToastPhase::Expired)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
