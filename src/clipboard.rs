//! Clipboard access for the copy action.

use std::sync::Mutex;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::feed::PostId;
use crate::view::{FeedView, ToastKind};

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Somewhere text can be copied to.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`.
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// The clipboard of the machine the dashboard runs on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            arboard::Clipboard::new()
                .and_then(|mut cb| cb.set_text(text))
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))
        })
        .await?
    }
}

/// An in-process clipboard, for headless hosts.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
    reject: bool,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write.
    #[must_use]
    pub fn rejecting() -> Self {
        Self {
            contents: Mutex::new(None),
            reject: true,
        }
    }

    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.reject {
            return Err(ClipboardError::Unavailable("write rejected".to_string()));
        }
        *self
            .contents
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

/// Copy a post's text and report the outcome as a toast.
///
/// Failures are logged and shown, never retried.
pub async fn copy_to_clipboard(
    clipboard: &dyn Clipboard,
    view: &RwLock<FeedView>,
    id: &PostId,
    text: &str,
) -> Result<(), ClipboardError> {
    let result = clipboard.write_text(text).await;

    let mut view = view.write().await;
    match &result {
        Ok(()) => {
            debug!(post_id = %id, chars = text.chars().count(), "Copied post text");
            view.notify(
                format!("Text of post #{id} copied to the clipboard!"),
                ToastKind::Success,
                Instant::now(),
            );
        }
        Err(e) => {
            warn!(post_id = %id, "Copy failed: {e}");
            view.notify("Could not copy the text", ToastKind::Error, Instant::now());
        }
    }
    result
}
