//! Refresh controller: one ticking timer drives both the visible countdown
//! and the periodic fetch.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::feed::{FeedClient, FetchError};
use crate::view::{FeedView, ToastKind};

/// Seconds remaining until the next automatic refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    period: u32,
    remaining: u32,
}

impl Countdown {
    #[must_use]
    pub fn new(period: u32) -> Self {
        let period = period.max(1);
        Self {
            period,
            remaining: period,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn period(&self) -> u32 {
        self.period
    }

    /// Advance by one second. Returns `true` when the countdown reached zero;
    /// it is then already reset to the full period.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.remaining = self.period;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.remaining = self.period;
    }
}

/// Snapshot of the controller for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshStatus {
    pub countdown: u32,
    /// A manual refresh is running; the refresh control is disabled.
    pub refreshing: bool,
}

struct Inner {
    client: FeedClient,
    view: Arc<RwLock<FeedView>>,
    countdown: Mutex<Countdown>,
    next_seq: AtomicU64,
    /// Manual refreshes in flight.
    manual_in_flight: AtomicUsize,
    tick_interval: Duration,
}

struct Running {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns the refresh timer for the page session.
///
/// Cloning shares the same controller.
#[derive(Clone)]
pub struct RefreshController {
    inner: Arc<Inner>,
    running: Arc<Mutex<Option<Running>>>,
}

impl RefreshController {
    #[must_use]
    pub fn new(client: FeedClient, view: Arc<RwLock<FeedView>>, period_secs: u32) -> Self {
        Self::with_tick_interval(client, view, period_secs, Duration::from_secs(1))
    }

    /// Like [`new`](Self::new) with a custom tick length.
    #[must_use]
    pub fn with_tick_interval(
        client: FeedClient,
        view: Arc<RwLock<FeedView>>,
        period_secs: u32,
        tick_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                view,
                countdown: Mutex::new(Countdown::new(period_secs)),
                next_seq: AtomicU64::new(0),
                manual_in_flight: AtomicUsize::new(0),
                tick_interval,
            }),
            running: Arc::new(Mutex::new(None)),
        }
    }

    #[must_use]
    pub fn view(&self) -> &Arc<RwLock<FeedView>> {
        &self.inner.view
    }

    #[must_use]
    pub fn status(&self) -> RefreshStatus {
        RefreshStatus {
            countdown: self.inner.countdown().remaining(),
            refreshing: self.inner.manual_in_flight.load(Ordering::SeqCst) > 0,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock_running().is_some()
    }

    /// Load posts once and start the ticking timer. Does nothing if already running.
    pub fn start(&self) {
        let mut running = self.lock_running();
        if running.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let this = self.clone();
        let token = cancel.clone();
        let handle = tokio::spawn(async move { this.run(token).await });

        *running = Some(Running { cancel, handle });
        info!(
            period_secs = self.inner.countdown().period(),
            "Refresh controller started"
        );
    }

    /// Stop the timer. A fetch already in flight is left to finish.
    pub fn stop(&self) {
        if let Some(running) = self.lock_running().take() {
            running.cancel.cancel();
            info!("Refresh controller stopped");
        }
    }

    /// Stop the timer and wait for its task to exit.
    pub async fn dispose(self) {
        let running = self.lock_running().take();
        if let Some(running) = running {
            running.cancel.cancel();
            if let Err(e) = running.handle.await {
                error!("Refresh task failed: {e}");
            }
            info!("Refresh controller disposed");
        }
    }

    /// Advance the countdown by one tick. Returns `true` when a fetch is due.
    pub fn tick(&self) -> bool {
        let due = self
            .inner
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tick();
        if due {
            debug!("Countdown elapsed");
        }
        due
    }

    /// Fetch and apply the posts list once.
    ///
    /// Each call takes the next sequence number; a response that arrives
    /// after a newer one has been applied is discarded.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after it has been rendered as a banner and
    /// fallback post.
    pub async fn load_posts(&self) -> Result<(), FetchError> {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.view.write().await.begin_load(seq);

        let result = self.inner.client.fetch_posts().await;

        let mut view = self.inner.view.write().await;
        match result {
            Ok(list) => {
                if !view.apply_success(seq, list, Instant::now()) {
                    debug!(seq, "Stale posts response ignored");
                }
                Ok(())
            }
            Err(e) => {
                warn!(seq, url = %self.inner.client.posts_url(), "Failed to load posts: {e}");
                view.apply_failure(seq, &e);
                Err(e)
            }
        }
    }

    /// Refresh now, in response to the user.
    ///
    /// The refresh control stays disabled until every overlapping manual
    /// fetch has completed. The countdown restarts afterwards either way.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, already rendered as a banner and fallback post.
    pub async fn manual_refresh(&self) -> Result<(), FetchError> {
        let in_flight = InFlight::enter(&self.inner.manual_in_flight);
        let result = self.load_posts().await;
        drop(in_flight);

        self.inner
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset();

        if result.is_ok() {
            self.inner.view.write().await.notify(
                "Posts refreshed!",
                ToastKind::Success,
                Instant::now(),
            );
        }
        result
    }

    async fn run(self, cancel: CancellationToken) {
        tokio::select! {
            () = cancel.cancelled() => return,
            _ = self.load_posts() => {}
        }

        let mut interval = tokio::time::interval(self.inner.tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = interval.tick() => {
                    if self.tick() {
                        let this = self.clone();
                        tokio::spawn(async move {
                            let _ = this.load_posts().await;
                        });
                    }
                }
            }
        }
    }

    fn lock_running(&self) -> std::sync::MutexGuard<'_, Option<Running>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Counts one manual refresh for as long as it lives, including when the
/// request future is dropped early.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Inner {
    fn countdown(&self) -> Countdown {
        *self.countdown.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
