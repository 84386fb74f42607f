//! Shared constants used across the application.

use std::time::Duration;

/// User agent string sent with upstream requests.
pub const USER_AGENT: &str = concat!("channel-feed-mirror/", env!("CARGO_PKG_VERSION"));

/// Channel root used for post links when none is configured.
pub const DEFAULT_CHANNEL_URL: &str = "https://t.me/oprosokolopolit";

/// Seconds between automatic refreshes.
pub const DEFAULT_REFRESH_PERIOD_SECS: u32 = 30;

/// Posts longer than this many characters are truncated with a "Read more" control.
pub const TRUNCATE_CHARS: usize = 300;

/// Marker appended to truncated content.
pub const ELLIPSIS: &str = "...";

/// Per-card reveal delay step, in seconds.
pub const CARD_REVEAL_STEP_SECS: f64 = 0.1;

/// Id of the synthetic post shown when the upstream cannot be reached.
pub const FALLBACK_POST_ID: i64 = 999;

/// Text of the synthetic fallback post.
pub const FALLBACK_POST_CONTENT: &str =
    "This is a demo post. Real posts will appear once the server is reachable.";

/// Error message used when the upstream reports a failure without details.
pub const DEFAULT_RESPONSE_ERROR: &str = "Unknown error";

/// Banner shown above the fallback post when a refresh fails.
pub const LOAD_FAILED_MESSAGE: &str =
    "Could not load posts. Check the connection to the server.";

/// Time a toast waits before becoming visible (one animation frame).
pub const TOAST_ENTER_DELAY: Duration = Duration::from_millis(16);

/// Time a toast stays on screen.
pub const TOAST_VISIBLE_FOR: Duration = Duration::from_secs(3);

/// Exit transition grace period before a hidden toast is removed.
pub const TOAST_EXIT_GRACE: Duration = Duration::from_millis(300);

/// How long the total-posts counter pulses after growing.
pub const STATS_PULSE_FOR: Duration = Duration::from_secs(1);

/// Display format for timestamps (day.month.year, hours:minutes:seconds).
pub const DISPLAY_TIME_FORMAT: &str = "%d.%m.%Y, %H:%M:%S";
