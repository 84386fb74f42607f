use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use channel_feed_mirror::clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
use channel_feed_mirror::config::{ClipboardBackend, Config};
use channel_feed_mirror::feed::FeedClient;
use channel_feed_mirror::poller::RefreshController;
use channel_feed_mirror::view::FeedView;
use channel_feed_mirror::web::{self, AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    info!("Starting channel-feed-mirror");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        posts_url = %config.posts_url(),
        channel = %config.channel_url,
        period_secs = config.refresh_period_secs,
        "Configuration loaded"
    );

    let client = FeedClient::new(&config).context("Failed to build HTTP client")?;
    let view = Arc::new(RwLock::new(FeedView::new(&config.channel_url)));
    let controller = RefreshController::new(client, view, config.refresh_period_secs);

    let clipboard: Arc<dyn Clipboard> = match config.clipboard_backend {
        ClipboardBackend::System => Arc::new(SystemClipboard),
        ClipboardBackend::Memory => Arc::new(MemoryClipboard::new()),
    };

    controller.start();

    let state = AppState::new(config, controller.clone(), clipboard);
    let web_handle = tokio::spawn(async move {
        if let Err(e) = web::serve(state).await {
            error!("Web server error: {e:#}");
        }
    });

    shutdown_signal().await;

    info!("Shutting down...");

    web_handle.abort();
    controller.dispose().await;

    info!("Shutdown complete");

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,channel_feed_mirror=debug"));

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
