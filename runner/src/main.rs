//! Stocksync - synchronizes marketplace stock and prices with a supplier feed.
//!
//! Runs once and exits: non-zero when any platform failed to synchronize.

use stocksync_runner::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stocksync_runner=info,stocksync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!(feed = %config.feed, "Starting Stocksync");

    let report = stocksync_runner::run(&config).await?;
    tracing::info!(run_id = %report.run_id, "All platforms synchronized");

    Ok(())
}
