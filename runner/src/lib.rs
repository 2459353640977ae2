//! Stocksync Runner - keeps marketplace stock and prices in line with a supplier feed.
//!
//! The runner wires the stocksync-engine pipeline to real marketplace APIs:
//! it loads the supplier feed (a local export or the published archive), then
//! synchronizes every configured platform (Seller, Market FBS, Market DBS) one
//! after another.

pub mod config;
pub mod error;
pub mod feed;
pub mod orchestrator;
pub mod sync;
pub mod transport;

pub use config::{Config, ConfigError, FeedLocation};
pub use error::{AppError, SyncError};
pub use feed::{load_feed, ArchiveFeed, FeedError, FeedSource, JsonFileFeed};
pub use orchestrator::{Orchestrator, OrchestratorReport, PlatformOutcome};
pub use sync::{PlatformSync, RunReport, Synchronizer};
pub use transport::{MarketClient, SellerClient, Transport, TransportError};

/// Timestamp format expected in Market stock updates.
pub const MARKET_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Load the feed and synchronize every configured platform.
pub async fn run(config: &Config) -> error::Result<OrchestratorReport> {
    let feed = match &config.feed {
        FeedLocation::File(path) => load_feed(&JsonFileFeed::new(path)).await?,
        FeedLocation::Archive { url, entry } => {
            load_feed(&ArchiveFeed::new(url, entry)?).await?
        }
    };

    let updated_at = chrono::Utc::now()
        .format(MARKET_TIMESTAMP_FORMAT)
        .to_string();
    let orchestrator = Orchestrator::from_config(config, &updated_at)?;
    tracing::info!(platforms = ?orchestrator.platforms(), "Starting synchronization");

    let report = orchestrator.run(&feed).await;

    let failed = report.failed().len();
    if failed > 0 {
        return Err(AppError::PlatformsFailed {
            failed,
            total: report.outcomes.len(),
        });
    }

    Ok(report)
}
