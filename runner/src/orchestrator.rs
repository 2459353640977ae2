//! Runs every configured platform and collects their outcomes.
//!
//! Platforms share nothing mutable: each run pages its own catalog and
//! reconciles into its own buffers. A failing platform is logged and
//! reported, and the next platform still runs.

use crate::config::Config;
use crate::error::SyncError;
use crate::sync::{PlatformSync, RunReport, Synchronizer};
use crate::transport::{MarketClient, SellerClient, TransportError};
use std::sync::Arc;
use stocksync_engine::{FeedRecord, MarketAdapter, Platform, SellerAdapter};
use tracing::Instrument;
use uuid::Uuid;

/// Result of one platform's run.
#[derive(Debug)]
pub enum PlatformOutcome {
    Completed(RunReport),
    Failed { platform: Platform, error: SyncError },
}

impl PlatformOutcome {
    pub fn platform(&self) -> Platform {
        match self {
            PlatformOutcome::Completed(report) => report.platform,
            PlatformOutcome::Failed { platform, .. } => *platform,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, PlatformOutcome::Completed(_))
    }
}

/// Outcomes of a full run, in platform order.
#[derive(Debug)]
pub struct OrchestratorReport {
    pub run_id: Uuid,
    pub outcomes: Vec<PlatformOutcome>,
}

impl OrchestratorReport {
    /// Check if every platform completed.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(PlatformOutcome::is_completed)
    }

    /// Platforms that failed.
    pub fn failed(&self) -> Vec<Platform> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_completed())
            .map(PlatformOutcome::platform)
            .collect()
    }

    /// Report of a completed platform.
    pub fn report(&self, platform: Platform) -> Option<&RunReport> {
        self.outcomes.iter().find_map(|outcome| match outcome {
            PlatformOutcome::Completed(report) if report.platform == platform => Some(report),
            _ => None,
        })
    }
}

/// Sequentially synchronizes a list of platforms.
#[derive(Default)]
pub struct Orchestrator {
    platforms: Vec<Box<dyn PlatformSync>>,
}

impl Orchestrator {
    /// Create an orchestrator with no platforms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a platform; platforms run in insertion order.
    pub fn with_platform(mut self, platform: impl PlatformSync + 'static) -> Self {
        self.platforms.push(Box::new(platform));
        self
    }

    /// Build the platforms enabled in `config`.
    ///
    /// `updated_at` is the stock timestamp sent to Market for this run.
    pub fn from_config(config: &Config, updated_at: &str) -> Result<Self, TransportError> {
        let mut orchestrator = Self::new();

        if let Some(seller) = &config.seller {
            let client = SellerClient::new(&seller.api_url, &seller.client_id, &seller.token)?;
            let adapter = SellerAdapter::new().with_limits(seller.limits);
            orchestrator = orchestrator.with_platform(Synchronizer::new(adapter, Arc::new(client)));
        }

        for campaign in [&config.market_fbs, &config.market_dbs].into_iter().flatten() {
            let client = MarketClient::new(&campaign.api_url, &campaign.campaign_id, &campaign.token)?;
            let adapter = MarketAdapter::new(campaign.mode, &campaign.warehouse_id, updated_at)
                .with_limits(campaign.limits);
            orchestrator = orchestrator.with_platform(Synchronizer::new(adapter, Arc::new(client)));
        }

        Ok(orchestrator)
    }

    /// Platforms in run order.
    pub fn platforms(&self) -> Vec<Platform> {
        self.platforms.iter().map(|p| p.platform()).collect()
    }

    /// Run every platform against the same feed.
    pub async fn run(&self, feed: &[FeedRecord]) -> OrchestratorReport {
        let run_id = Uuid::new_v4();
        let mut outcomes = Vec::with_capacity(self.platforms.len());

        for sync in &self.platforms {
            let platform = sync.platform();
            let span = tracing::info_span!("sync", %run_id, %platform);

            let outcome = match sync.run(feed).instrument(span).await {
                Ok(report) => {
                    tracing::info!(
                        %platform,
                        entries = report.entries.len(),
                        available = report.available.len(),
                        stock_batches = report.stock_batches,
                        price_batches = report.price_batches,
                        "Platform synchronized"
                    );
                    PlatformOutcome::Completed(report)
                }
                Err(error) => {
                    tracing::error!(%platform, %error, "Platform synchronization failed");
                    PlatformOutcome::Failed { platform, error }
                }
            };
            outcomes.push(outcome);
        }

        OrchestratorReport { run_id, outcomes }
    }
}
