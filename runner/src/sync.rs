//! Per-platform synchronization run.
//!
//! One run pages the catalog, reconciles it with the feed, and submits stock
//! then price batches strictly one at a time. The first failing request ends
//! the run for that platform.

use crate::error::SyncError;
use crate::transport::Transport;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use stocksync_engine::{
    Batches, CatalogPager, FeedRecord, OfferUniverse, Platform, PlatformAdapter, ReconciledEntry,
    Reconciler, SyncPlan, UpdateKind,
};

/// Outcome of a successful platform run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub platform: Platform,
    /// Every directive sent, in transmission order
    pub entries: Vec<ReconciledEntry>,
    /// Directives with non-zero stock
    pub available: Vec<ReconciledEntry>,
    pub stock_batches: usize,
    pub price_batches: usize,
}

/// A platform that can be synchronized against the feed.
#[async_trait]
pub trait PlatformSync: Send + Sync {
    fn platform(&self) -> Platform;

    async fn run(&self, feed: &[FeedRecord]) -> Result<RunReport, SyncError>;
}

/// Runs the engine pipeline for one platform adapter over one transport.
pub struct Synchronizer<A> {
    adapter: A,
    transport: Arc<dyn Transport>,
    reconciler: Reconciler,
}

impl<A> Synchronizer<A>
where
    A: PlatformAdapter + Send + Sync,
    A::Stock: Send + Sync,
    A::Price: Send + Sync,
{
    /// Create a new synchronizer.
    pub fn new(adapter: A, transport: Arc<dyn Transport>) -> Self {
        Self {
            adapter,
            transport,
            reconciler: Reconciler::default(),
        }
    }

    /// Use a custom reconciler.
    pub fn with_reconciler(mut self, reconciler: Reconciler) -> Self {
        self.reconciler = reconciler;
        self
    }

    /// Page through the platform's catalog.
    pub async fn collect_universe(&self) -> Result<OfferUniverse, SyncError> {
        let mut pager = CatalogPager::new(self.adapter.termination());

        while let Some(cursor) = pager.cursor() {
            let page = self
                .transport
                .list_page(cursor)
                .await
                .map_err(SyncError::Catalog)?;
            pager.absorb(page)?;
        }

        tracing::debug!(pages = pager.pages(), "Catalog paging complete");
        Ok(pager.into_universe())
    }

    async fn submit_all<T, F>(
        &self,
        kind: UpdateKind,
        batches: Batches<'_, T>,
        envelope: F,
    ) -> Result<usize, SyncError>
    where
        T: Sync,
        F: Fn(&[T]) -> serde_json::Value + Send + Sync,
    {
        let total = batches.len();

        for (index, batch) in batches.iter().enumerate() {
            let body = envelope(batch);
            self.transport
                .submit(kind, body)
                .await
                .map_err(|source| SyncError::Submit {
                    kind,
                    batch: index + 1,
                    total,
                    source,
                })?;

            tracing::debug!(%kind, batch = index + 1, total, size = batch.len(), "Batch accepted");
        }

        Ok(total)
    }
}

#[async_trait]
impl<A> PlatformSync for Synchronizer<A>
where
    A: PlatformAdapter + Send + Sync,
    A::Stock: Send + Sync,
    A::Price: Send + Sync,
{
    fn platform(&self) -> Platform {
        self.adapter.platform()
    }

    async fn run(&self, feed: &[FeedRecord]) -> Result<RunReport, SyncError> {
        let universe = self.collect_universe().await?;
        tracing::info!(offers = universe.len(), "Catalog collected");

        let reconciliation = self.reconciler.reconcile(feed, &universe);
        tracing::info!(
            matched = reconciliation.matched,
            gap_filled = reconciliation.gap_filled,
            dropped = reconciliation.dropped,
            "Feed reconciled"
        );
        if !reconciliation.blank_prices.is_empty() {
            tracing::warn!(
                offers = ?reconciliation.blank_prices,
                "Blank prices, price update omitted"
            );
        }

        let plan = SyncPlan::build(&self.adapter, &reconciliation);
        if !plan.unpriced.is_empty() {
            tracing::warn!(
                offers = ?plan.unpriced,
                "Prices not accepted by platform, price update omitted"
            );
        }

        let stock_batches = self
            .submit_all(UpdateKind::Stock, plan.stock_batches()?, |batch| {
                self.adapter.stock_envelope(batch)
            })
            .await?;
        let price_batches = self
            .submit_all(UpdateKind::Price, plan.price_batches()?, |batch| {
                self.adapter.price_envelope(batch)
            })
            .await?;

        let available = reconciliation.available().into_iter().cloned().collect();

        Ok(RunReport {
            platform: self.adapter.platform(),
            entries: reconciliation.entries,
            available,
            stock_batches,
            price_batches,
        })
    }
}
