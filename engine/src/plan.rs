//! Submission plans: adapter-mapped payloads of one reconciliation.

use crate::batch::Batches;
use crate::error::Result;
use crate::platform::{BatchLimits, Platform, PlatformAdapter};
use crate::reconcile::Reconciliation;
use crate::OfferId;

/// Stock and price payloads for one platform, ready to be batched.
#[derive(Debug, Clone)]
pub struct SyncPlan<S, P> {
    /// Target platform
    pub platform: Platform,
    /// One stock directive per reconciled entry, in entry order
    pub stocks: Vec<S>,
    /// Price directives for entries with a usable price, in entry order
    pub prices: Vec<P>,
    /// Offers with a feed price the platform cannot accept (e.g. out of range)
    pub unpriced: Vec<OfferId>,
    limits: BatchLimits,
}

impl<S, P> SyncPlan<S, P> {
    /// Build a plan by mapping every entry through the adapter.
    pub fn build<A>(adapter: &A, reconciliation: &Reconciliation) -> Self
    where
        A: PlatformAdapter<Stock = S, Price = P>,
    {
        let stocks = reconciliation
            .entries
            .iter()
            .map(|entry| adapter.stock_payload(entry))
            .collect();
        let mut prices = Vec::new();
        let mut unpriced = Vec::new();
        for entry in &reconciliation.entries {
            match adapter.price_payload(entry) {
                Some(price) => prices.push(price),
                None if entry.price.is_some() => unpriced.push(entry.offer_id.clone()),
                None => {}
            }
        }

        Self {
            platform: adapter.platform(),
            stocks,
            prices,
            unpriced,
            limits: adapter.limits(),
        }
    }

    /// Stock payloads in batches of the platform's stock limit.
    pub fn stock_batches(&self) -> Result<Batches<'_, S>> {
        Batches::new(&self.stocks, self.limits.stock)
    }

    /// Price payloads in batches of the platform's price limit.
    pub fn price_batches(&self) -> Result<Batches<'_, P>> {
        Batches::new(&self.prices, self.limits.price)
    }

    /// Batch ceilings used by this plan.
    pub fn limits(&self) -> BatchLimits {
        self.limits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::feed::FeedRecord;
    use crate::platform::{MarketAdapter, MarketMode, SellerAdapter};
    use crate::quantity::QuantityExpr;
    use crate::reconcile::Reconciler;
    use crate::universe::OfferUniverse;

    fn reconciliation(listed: usize) -> Reconciliation {
        let universe: OfferUniverse = (0..listed).map(|i| format!("sku-{}", i)).collect();
        let feed: Vec<FeedRecord> = (0..listed)
            .step_by(2)
            .map(|i| FeedRecord::new(format!("sku-{}", i), QuantityExpr::Exact(3), "10.00"))
            .collect();
        Reconciler::default().reconcile(&feed, &universe)
    }

    #[test]
    fn plan_covers_every_entry_with_stock() {
        let plan = SyncPlan::build(&SellerAdapter::new(), &reconciliation(250));

        assert_eq!(plan.platform, Platform::Seller);
        assert_eq!(plan.stocks.len(), 250);
        // Gap-filled entries carry no price.
        assert_eq!(plan.prices.len(), 125);

        let stock_batches = plan.stock_batches().unwrap();
        assert_eq!(stock_batches.len(), 3);
        assert_eq!(plan.price_batches().unwrap().len(), 1);
    }

    #[test]
    fn market_plan_uses_market_limits() {
        let adapter = MarketAdapter::new(MarketMode::Dbs, "wh", "t")
            .with_limits(BatchLimits::new(40, 30));
        let plan = SyncPlan::build(&adapter, &reconciliation(100));

        assert_eq!(plan.platform, Platform::MarketDbs);
        let sizes: Vec<usize> = plan.stock_batches().unwrap().iter().map(<[_]>::len).collect();
        assert_eq!(sizes, vec![40, 40, 20]);
        let sizes: Vec<usize> = plan.price_batches().unwrap().iter().map(<[_]>::len).collect();
        assert_eq!(sizes, vec![30, 20]);
    }

    #[test]
    fn out_of_range_market_price_is_reported() {
        let universe: OfferUniverse = ["A", "B", "C"].into_iter().collect();
        let feed = vec![
            FeedRecord::new("A", QuantityExpr::Exact(2), "99999999999999999999999.00"),
            FeedRecord::new("B", QuantityExpr::Exact(2), "1 500.00"),
        ];
        let reconciliation = Reconciler::default().reconcile(&feed, &universe);

        let market = SyncPlan::build(&MarketAdapter::new(MarketMode::Fbs, "wh", "t"), &reconciliation);
        assert_eq!(market.prices.len(), 1);
        // C has no price at all and is not reported.
        assert_eq!(market.unpriced, vec!["A"]);

        let seller = SyncPlan::build(&SellerAdapter::new(), &reconciliation);
        assert_eq!(seller.prices.len(), 2);
        assert!(seller.unpriced.is_empty());
    }

    #[test]
    fn zero_limit_is_an_error() {
        let adapter = SellerAdapter::new().with_limits(BatchLimits::new(0, 10));
        let plan = SyncPlan::build(&adapter, &reconciliation(4));
        assert_eq!(plan.stock_batches().unwrap_err(), Error::InvalidBatchSize(0));
    }
}
