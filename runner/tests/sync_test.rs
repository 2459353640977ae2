//! Integration tests for platform synchronization runs.
//!
//! Marketplaces are replaced by in-memory transports that replay canned
//! catalog pages and record every submitted body.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use stocksync_engine::{
    BatchLimits, FeedRecord, MarketAdapter, MarketMode, Page, Platform, QuantityExpr,
    SellerAdapter, UpdateKind,
};
use stocksync_runner::{
    Config, Orchestrator, PlatformOutcome, PlatformSync, SyncError, Synchronizer, Transport,
    TransportError,
};

/// In-memory marketplace.
#[derive(Default)]
struct MockTransport {
    pages: Mutex<VecDeque<Page>>,
    cursors: Mutex<Vec<String>>,
    submitted: Mutex<Vec<(UpdateKind, Value)>>,
    /// Fail the n-th (1-based) submission of this kind
    fail_on: Option<(UpdateKind, usize)>,
}

impl MockTransport {
    fn with_pages(pages: Vec<Page>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            ..Default::default()
        }
    }

    fn failing_on(mut self, kind: UpdateKind, nth: usize) -> Self {
        self.fail_on = Some((kind, nth));
        self
    }

    fn submitted(&self, kind: UpdateKind) -> Vec<Value> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, body)| body.clone())
            .collect()
    }

    fn cursors(&self) -> Vec<String> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn list_page(&self, cursor: &str) -> Result<Page, TransportError> {
        self.cursors.lock().unwrap().push(cursor.to_string());
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Status {
                endpoint: "list".into(),
                status: 503,
                body: "catalog unavailable".into(),
            })
    }

    async fn submit(&self, kind: UpdateKind, body: Value) -> Result<(), TransportError> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push((kind, body));
        let attempt = submitted.iter().filter(|(k, _)| *k == kind).count();

        match self.fail_on {
            Some((fail_kind, nth)) if fail_kind == kind && nth == attempt => {
                Err(TransportError::Status {
                    endpoint: "submit".into(),
                    status: 500,
                    body: "internal error".into(),
                })
            }
            _ => Ok(()),
        }
    }
}

fn scenario_feed() -> Vec<FeedRecord> {
    vec![
        FeedRecord::new("A", QuantityExpr::Abundant, "100.00"),
        FeedRecord::new("B", QuantityExpr::Reserved, "50.00"),
    ]
}

#[tokio::test]
async fn seller_end_to_end() {
    let transport = Arc::new(MockTransport::with_pages(vec![
        Page::new(["A", "B"], Some("B"), Some(3)),
        Page::new(["C"], Some("C"), Some(3)),
    ]));
    let sync = Synchronizer::new(SellerAdapter::new(), transport.clone());

    let report = sync.run(&scenario_feed()).await.unwrap();

    assert_eq!(report.platform, Platform::Seller);
    let stocks: Vec<(&str, u64)> = report
        .entries
        .iter()
        .map(|e| (e.offer_id.as_str(), e.stock))
        .collect();
    assert_eq!(stocks, vec![("A", 100), ("B", 0), ("C", 0)]);
    assert_eq!(report.entries[2].price, None);
    assert_eq!(report.available.len(), 1);
    assert_eq!(report.available[0].offer_id, "A");
    assert_eq!(report.stock_batches, 1);
    assert_eq!(report.price_batches, 1);

    assert_eq!(transport.cursors(), vec!["", "B"]);
    assert_eq!(
        transport.submitted(UpdateKind::Stock),
        vec![json!({"stocks": [
            {"offer_id": "A", "stock": 100},
            {"offer_id": "B", "stock": 0},
            {"offer_id": "C", "stock": 0},
        ]})]
    );

    let prices = transport.submitted(UpdateKind::Price);
    assert_eq!(prices.len(), 1);
    assert_eq!(prices[0]["prices"][0]["price"], "100");
    assert_eq!(prices[0]["prices"][1]["price"], "50");
    assert_eq!(prices[0]["prices"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn market_pagination_until_cursor_exhausted() {
    let transport = Arc::new(MockTransport::with_pages(vec![
        Page::new(["A", "B"], Some("t1"), None),
        Page::new(["B", "C"], Some("t2"), None),
        Page::new(["D"], Some("t3"), None),
        Page::new(Vec::<&str>::new(), None, None),
    ]));
    let adapter = MarketAdapter::new(MarketMode::Fbs, "501", "2026-10-19T06:00:00Z");
    let sync = Synchronizer::new(adapter, transport.clone());

    let universe = sync.collect_universe().await.unwrap();

    let ids: Vec<&str> = universe.iter().map(String::as_str).collect();
    assert_eq!(ids, vec!["A", "B", "C", "D"]);
    assert_eq!(transport.cursors(), vec!["", "t1", "t2", "t3"]);
}

#[tokio::test]
async fn market_stock_batches_respect_limit() {
    let ids: Vec<String> = (0..5).map(|i| format!("sku-{}", i)).collect();
    let transport = Arc::new(MockTransport::with_pages(vec![Page::new(
        ids.clone(),
        None,
        None,
    )]));
    let adapter = MarketAdapter::new(MarketMode::Dbs, "502", "2026-10-19T06:00:00Z")
        .with_limits(BatchLimits::new(2, 500));
    let sync = Synchronizer::new(adapter, transport.clone());

    let report = sync.run(&[]).await.unwrap();

    assert_eq!(report.platform, Platform::MarketDbs);
    assert_eq!(report.stock_batches, 3);
    // Nothing in the feed, so no prices to send.
    assert_eq!(report.price_batches, 0);
    assert!(report.available.is_empty());

    let bodies = transport.submitted(UpdateKind::Stock);
    let sizes: Vec<usize> = bodies
        .iter()
        .map(|b| b["skus"].as_array().unwrap().len())
        .collect();
    assert_eq!(sizes, vec![2, 2, 1]);
    assert_eq!(bodies[0]["skus"][0]["warehouseId"], "502");
    assert_eq!(bodies[0]["skus"][0]["items"][0]["count"], 0);
    assert!(transport.submitted(UpdateKind::Price).is_empty());
}

#[tokio::test]
async fn one_platform_failing_does_not_block_the_next() {
    let seller_ids: Vec<String> = (0..6).map(|i| format!("S{}", i)).collect();
    let seller_transport = Arc::new(
        MockTransport::with_pages(vec![Page::new(seller_ids, Some("S5"), Some(6))])
            .failing_on(UpdateKind::Stock, 2),
    );
    let seller = Synchronizer::new(
        SellerAdapter::new().with_limits(BatchLimits::new(2, 1000)),
        seller_transport.clone(),
    );

    let market_transport = Arc::new(MockTransport::with_pages(vec![Page::new(
        ["A", "B", "C"],
        None,
        None,
    )]));
    let market = Synchronizer::new(
        MarketAdapter::new(MarketMode::Fbs, "501", "2026-10-19T06:00:00Z"),
        market_transport.clone(),
    );

    let orchestrator = Orchestrator::new().with_platform(seller).with_platform(market);
    let report = orchestrator.run(&scenario_feed()).await;

    assert!(!report.is_success());
    assert_eq!(report.failed(), vec![Platform::Seller]);

    match &report.outcomes[0] {
        PlatformOutcome::Failed {
            platform: Platform::Seller,
            error:
                SyncError::Submit {
                    kind: UpdateKind::Stock,
                    batch: 2,
                    total: 3,
                    ..
                },
        } => {}
        other => panic!("unexpected seller outcome: {:?}", other),
    }
    // Batch 3 and the price update were never attempted.
    assert_eq!(seller_transport.submitted(UpdateKind::Stock).len(), 2);
    assert!(seller_transport.submitted(UpdateKind::Price).is_empty());

    let market_report = report.report(Platform::MarketFbs).unwrap();
    assert_eq!(market_report.entries.len(), 3);
    assert_eq!(market_report.available[0].offer_id, "A");
    assert_eq!(market_transport.submitted(UpdateKind::Stock).len(), 1);
    assert_eq!(market_transport.submitted(UpdateKind::Price).len(), 1);
}

#[tokio::test]
async fn catalog_failure_submits_nothing() {
    let transport = Arc::new(MockTransport::with_pages(vec![Page::new(
        ["A"],
        Some("next"),
        None,
    )]));
    let sync = Synchronizer::new(
        MarketAdapter::new(MarketMode::Fbs, "1", "2026-10-19T06:00:00Z"),
        transport.clone(),
    );

    let err = sync.run(&scenario_feed()).await.unwrap_err();

    assert!(matches!(err, SyncError::Catalog(TransportError::Status { status: 503, .. })));
    assert!(transport.submitted(UpdateKind::Stock).is_empty());
}

#[tokio::test]
async fn stalled_catalog_is_an_engine_error() {
    let transport = Arc::new(MockTransport::with_pages(vec![Page::new(
        Vec::<&str>::new(),
        Some("x"),
        Some(10),
    )]));
    let sync = Synchronizer::new(SellerAdapter::new(), transport);

    let err = sync.run(&scenario_feed()).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Engine(stocksync_engine::Error::PagingStalled { .. })
    ));
}

#[test]
fn orchestrator_from_config_orders_platforms() {
    let vars = [
        ("FEED_PATH", "feed.json"),
        ("CLIENT_ID", "42"),
        ("SELLER_TOKEN", "k"),
        ("MARKET_TOKEN", "t"),
        ("DBS_ID", "2"),
        ("WAREHOUSE_DBS_ID", "20"),
        ("FBS_ID", "1"),
        ("WAREHOUSE_FBS_ID", "10"),
    ];
    let config = Config::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
    .unwrap();

    let orchestrator = Orchestrator::from_config(&config, "2026-10-19T06:00:00Z").unwrap();
    assert_eq!(
        orchestrator.platforms(),
        vec![Platform::Seller, Platform::MarketFbs, Platform::MarketDbs]
    );
}
