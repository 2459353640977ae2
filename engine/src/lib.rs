//! # Stocksync Engine
//!
//! A deterministic reconciliation engine that keeps marketplace listings in
//! line with a supplier's stock and price feed.
//!
//! This crate provides the core logic of a synchronization run: collecting
//! the offers a marketplace lists, merging them with the feed into one
//! directive per offer, and shaping those directives into platform-sized
//! request batches. The same inputs always produce the same outputs.
//!
//! ## Design Principles
//!
//! - **No IO**: The engine never touches the network or the filesystem
//! - **Deterministic**: Output order follows input order, never hash order
//! - **One pipeline**: Every platform shares the same reconciler and batcher;
//!   platforms differ only in their [`PlatformAdapter`]
//!
//! ## Core Concepts
//!
//! ### Feed
//!
//! [`FeedRecord`]s carry a supplier code, a [`QuantityExpr`] and a raw price.
//! Quantities are parsed once: `">10"` is [`QuantityExpr::Abundant`], `"1"` is
//! [`QuantityExpr::Reserved`]. [`bucket`] turns them into advertised stock.
//!
//! ### Universe
//!
//! The [`OfferUniverse`] is every offer id a marketplace campaign lists,
//! gathered page by page with a [`CatalogPager`].
//!
//! ### Reconciliation
//!
//! The [`Reconciler`] emits one [`ReconciledEntry`] per universe member.
//! Offers missing from the feed get zero stock.
//!
//! ### Batching
//!
//! A [`SyncPlan`] maps entries through an adapter and splits them with
//! [`Batches`] according to the platform's [`BatchLimits`].
//!
//! ## Quick Start
//!
//! ```rust
//! use stocksync_engine::{
//!     FeedRecord, OfferUniverse, PlatformAdapter, QuantityExpr, Reconciler, SellerAdapter,
//!     SyncPlan,
//! };
//!
//! // 1. Feed and listed offers
//! let feed = vec![
//!     FeedRecord::new("A", QuantityExpr::Abundant, "100.00"),
//!     FeedRecord::new("B", QuantityExpr::Reserved, "50.00"),
//! ];
//! let universe: OfferUniverse = ["A", "B", "C"].into_iter().collect();
//!
//! // 2. Reconcile
//! let reconciliation = Reconciler::default().reconcile(&feed, &universe);
//! assert_eq!(reconciliation.entries.len(), 3);
//! assert_eq!(reconciliation.entries[0].stock, 100);
//!
//! // 3. Plan and batch for a platform
//! let adapter = SellerAdapter::new();
//! let plan = SyncPlan::build(&adapter, &reconciliation);
//! for batch in plan.stock_batches().unwrap() {
//!     let body = adapter.stock_envelope(batch);
//!     assert_eq!(body["stocks"].as_array().unwrap().len(), 3);
//! }
//! ```

pub mod batch;
pub mod error;
pub mod feed;
pub mod pager;
pub mod plan;
pub mod platform;
pub mod quantity;
pub mod reconcile;
pub mod universe;

// Re-export main types at crate root
pub use batch::{batches, Batches};
pub use error::Error;
pub use feed::{
    parse_feed, Cell, FeedIssue, FeedParse, FeedRecord, RawFeedRow, CODE_COLUMN, PRICE_COLUMN,
    QUANTITY_COLUMN,
};
pub use pager::{CatalogPager, Page, Progress, Termination, INITIAL_CURSOR};
pub use plan::SyncPlan;
pub use platform::{
    BatchLimits, MarketAdapter, MarketMode, MarketPrice, MarketStock, Platform, PlatformAdapter,
    SellerAdapter, SellerPrice, SellerStock, UpdateKind,
};
pub use quantity::{bucket, QuantityExpr, ABUNDANT_STOCK, RESERVED_STOCK};
pub use reconcile::{normalize_price, Currency, ReconciledEntry, Reconciler, Reconciliation};
pub use universe::OfferUniverse;

/// Marketplace offer identifier (the supplier code on the feed side).
pub type OfferId = String;
