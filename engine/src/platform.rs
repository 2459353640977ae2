//! Platform adapters.
//!
//! An adapter maps a [`ReconciledEntry`] to the payload a marketplace's
//! update endpoint expects and declares that endpoint's batch ceilings.
//! Bucketing and gap-filling are already done by the reconciler; adapters
//! only rename and reshape fields.

use crate::pager::Termination;
use crate::reconcile::{Currency, ReconciledEntry};
use crate::OfferId;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// A marketplace target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Seller,
    MarketFbs,
    MarketDbs,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Seller => "seller",
            Platform::MarketFbs => "market-fbs",
            Platform::MarketDbs => "market-dbs",
        })
    }
}

/// Kind of update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateKind {
    Stock,
    Price,
}

impl fmt::Display for UpdateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpdateKind::Stock => "stock",
            UpdateKind::Price => "price",
        })
    }
}

/// Maximum payloads per request, per update kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchLimits {
    pub stock: usize,
    pub price: usize,
}

impl BatchLimits {
    pub fn new(stock: usize, price: usize) -> Self {
        Self { stock, price }
    }

    /// Limit for one update kind.
    pub fn for_kind(&self, kind: UpdateKind) -> usize {
        match kind {
            UpdateKind::Stock => self.stock,
            UpdateKind::Price => self.price,
        }
    }
}

/// Maps reconciled entries to one platform's payload shapes.
pub trait PlatformAdapter {
    /// Payload of one stock directive
    type Stock: Serialize;
    /// Payload of one price directive
    type Price: Serialize;

    /// Which platform this adapter targets.
    fn platform(&self) -> Platform;

    /// How the platform's catalog listing terminates.
    fn termination(&self) -> Termination;

    /// Batch ceilings for stock and price updates.
    fn limits(&self) -> BatchLimits;

    /// Stock sent for offers that are not available.
    fn unavailable_stock(&self) -> u64 {
        0
    }

    /// Stock count to send for an entry.
    fn stock_count(&self, entry: &ReconciledEntry) -> u64 {
        if entry.is_available() {
            entry.stock
        } else {
            self.unavailable_stock()
        }
    }

    /// Build the stock directive for an entry.
    fn stock_payload(&self, entry: &ReconciledEntry) -> Self::Stock;

    /// Build the price directive for an entry, or `None` if it has no usable price.
    fn price_payload(&self, entry: &ReconciledEntry) -> Option<Self::Price>;

    /// Wrap a stock batch into a request body.
    fn stock_envelope(&self, batch: &[Self::Stock]) -> serde_json::Value;

    /// Wrap a price batch into a request body.
    fn price_envelope(&self, batch: &[Self::Price]) -> serde_json::Value;
}

// ============================================================================
// Seller
// ============================================================================

/// Seller stock directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerStock {
    pub offer_id: OfferId,
    pub stock: u64,
}

/// Seller price directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerPrice {
    pub auto_action_enabled: String,
    pub currency_code: String,
    pub offer_id: OfferId,
    pub old_price: String,
    pub price: String,
}

/// Adapter for the Seller platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerAdapter {
    limits: BatchLimits,
}

impl SellerAdapter {
    pub const DEFAULT_LIMITS: BatchLimits = BatchLimits {
        stock: 100,
        price: 1000,
    };

    pub fn new() -> Self {
        Self {
            limits: Self::DEFAULT_LIMITS,
        }
    }

    /// Override the batch ceilings.
    pub fn with_limits(mut self, limits: BatchLimits) -> Self {
        self.limits = limits;
        self
    }

    fn currency_code(currency: Currency) -> &'static str {
        match currency {
            Currency::Rub => "RUB",
        }
    }
}

impl Default for SellerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformAdapter for SellerAdapter {
    type Stock = SellerStock;
    type Price = SellerPrice;

    fn platform(&self) -> Platform {
        Platform::Seller
    }

    fn termination(&self) -> Termination {
        Termination::TotalReached
    }

    fn limits(&self) -> BatchLimits {
        self.limits
    }

    fn stock_payload(&self, entry: &ReconciledEntry) -> SellerStock {
        SellerStock {
            offer_id: entry.offer_id.clone(),
            stock: self.stock_count(entry),
        }
    }

    fn price_payload(&self, entry: &ReconciledEntry) -> Option<SellerPrice> {
        let price = entry.price.as_ref()?;
        Some(SellerPrice {
            auto_action_enabled: "UNKNOWN".to_string(),
            currency_code: Self::currency_code(entry.currency).to_string(),
            offer_id: entry.offer_id.clone(),
            old_price: "0".to_string(),
            price: price.clone(),
        })
    }

    fn stock_envelope(&self, batch: &[SellerStock]) -> serde_json::Value {
        json!({ "stocks": batch })
    }

    fn price_envelope(&self, batch: &[SellerPrice]) -> serde_json::Value {
        json!({ "prices": batch })
    }
}

// ============================================================================
// Market
// ============================================================================

/// Market fulfilment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketMode {
    /// Fulfilment by the marketplace's warehouses
    Fbs,
    /// Delivery by the seller
    Dbs,
}

/// One stock line of a Market stock directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStockItem {
    pub count: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub updated_at: String,
}

/// Market stock directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStock {
    pub sku: OfferId,
    pub warehouse_id: String,
    pub items: Vec<MarketStockItem>,
}

/// Price value of a Market price directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketPriceValue {
    pub value: u64,
    pub currency_id: String,
}

/// Market price directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub id: OfferId,
    pub price: MarketPriceValue,
}

/// Adapter for one Market campaign (FBS or DBS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketAdapter {
    mode: MarketMode,
    warehouse_id: String,
    updated_at: String,
    limits: BatchLimits,
}

impl MarketAdapter {
    pub const DEFAULT_LIMITS: BatchLimits = BatchLimits {
        stock: 2000,
        price: 500,
    };

    /// Stock type reported for sellable units.
    pub const STOCK_TYPE: &'static str = "FIT";

    /// Create an adapter. `updated_at` is the RFC 3339 stamp sent with every
    /// stock line of this run.
    pub fn new(mode: MarketMode, warehouse_id: impl Into<String>, updated_at: impl Into<String>) -> Self {
        Self {
            mode,
            warehouse_id: warehouse_id.into(),
            updated_at: updated_at.into(),
            limits: Self::DEFAULT_LIMITS,
        }
    }

    /// Override the batch ceilings.
    pub fn with_limits(mut self, limits: BatchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn mode(&self) -> MarketMode {
        self.mode
    }

    pub fn warehouse_id(&self) -> &str {
        &self.warehouse_id
    }

    fn currency_id(currency: Currency) -> &'static str {
        match currency {
            Currency::Rub => "RUR",
        }
    }
}

impl PlatformAdapter for MarketAdapter {
    type Stock = MarketStock;
    type Price = MarketPrice;

    fn platform(&self) -> Platform {
        match self.mode {
            MarketMode::Fbs => Platform::MarketFbs,
            MarketMode::Dbs => Platform::MarketDbs,
        }
    }

    fn termination(&self) -> Termination {
        Termination::CursorExhausted
    }

    fn limits(&self) -> BatchLimits {
        self.limits
    }

    fn stock_payload(&self, entry: &ReconciledEntry) -> MarketStock {
        MarketStock {
            sku: entry.offer_id.clone(),
            warehouse_id: self.warehouse_id.clone(),
            items: vec![MarketStockItem {
                count: self.stock_count(entry),
                kind: Self::STOCK_TYPE.to_string(),
                updated_at: self.updated_at.clone(),
            }],
        }
    }

    fn price_payload(&self, entry: &ReconciledEntry) -> Option<MarketPrice> {
        // Market takes a number; a price too large for u64 is as unusable as a blank one.
        let value = entry.price.as_ref()?.parse().ok()?;
        Some(MarketPrice {
            id: entry.offer_id.clone(),
            price: MarketPriceValue {
                value,
                currency_id: Self::currency_id(entry.currency).to_string(),
            },
        })
    }

    fn stock_envelope(&self, batch: &[MarketStock]) -> serde_json::Value {
        json!({ "skus": batch })
    }

    fn price_envelope(&self, batch: &[MarketPrice]) -> serde_json::Value {
        json!({ "offers": batch })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(offer_id: &str, stock: u64, price: Option<&str>) -> ReconciledEntry {
        ReconciledEntry {
            offer_id: offer_id.into(),
            stock,
            price: price.map(str::to_string),
            currency: Currency::Rub,
        }
    }

    #[test]
    fn seller_payloads() {
        let adapter = SellerAdapter::new();
        let e = entry("48852", 100, Some("5990"));

        assert_eq!(
            serde_json::to_value(adapter.stock_payload(&e)).unwrap(),
            json!({"offer_id": "48852", "stock": 100})
        );
        assert_eq!(
            serde_json::to_value(adapter.price_payload(&e).unwrap()).unwrap(),
            json!({
                "auto_action_enabled": "UNKNOWN",
                "currency_code": "RUB",
                "offer_id": "48852",
                "old_price": "0",
                "price": "5990",
            })
        );
    }

    #[test]
    fn seller_envelopes() {
        let adapter = SellerAdapter::new();
        let stocks = vec![adapter.stock_payload(&entry("A", 1, None))];
        assert_eq!(
            adapter.stock_envelope(&stocks),
            json!({"stocks": [{"offer_id": "A", "stock": 1}]})
        );
        assert_eq!(adapter.price_envelope(&[]), json!({"prices": []}));
    }

    #[test]
    fn market_payloads() {
        let adapter = MarketAdapter::new(MarketMode::Fbs, "wh-1", "2026-10-19T08:00:00Z");
        let e = entry("GA-100", 7, Some("12990"));

        assert_eq!(
            serde_json::to_value(adapter.stock_payload(&e)).unwrap(),
            json!({
                "sku": "GA-100",
                "warehouseId": "wh-1",
                "items": [{"count": 7, "type": "FIT", "updatedAt": "2026-10-19T08:00:00Z"}],
            })
        );
        assert_eq!(
            serde_json::to_value(adapter.price_payload(&e).unwrap()).unwrap(),
            json!({"id": "GA-100", "price": {"value": 12990, "currencyId": "RUR"}})
        );
    }

    #[test]
    fn market_modes_map_to_platforms() {
        let fbs = MarketAdapter::new(MarketMode::Fbs, "1", "t");
        let dbs = MarketAdapter::new(MarketMode::Dbs, "2", "t");
        assert_eq!(fbs.platform(), Platform::MarketFbs);
        assert_eq!(dbs.platform(), Platform::MarketDbs);
        assert_eq!(dbs.warehouse_id(), "2");
        assert_eq!(fbs.termination(), Termination::CursorExhausted);
    }

    #[test]
    fn missing_price_is_omitted() {
        let e = entry("A", 0, None);
        assert!(SellerAdapter::new().price_payload(&e).is_none());
        assert!(MarketAdapter::new(MarketMode::Dbs, "1", "t")
            .price_payload(&e)
            .is_none());
    }

    #[test]
    fn oversized_market_price_is_omitted() {
        let e = entry("A", 1, Some("99999999999999999999999"));
        assert!(MarketAdapter::new(MarketMode::Fbs, "1", "t")
            .price_payload(&e)
            .is_none());
        assert!(SellerAdapter::new().price_payload(&e).is_some());
    }

    #[test]
    fn default_limits() {
        assert_eq!(SellerAdapter::new().limits(), BatchLimits::new(100, 1000));
        let market = MarketAdapter::new(MarketMode::Fbs, "1", "t");
        assert_eq!(market.limits().for_kind(UpdateKind::Stock), 2000);
        assert_eq!(market.limits().for_kind(UpdateKind::Price), 500);

        let tuned = SellerAdapter::new().with_limits(BatchLimits::new(50, 900));
        assert_eq!(tuned.limits().price, 900);
    }

    #[test]
    fn platform_names() {
        assert_eq!(Platform::Seller.to_string(), "seller");
        assert_eq!(Platform::MarketFbs.to_string(), "market-fbs");
        assert_eq!(
            serde_json::to_value(Platform::MarketDbs).unwrap(),
            json!("market-dbs")
        );
    }
}
