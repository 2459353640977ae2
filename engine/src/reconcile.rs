//! Reconciliation of the supplier feed against a marketplace's listed offers.
//!
//! Every offer in the universe gets exactly one [`ReconciledEntry`]. Offers
//! the feed knows about take their stock and price from it; the rest are
//! gap-filled with zero stock so the marketplace stops selling them.
//!
//! # Algorithm
//!
//! 1. Index the feed by code (first occurrence of a code wins)
//! 2. Walk the universe in order, emitting an entry for every matched offer
//! 3. Compute the unmatched offers as universe minus matched
//! 4. Append a zero-stock, price-less entry for each of them, in universe order
//!
//! The output is therefore "matched first, then unmatched". This only
//! affects transmission order.

use crate::feed::FeedRecord;
use crate::quantity::bucket;
use crate::universe::OfferUniverse;
use crate::OfferId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Currency of feed prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Russian rouble
    #[default]
    Rub,
}

/// The stock and price directive for one listed offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledEntry {
    /// Marketplace offer id
    pub offer_id: OfferId,
    /// Stock to advertise
    pub stock: u64,
    /// Integer price string; `None` when there is nothing to send
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Currency of `price`
    pub currency: Currency,
}

impl ReconciledEntry {
    /// An entry for an offer the feed does not cover.
    pub fn unavailable(offer_id: impl Into<OfferId>, currency: Currency) -> Self {
        Self {
            offer_id: offer_id.into(),
            stock: 0,
            price: None,
            currency,
        }
    }

    /// Check if the entry advertises any stock.
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }
}

/// Result of reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    /// One entry per universe member, matched first
    pub entries: Vec<ReconciledEntry>,
    /// Entries taken from the feed
    pub matched: usize,
    /// Entries filled with zero stock
    pub gap_filled: usize,
    /// Feed records whose code is not listed on the marketplace
    pub dropped: usize,
    /// Matched offers whose price normalized to nothing
    pub blank_prices: Vec<OfferId>,
}

impl Reconciliation {
    /// Entries with non-zero stock.
    pub fn available(&self) -> Vec<&ReconciledEntry> {
        self.entries.iter().filter(|e| e.is_available()).collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merges the feed into a universe of listed offers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    currency: Currency,
}

impl Reconciler {
    /// Create a new reconciler for prices in `currency`.
    pub fn new(currency: Currency) -> Self {
        Self { currency }
    }

    /// Reconcile the feed against the universe.
    pub fn reconcile(&self, feed: &[FeedRecord], universe: &OfferUniverse) -> Reconciliation {
        let mut by_code: HashMap<&str, &FeedRecord> = HashMap::with_capacity(feed.len());
        for record in feed {
            by_code.entry(record.code.as_str()).or_insert(record);
        }

        let dropped = feed
            .iter()
            .filter(|record| !universe.contains(&record.code))
            .count();

        let mut entries = Vec::with_capacity(universe.len());
        let mut matched: HashSet<&str> = HashSet::with_capacity(universe.len());
        let mut blank_prices = Vec::new();

        for offer_id in universe {
            let Some(record) = by_code.get(offer_id.as_str()) else {
                continue;
            };

            let price = normalize_price(&record.price);
            if price.is_empty() {
                blank_prices.push(offer_id.clone());
            }

            entries.push(ReconciledEntry {
                offer_id: offer_id.clone(),
                stock: bucket(record.quantity),
                price: Some(price).filter(|p| !p.is_empty()),
                currency: self.currency,
            });
            matched.insert(offer_id.as_str());
        }

        let remaining: Vec<&OfferId> = universe
            .iter()
            .filter(|id| !matched.contains(id.as_str()))
            .collect();

        let gap_filled = remaining.len();
        entries.extend(
            remaining
                .into_iter()
                .map(|id| ReconciledEntry::unavailable(id.clone(), self.currency)),
        );

        Reconciliation {
            entries,
            matched: matched.len(),
            gap_filled,
            dropped,
            blank_prices,
        }
    }
}

/// Reduce a formatted price to its integer digits.
///
/// Everything from the first `.` on is discarded, then every non-digit is
/// stripped: `"5'990.00 руб."` becomes `"5990"`. A price with no digits
/// before the decimal point yields an empty string.
pub fn normalize_price(price: &str) -> String {
    let whole = price.split('.').next().unwrap_or_default();
    whole.chars().filter(char::is_ascii_digit).collect()
}
