//! The set of offers currently listed on one marketplace campaign.

use crate::OfferId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An insertion-ordered set of offer identifiers.
///
/// Membership is what reconciliation cares about; the order is kept so that
/// output built from the universe is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<OfferId>", into = "Vec<OfferId>")]
pub struct OfferUniverse {
    order: Vec<OfferId>,
    members: HashSet<OfferId>,
}

impl OfferUniverse {
    /// Create an empty universe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an offer id. Returns `false` if it was already present.
    pub fn insert(&mut self, offer_id: impl Into<OfferId>) -> bool {
        let offer_id = offer_id.into();
        if self.members.contains(&offer_id) {
            return false;
        }
        self.members.insert(offer_id.clone());
        self.order.push(offer_id);
        true
    }

    /// Check membership.
    pub fn contains(&self, offer_id: &str) -> bool {
        self.members.contains(offer_id)
    }

    /// Number of distinct offers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &OfferId> {
        self.order.iter()
    }

    /// Offer ids in insertion order.
    pub fn as_slice(&self) -> &[OfferId] {
        &self.order
    }
}

impl<S: Into<OfferId>> FromIterator<S> for OfferUniverse {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut universe = Self::new();
        universe.extend(iter);
        universe
    }
}

impl<S: Into<OfferId>> Extend<S> for OfferUniverse {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for offer_id in iter {
            self.insert(offer_id);
        }
    }
}

impl From<Vec<OfferId>> for OfferUniverse {
    fn from(ids: Vec<OfferId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<OfferUniverse> for Vec<OfferId> {
    fn from(universe: OfferUniverse) -> Self {
        universe.order
    }
}

impl<'a> IntoIterator for &'a OfferUniverse {
    type Item = &'a OfferId;
    type IntoIter = std::slice::Iter<'a, OfferId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}
