//! Supplier quantity expressions and the stock bucketing policy.
//!
//! The supplier publishes quantities as text. Two values carry special
//! meaning: `">10"` means the item is plentiful and `"1"` means the last unit
//! is reserved. Both are parsed into tagged variants exactly once, so nothing
//! downstream compares raw strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stock advertised for an item the supplier reports as plentiful.
pub const ABUNDANT_STOCK: u64 = 100;

/// Stock advertised for an item whose single remaining unit is reserved.
pub const RESERVED_STOCK: u64 = 0;

const ABUNDANT_MARKER: &str = ">10";
const RESERVED_MARKER: &str = "1";

/// A quantity as published by the supplier feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "count", rename_all = "camelCase")]
pub enum QuantityExpr {
    /// An exact unit count
    Exact(u64),
    /// "More than ten"
    Abundant,
    /// Exactly one unit left, held back
    Reserved,
}

/// Error returned when a quantity string matches none of the known forms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised quantity {0:?}")]
pub struct ParseQuantityError(pub String);

impl FromStr for QuantityExpr {
    type Err = ParseQuantityError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

        // Markers match on text: "01" is a plain count of one.
        match compact.as_str() {
            ABUNDANT_MARKER => Ok(QuantityExpr::Abundant),
            RESERVED_MARKER => Ok(QuantityExpr::Reserved),
            _ => compact
                .parse()
                .map(QuantityExpr::Exact)
                .map_err(|_| ParseQuantityError(raw.to_string())),
        }
    }
}

impl fmt::Display for QuantityExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuantityExpr::Exact(n) => write!(f, "{}", n),
            QuantityExpr::Abundant => f.write_str(ABUNDANT_MARKER),
            QuantityExpr::Reserved => f.write_str(RESERVED_MARKER),
        }
    }
}

/// Map a quantity expression to the stock count advertised on a marketplace.
pub fn bucket(quantity: QuantityExpr) -> u64 {
    match quantity {
        QuantityExpr::Exact(n) => n,
        QuantityExpr::Abundant => ABUNDANT_STOCK,
        QuantityExpr::Reserved => RESERVED_STOCK,
    }
}
