//! Supplier feed records.
//!
//! Rows of the supplier spreadsheet are keyed by its original column headers,
//! whether they arrive as a JSON export or are read from the workbook itself.
//! This module turns those rows into [`FeedRecord`]s, parsing quantities once
//! at the boundary.

use crate::error::{Error, Result};
use crate::quantity::QuantityExpr;
use crate::OfferId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header of the product code column.
pub const CODE_COLUMN: &str = "Код";
/// Header of the quantity column.
pub const QUANTITY_COLUMN: &str = "Количество";
/// Header of the price column.
pub const PRICE_COLUMN: &str = "Цена";

/// A normalized supplier record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
    /// Supplier product code, matched against marketplace offer ids
    pub code: OfferId,
    /// Published quantity
    pub quantity: QuantityExpr,
    /// Raw price text, formatting included
    pub price: String,
}

impl FeedRecord {
    /// Create a new feed record.
    pub fn new(code: impl Into<OfferId>, quantity: QuantityExpr, price: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            quantity,
            price: price.into(),
        }
    }

    /// Build a record from raw text, parsing the quantity expression.
    pub fn parse(code: impl Into<OfferId>, quantity: &str, price: impl Into<String>) -> Result<Self> {
        let code = code.into();
        let quantity = quantity.parse().map_err(|_| Error::InvalidQuantity {
            code: code.clone(),
            raw: quantity.to_string(),
        })?;

        Ok(Self {
            code,
            quantity,
            price: price.into(),
        })
    }
}

/// A spreadsheet cell: the exporter writes text or numbers depending on the column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Int(n) => write!(f, "{}", n),
            // Integral floats come from numeric columns and must read like ints.
            Cell::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{}", *x as i64),
            Cell::Float(x) => write!(f, "{}", x),
        }
    }
}

/// One exported row of the supplier spreadsheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawFeedRow {
    #[serde(rename = "Код", default)]
    pub code: Option<Cell>,
    #[serde(rename = "Количество", default)]
    pub quantity: Option<Cell>,
    #[serde(rename = "Цена", default)]
    pub price: Option<Cell>,
}

impl RawFeedRow {
    /// Create a row from text cells.
    pub fn new(code: &str, quantity: &str, price: &str) -> Self {
        Self {
            code: Some(Cell::Text(code.to_string())),
            quantity: Some(Cell::Text(quantity.to_string())),
            price: Some(Cell::Text(price.to_string())),
        }
    }

    /// Convert the row into a [`FeedRecord`]. `index` is used for error reporting.
    pub fn to_record(&self, index: usize) -> Result<FeedRecord> {
        let code = self
            .code
            .as_ref()
            .map(|c| c.to_string().trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(Error::MissingColumn {
                column: CODE_COLUMN,
                row: index,
            })?;

        let quantity = self.quantity.as_ref().ok_or(Error::MissingColumn {
            column: QUANTITY_COLUMN,
            row: index,
        })?;

        // A blank price is not fatal; the reconciler omits the price directive.
        let price = self
            .price
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_default();

        FeedRecord::parse(code, &quantity.to_string(), price)
    }
}

/// A row that could not be turned into a record.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedIssue {
    /// Zero-based row index in the export
    pub row: usize,
    /// Why the row was rejected
    pub error: Error,
}

/// Result of parsing a feed export.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedParse {
    /// Records in feed order
    pub records: Vec<FeedRecord>,
    /// Rows that were skipped
    pub rejected: Vec<FeedIssue>,
}

/// Parse exported rows into records.
///
/// Rows with a missing code or an unrecognised quantity are collected in
/// [`FeedParse::rejected`] instead of failing the whole feed; offers whose
/// row was rejected fall back to the zero-stock entry during reconciliation.
/// Rows without any of the three columns (spreadsheet padding) are skipped
/// silently.
pub fn parse_feed(rows: &[RawFeedRow]) -> FeedParse {
    let mut parsed = FeedParse::default();

    for (index, row) in rows.iter().enumerate() {
        if row.code.is_none() && row.quantity.is_none() && row.price.is_none() {
            continue;
        }
        match row.to_record(index) {
            Ok(record) => parsed.records.push(record),
            Err(error) => parsed.rejected.push(FeedIssue { row: index, error }),
        }
    }

    parsed
}
