//! Error types for the stocksync engine.

use crate::OfferId;
use thiserror::Error;

/// All possible errors from the stocksync engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Feed errors
    #[error("invalid quantity for '{code}': {raw:?}")]
    InvalidQuantity { code: OfferId, raw: String },

    #[error("missing column '{column}' in feed row {row}")]
    MissingColumn { column: &'static str, row: usize },

    // Batching errors
    #[error("batch size must be positive, got {0}")]
    InvalidBatchSize(usize),

    // Paging errors
    #[error("catalog paging stalled after {pages} pages: {reason}")]
    PagingStalled { pages: usize, reason: String },

    #[error("catalog paging already complete")]
    PagingComplete,
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
