//! Supplier feed loading.

mod archive;

pub use archive::{read_archive, rows_from_range, ArchiveFeed, DEFAULT_FEED_ENTRY};

use crate::transport::TransportError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use stocksync_engine::{parse_feed, FeedRecord, RawFeedRow};

/// Feed loading errors.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Failed to read feed {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid feed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Feed download failed: {0}")]
    Download(#[from] TransportError),

    #[error("Invalid feed archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Feed archive has no {0:?} entry")]
    MissingEntry(String),

    #[error("Failed to extract feed workbook: {0}")]
    Extract(#[source] std::io::Error),

    #[error("Invalid feed workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Feed workbook has no sheets")]
    EmptyWorkbook,

    #[error("Feed sheet has no {0:?} header")]
    MissingHeader(&'static str),
}

/// Supplies the raw rows of the supplier feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<RawFeedRow>, FeedError>;
}

/// Feed exported as a JSON array of spreadsheet rows.
#[derive(Debug, Clone)]
pub struct JsonFileFeed {
    path: PathBuf,
}

impl JsonFileFeed {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl FeedSource for JsonFileFeed {
    async fn fetch(&self) -> Result<Vec<RawFeedRow>, FeedError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.path.clone(),
                source,
            })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Fetch and parse the feed.
///
/// Rejected rows are logged and skipped; their offers get zero stock.
pub async fn load_feed(source: &dyn FeedSource) -> Result<Vec<FeedRecord>, FeedError> {
    let rows = source.fetch().await?;
    let parsed = parse_feed(&rows);

    for issue in &parsed.rejected {
        tracing::warn!(row = issue.row, error = %issue.error, "Skipping feed row");
    }

    tracing::info!(
        rows = rows.len(),
        records = parsed.records.len(),
        rejected = parsed.rejected.len(),
        "Feed loaded"
    );

    Ok(parsed.records)
}
