//! Supplier stock archive published over HTTP.
//!
//! The supplier publishes a zip archive holding one legacy workbook. The
//! header row sits below a block of title rows, so it is located by its
//! column names rather than by position.

use super::{FeedError, FeedSource};
use crate::transport::{check_status, http_client, TransportError};
use async_trait::async_trait;
use calamine::{Data, Range, Reader};
use std::io::{Cursor, Read};
use stocksync_engine::{Cell, RawFeedRow, CODE_COLUMN, PRICE_COLUMN, QUANTITY_COLUMN};

/// Workbook name inside the supplier archive.
pub const DEFAULT_FEED_ENTRY: &str = "ostatki.xls";

/// Feed downloaded as a zipped workbook.
#[derive(Debug, Clone)]
pub struct ArchiveFeed {
    client: reqwest::Client,
    url: String,
    entry: String,
}

impl ArchiveFeed {
    /// Create a feed reading `entry` from the archive at `url`.
    pub fn new(url: impl Into<String>, entry: impl Into<String>) -> Result<Self, FeedError> {
        Ok(Self {
            client: http_client()?,
            url: url.into(),
            entry: entry.into(),
        })
    }
}

#[async_trait]
impl FeedSource for ArchiveFeed {
    async fn fetch(&self) -> Result<Vec<RawFeedRow>, FeedError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(TransportError::from)?;
        let response = check_status(&self.url, response).await?;
        let archive = response.bytes().await.map_err(TransportError::from)?;

        tracing::debug!(url = %self.url, bytes = archive.len(), "Feed archive downloaded");

        read_archive(&archive, &self.entry)
    }
}

/// Read the rows of the workbook stored as `entry` in a zip archive.
pub fn read_archive(archive: &[u8], entry: &str) -> Result<Vec<RawFeedRow>, FeedError> {
    let workbook = extract_entry(archive, entry)?;
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(workbook))?;
    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or(FeedError::EmptyWorkbook)??;
    rows_from_range(&sheet)
}

fn extract_entry(archive: &[u8], entry: &str) -> Result<Vec<u8>, FeedError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(archive))?;
    let mut file = match archive.by_name(entry) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(FeedError::MissingEntry(entry.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(FeedError::Extract)?;
    Ok(bytes)
}

/// Convert a worksheet into feed rows.
///
/// Everything above the row holding the code header is ignored; columns are
/// matched by header text, so their order does not matter.
pub fn rows_from_range(range: &Range<Data>) -> Result<Vec<RawFeedRow>, FeedError> {
    let mut rows = range.rows();
    let header = rows
        .by_ref()
        .find(|row| column(row, CODE_COLUMN).is_some())
        .ok_or(FeedError::MissingHeader(CODE_COLUMN))?;

    let code = column(header, CODE_COLUMN);
    let quantity = column(header, QUANTITY_COLUMN);
    let price = column(header, PRICE_COLUMN);

    Ok(rows
        .map(|row| RawFeedRow {
            code: cell_at(row, code),
            quantity: cell_at(row, quantity),
            price: cell_at(row, price),
        })
        .collect())
}

fn column(row: &[Data], name: &str) -> Option<usize> {
    row.iter()
        .position(|cell| matches!(cell, Data::String(s) if s.trim() == name))
}

fn cell_at(row: &[Data], index: Option<usize>) -> Option<Cell> {
    match row.get(index?)? {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(Cell::Text(s.clone())),
        Data::Int(n) => Some(Cell::Int(*n)),
        Data::Float(x) => Some(Cell::Float(*x)),
        other => Some(Cell::Text(other.to_string())),
    }
}
