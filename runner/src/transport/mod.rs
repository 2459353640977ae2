//! Marketplace transports.
//!
//! A [`Transport`] lists a marketplace's catalog page by page and accepts
//! prepared update bodies. The engine decides what to send; transports only
//! know URLs, headers and response shapes.

mod market;
mod seller;

pub use market::MarketClient;
pub use seller::SellerClient;

use async_trait::async_trait;
use reqwest::Response;
use std::time::Duration;
use stocksync_engine::{Page, UpdateKind};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const ERROR_BODY_LIMIT: usize = 512;

/// Network or API failure. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("malformed response from {endpoint}: {reason}")]
    Malformed { endpoint: String, reason: String },
}

/// Paging and submission for one marketplace campaign.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch the catalog page at `cursor`.
    async fn list_page(&self, cursor: &str) -> Result<Page, TransportError>;

    /// Send one prepared update body.
    async fn submit(&self, kind: UpdateKind, body: serde_json::Value) -> Result<(), TransportError>;
}

pub(crate) fn http_client() -> Result<reqwest::Client, TransportError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?)
}

/// Turn a non-success response into [`TransportError::Status`].
pub(crate) async fn check_status(
    endpoint: &str,
    response: Response,
) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > ERROR_BODY_LIMIT {
        let cut = (0..=ERROR_BODY_LIMIT)
            .rev()
            .find(|&i| body.is_char_boundary(i))
            .unwrap_or(0);
        body.truncate(cut);
    }

    Err(TransportError::Status {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        body,
    })
}

/// Decode a JSON body, reporting shape errors as [`TransportError::Malformed`].
async fn decode<T: serde::de::DeserializeOwned>(
    endpoint: &str,
    response: Response,
) -> Result<T, TransportError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| TransportError::Malformed {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
