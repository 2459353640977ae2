//! Seller platform API client.

use super::{check_status, decode, http_client, join_url, Transport, TransportError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stocksync_engine::{Page, UpdateKind};

const LIST_PATH: &str = "v2/product/list";
const STOCKS_PATH: &str = "v1/product/import/stocks";
const PRICES_PATH: &str = "v1/product/import/prices";
const LIST_LIMIT: u32 = 1000;

/// Request body for the product listing.
#[derive(Debug, Serialize)]
struct ListRequest<'a> {
    filter: ListFilter,
    last_id: &'a str,
    limit: u32,
}

#[derive(Debug, Serialize)]
struct ListFilter {
    visibility: &'static str,
}

/// Response of the product listing.
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    pub result: ListResult,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListResult {
    #[serde(default)]
    pub items: Vec<ListItem>,
    /// Absent when the platform omits it; paging then follows `last_id`
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub last_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListItem {
    pub offer_id: String,
}

impl From<ListResponse> for Page {
    fn from(response: ListResponse) -> Self {
        let ListResult {
            items,
            total,
            last_id,
        } = response.result;
        Page {
            items: items.into_iter().map(|item| item.offer_id).collect(),
            next_cursor: Some(last_id),
            total,
        }
    }
}

/// Client for the Seller platform.
#[derive(Clone)]
pub struct SellerClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    api_key: String,
}

impl SellerClient {
    /// Create a new client.
    pub fn new(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into(),
            client_id: client_id.into(),
            api_key: api_key.into(),
        })
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(join_url(&self.base_url, path))
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
    }
}

#[async_trait]
impl Transport for SellerClient {
    async fn list_page(&self, cursor: &str) -> Result<Page, TransportError> {
        let request = ListRequest {
            filter: ListFilter { visibility: "ALL" },
            last_id: cursor,
            limit: LIST_LIMIT,
        };

        let response = self.post(LIST_PATH).json(&request).send().await?;
        let response = check_status(LIST_PATH, response).await?;
        let listing: ListResponse = decode(LIST_PATH, response).await?;

        tracing::debug!(
            cursor,
            items = listing.result.items.len(),
            total = ?listing.result.total,
            "seller catalog page"
        );

        Ok(listing.into())
    }

    async fn submit(&self, kind: UpdateKind, body: serde_json::Value) -> Result<(), TransportError> {
        let path = match kind {
            UpdateKind::Stock => STOCKS_PATH,
            UpdateKind::Price => PRICES_PATH,
        };

        let response = self.post(path).json(&body).send().await?;
        check_status(path, response).await?;
        Ok(())
    }
}
