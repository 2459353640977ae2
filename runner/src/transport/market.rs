//! Market platform API client.

use super::{check_status, decode, http_client, join_url, Transport, TransportError};
use async_trait::async_trait;
use serde::Deserialize;
use stocksync_engine::{Page, UpdateKind};

const LIST_LIMIT: &str = "200";

/// Response of the offer mapping listing.
#[derive(Debug, Deserialize)]
pub struct MappingResponse {
    pub result: MappingResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingResult {
    #[serde(default)]
    pub offer_mapping_entries: Vec<MappingEntry>,
    #[serde(default)]
    pub paging: Paging,
}

#[derive(Debug, Deserialize)]
pub struct MappingEntry {
    pub offer: MappedOffer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedOffer {
    pub shop_sku: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    pub next_page_token: Option<String>,
}

impl From<MappingResponse> for Page {
    fn from(response: MappingResponse) -> Self {
        Page {
            items: response
                .result
                .offer_mapping_entries
                .into_iter()
                .map(|entry| entry.offer.shop_sku)
                .collect(),
            next_cursor: response.result.paging.next_page_token,
            total: None,
        }
    }
}

/// Client for one Market campaign.
#[derive(Clone)]
pub struct MarketClient {
    client: reqwest::Client,
    base_url: String,
    campaign_id: String,
    token: String,
}

impl MarketClient {
    /// Create a new client bound to a campaign.
    pub fn new(
        base_url: impl Into<String>,
        campaign_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.into(),
            campaign_id: campaign_id.into(),
            token: token.into(),
        })
    }

    fn campaign_path(&self, suffix: &str) -> String {
        format!("campaigns/{}/{}", self.campaign_id, suffix)
    }
}

#[async_trait]
impl Transport for MarketClient {
    async fn list_page(&self, cursor: &str) -> Result<Page, TransportError> {
        let path = self.campaign_path("offer-mapping-entries");

        let response = self
            .client
            .get(join_url(&self.base_url, &path))
            .bearer_auth(&self.token)
            .query(&[("page_token", cursor), ("limit", LIST_LIMIT)])
            .send()
            .await?;
        let response = check_status(&path, response).await?;
        let listing: MappingResponse = decode(&path, response).await?;

        tracing::debug!(
            campaign_id = %self.campaign_id,
            cursor,
            items = listing.result.offer_mapping_entries.len(),
            "market catalog page"
        );

        Ok(listing.into())
    }

    async fn submit(&self, kind: UpdateKind, body: serde_json::Value) -> Result<(), TransportError> {
        let (path, request) = match kind {
            UpdateKind::Stock => {
                let path = self.campaign_path("offers/stocks");
                let request = self.client.put(join_url(&self.base_url, &path));
                (path, request)
            }
            UpdateKind::Price => {
                let path = self.campaign_path("offer-prices/updates");
                let request = self.client.post(join_url(&self.base_url, &path));
                (path, request)
            }
        };

        let response = request.bearer_auth(&self.token).json(&body).send().await?;
        check_status(&path, response).await?;
        Ok(())
    }
}
