//! Configuration management for the runner.

use crate::feed::DEFAULT_FEED_ENTRY;
use std::env;
use std::fmt;
use std::path::PathBuf;
use stocksync_engine::{BatchLimits, MarketAdapter, MarketMode, SellerAdapter};

pub const DEFAULT_SELLER_API_URL: &str = "https://api-seller.ozon.ru";
pub const DEFAULT_MARKET_API_URL: &str = "https://api.partner.market.yandex.ru";

/// Where the supplier feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedLocation {
    /// JSON rows exported to a local file
    File(PathBuf),
    /// Zipped workbook downloaded over HTTP
    Archive { url: String, entry: String },
}

impl fmt::Display for FeedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedLocation::File(path) => write!(f, "{}", path.display()),
            FeedLocation::Archive { url, entry } => write!(f, "{}#{}", url, entry),
        }
    }
}

/// Seller platform credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellerConfig {
    pub api_url: String,
    pub client_id: String,
    pub token: String,
    pub limits: BatchLimits,
}

/// One Market campaign (FBS or DBS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketCampaignConfig {
    pub mode: MarketMode,
    pub api_url: String,
    pub campaign_id: String,
    pub warehouse_id: String,
    pub token: String,
    pub limits: BatchLimits,
}

/// Runner configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Supplier feed
    pub feed: FeedLocation,
    /// Seller platform, if configured
    pub seller: Option<SellerConfig>,
    /// Market FBS campaign, if configured
    pub market_fbs: Option<MarketCampaignConfig>,
    /// Market DBS campaign, if configured
    pub market_dbs: Option<MarketCampaignConfig>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let feed = match (var("FEED_URL"), var("FEED_PATH")) {
            (Some(url), _) => FeedLocation::Archive {
                url,
                entry: var("FEED_ENTRY").unwrap_or_else(|| DEFAULT_FEED_ENTRY.to_string()),
            },
            (None, Some(path)) => FeedLocation::File(PathBuf::from(path)),
            (None, None) => return Err(ConfigError::Missing("FEED_URL or FEED_PATH")),
        };

        let seller = match (var("CLIENT_ID"), var("SELLER_TOKEN")) {
            (None, None) => None,
            (Some(client_id), Some(token)) => Some(SellerConfig {
                api_url: var("SELLER_API_URL").unwrap_or_else(|| DEFAULT_SELLER_API_URL.to_string()),
                client_id,
                token,
                limits: BatchLimits::new(
                    batch_size(&var, "SELLER_STOCK_BATCH", SellerAdapter::DEFAULT_LIMITS.stock)?,
                    batch_size(&var, "SELLER_PRICE_BATCH", SellerAdapter::DEFAULT_LIMITS.price)?,
                ),
            }),
            (Some(_), None) => return Err(ConfigError::Missing("SELLER_TOKEN")),
            (None, Some(_)) => return Err(ConfigError::Missing("CLIENT_ID")),
        };

        let market_limits = BatchLimits::new(
            batch_size(&var, "MARKET_STOCK_BATCH", MarketAdapter::DEFAULT_LIMITS.stock)?,
            batch_size(&var, "MARKET_PRICE_BATCH", MarketAdapter::DEFAULT_LIMITS.price)?,
        );
        let market_url =
            var("MARKET_API_URL").unwrap_or_else(|| DEFAULT_MARKET_API_URL.to_string());

        let campaign = |mode: MarketMode,
                        id_key: &'static str,
                        warehouse_key: &'static str|
         -> Result<Option<MarketCampaignConfig>, ConfigError> {
            let Some(campaign_id) = var(id_key) else {
                return Ok(None);
            };
            let warehouse_id = var(warehouse_key).ok_or(ConfigError::Missing(warehouse_key))?;
            let token = var("MARKET_TOKEN").ok_or(ConfigError::Missing("MARKET_TOKEN"))?;
            Ok(Some(MarketCampaignConfig {
                mode,
                api_url: market_url.clone(),
                campaign_id,
                warehouse_id,
                token,
                limits: market_limits,
            }))
        };

        let market_fbs = campaign(MarketMode::Fbs, "FBS_ID", "WAREHOUSE_FBS_ID")?;
        let market_dbs = campaign(MarketMode::Dbs, "DBS_ID", "WAREHOUSE_DBS_ID")?;

        if seller.is_none() && market_fbs.is_none() && market_dbs.is_none() {
            return Err(ConfigError::NoPlatforms);
        }

        Ok(Self {
            feed,
            seller,
            market_fbs,
            market_dbs,
        })
    }
}

fn batch_size<F>(var: &F, key: &'static str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(size) if size > 0 => Ok(size),
            _ => Err(ConfigError::InvalidBatchSize { key, value: raw }),
        },
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("Invalid {key} value: {value:?}")]
    InvalidBatchSize { key: &'static str, value: String },

    #[error("No marketplace configured (set CLIENT_ID/SELLER_TOKEN or FBS_ID/DBS_ID)")]
    NoPlatforms,
}
