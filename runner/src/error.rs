//! Unified error handling for the runner.

use crate::config::ConfigError;
use crate::feed::FeedError;
use crate::transport::TransportError;
use stocksync_engine::UpdateKind;

/// Failure of one platform's synchronization run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Catalog listing failed: {0}")]
    Catalog(#[source] TransportError),

    #[error("{kind} batch {batch}/{total} failed: {source}")]
    Submit {
        kind: UpdateKind,
        batch: usize,
        total: usize,
        #[source]
        source: TransportError,
    },

    #[error("Engine error: {0}")]
    Engine(#[from] stocksync_engine::Error),
}

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Transport setup failed: {0}")]
    Transport(#[from] TransportError),

    #[error("{failed} of {total} platforms failed to synchronize")]
    PlatformsFailed { failed: usize, total: usize },
}

/// Result type alias for the runner.
pub type Result<T> = std::result::Result<T, AppError>;
