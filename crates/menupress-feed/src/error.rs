//! Error types for the menu-feed fetcher.

use thiserror::Error;

/// Errors from fetching a vendor menu feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network-level failure or a non-HTTP-status reqwest error.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 404: the feed ID does not exist (or was retired).
    #[error("menu feed not found: {url}")]
    NotFound { url: String },

    /// HTTP 401/403: the API token was rejected.
    #[error("menu feed request unauthorized (check the API token): {url}")]
    Unauthorized { url: String },

    /// HTTP 429: the vendor asked us to back off.
    #[error("rate limited by the menu feed API: {url}")]
    RateLimited { url: String },

    /// Any other non-2xx status.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The response body is not the expected JSON envelope.
    #[error("failed to deserialize menu feed response from {url}: {source}")]
    Deserialize {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
