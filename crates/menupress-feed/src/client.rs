//! HTTP client for the point-of-sale menu-feed API.
//!
//! Wraps `reqwest` with bearer-token auth, per-status error mapping, and
//! retry-with-backoff on transient failures. Feeds are addressed by the feed
//! IDs configured per category in [`MenuConfig`].

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use menupress_core::{Category, ConfigError, MenuConfig};

use crate::error::FeedError;
use crate::rate_limit::retry_with_backoff;
use crate::types::MenuFeedResponse;

/// Client for the vendor menu-feed API.
pub struct MenuFeedClient {
    client: Client,
    api_token: String,
    base_url: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl MenuFeedClient {
    /// Builds a client from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &MenuConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("menupress/0.1 (menu rendering)")
            .build()?;

        Ok(Self {
            client,
            api_token: config.api_token.clone(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            backoff_base_secs: config.retry_backoff_base_secs,
        })
    }

    /// Fetches and decodes the feed configured for `category`.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Config`] when the category has no feed ID configured.
    /// - [`FetchError::Feed`] on HTTP rejection, network failure after
    ///   retries, or a body that does not decode as the feed envelope.
    pub async fn fetch_category(
        &self,
        config: &MenuConfig,
        category: Category,
    ) -> Result<MenuFeedResponse, FetchError> {
        let feed_id = config
            .feed_id(category)
            .ok_or(ConfigError::NoFeedConfigured {
                category,
                key: category.feed_env_key(),
            })?;
        Ok(self.fetch_feed(feed_id).await?)
    }

    /// Fetches one feed by ID, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] on HTTP rejection, network failure after
    /// retries, or a body that does not decode as the feed envelope.
    pub async fn fetch_feed(&self, feed_id: &str) -> Result<MenuFeedResponse, FeedError> {
        let url = format!("{}/{feed_id}", self.base_url);
        debug!(%url, "fetching menu feed");
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.fetch_once(&url)
        })
        .await
    }

    async fn fetch_once(&self, url: &str) -> Result<MenuFeedResponse, FeedError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|source| FeedError::Deserialize {
                    url: url.to_string(),
                    source,
                })
            }
            StatusCode::NOT_FOUND => Err(FeedError::NotFound {
                url: url.to_string(),
            }),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FeedError::Unauthorized {
                url: url.to_string(),
            }),
            StatusCode::TOO_MANY_REQUESTS => Err(FeedError::RateLimited {
                url: url.to_string(),
            }),
            status => Err(FeedError::UnexpectedStatus {
                status,
                url: url.to_string(),
            }),
        }
    }
}

/// A category fetch can fail before the request leaves: the category may
/// have no feed configured.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Feed(#[from] FeedError),
}
