//! Environment-driven configuration for the menu-feed fetcher.
//!
//! The loader is decoupled from the process environment through an injectable
//! lookup function so parsing and validation can be unit tested without
//! mutating real env vars.

use std::collections::HashMap;

use thiserror::Error;

use crate::category::Category;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {key}")]
    MissingVar { key: &'static str },

    #[error("invalid value for {key}: \"{value}\" ({reason})")]
    InvalidVar {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("no menu feed configured for category \"{category}\" (set {key})")]
    NoFeedConfigured {
        category: Category,
        key: &'static str,
    },
}

/// Runtime configuration: the vendor API token, the feed-ID map, and HTTP
/// client knobs.
#[derive(Clone)]
pub struct MenuConfig {
    /// Bearer token for the vendor menu-feed API.
    pub api_token: String,
    /// Base URL of the menu-feed endpoint; feed IDs are appended as a path
    /// segment.
    pub api_base_url: String,
    feed_ids: HashMap<Category, String>,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
}

impl std::fmt::Debug for MenuConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuConfig")
            .field("api_token", &"[redacted]")
            .field("api_base_url", &self.api_base_url)
            .field("feed_ids", &self.feed_ids)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .finish()
    }
}

impl MenuConfig {
    /// Returns the configured feed ID for `category`, if any.
    #[must_use]
    pub fn feed_id(&self, category: Category) -> Option<&str> {
        self.feed_ids.get(&category).map(String::as_str)
    }

    /// Resolves the full feed URL for `category`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoFeedConfigured`] when the category has no
    /// feed ID — the caller surfaces this as a rejected operation rather
    /// than attempting a fetch.
    pub fn feed_url(&self, category: Category) -> Result<String, ConfigError> {
        let feed_id = self
            .feed_id(category)
            .ok_or(ConfigError::NoFeedConfigured {
                category,
                key: category.feed_env_key(),
            })?;
        Ok(format!(
            "{}/{feed_id}",
            self.api_base_url.trim_end_matches('/')
        ))
    }
}

/// Loads configuration from the environment, reading `.env` files first.
///
/// # Errors
///
/// Returns [`ConfigError`] if required env vars are missing or invalid.
pub fn load_config() -> Result<MenuConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Loads configuration from env vars already present in the process, without
/// touching `.env` files.
///
/// # Errors
///
/// Returns [`ConfigError`] if required env vars are missing or invalid.
pub fn load_config_from_env() -> Result<MenuConfig, ConfigError> {
    build_config(|key| std::env::var(key).ok())
}

/// Core parsing/validation logic with an injectable env lookup.
///
/// # Errors
///
/// Returns [`ConfigError::MissingVar`] when `MENUPRESS_API_TOKEN` is unset,
/// or [`ConfigError::InvalidVar`] when a numeric knob does not parse.
pub fn build_config<F>(lookup: F) -> Result<MenuConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_token = lookup("MENUPRESS_API_TOKEN")
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar {
            key: "MENUPRESS_API_TOKEN",
        })?;

    let api_base_url = lookup("MENUPRESS_API_BASE_URL")
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "https://app.posabit.com/api/v1/menu_feeds".to_string());

    let mut feed_ids = HashMap::new();
    for category in Category::ALL {
        if let Some(id) = lookup(category.feed_env_key()).filter(|v| !v.is_empty()) {
            feed_ids.insert(category, id);
        }
    }

    Ok(MenuConfig {
        api_token,
        api_base_url,
        feed_ids,
        request_timeout_secs: parse_var(&lookup, "MENUPRESS_REQUEST_TIMEOUT_SECS", 30)?,
        max_retries: parse_var(&lookup, "MENUPRESS_MAX_RETRIES", 3)?,
        retry_backoff_base_secs: parse_var(&lookup, "MENUPRESS_RETRY_BACKOFF_SECS", 1)?,
    })
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            key,
            value,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
        }
    }

    #[test]
    fn requires_api_token() {
        let err = build_config(env(&[])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingVar {
                key: "MENUPRESS_API_TOKEN"
            }
        ));
    }

    #[test]
    fn empty_token_counts_as_missing() {
        let err = build_config(env(&[("MENUPRESS_API_TOKEN", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar { .. }));
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = build_config(env(&[("MENUPRESS_API_TOKEN", "secret")])).unwrap();
        assert_eq!(
            config.api_base_url,
            "https://app.posabit.com/api/v1/menu_feeds"
        );
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retries, 3);
        assert!(config.feed_id(Category::Carts).is_none());
    }

    #[test]
    fn reads_per_category_feed_ids() {
        let config = build_config(env(&[
            ("MENUPRESS_API_TOKEN", "secret"),
            ("MENUPRESS_FEED_CARTS", "feed-aaa"),
            ("MENUPRESS_FEED_FLOWER", "feed-bbb"),
        ]))
        .unwrap();
        assert_eq!(config.feed_id(Category::Carts), Some("feed-aaa"));
        assert_eq!(config.feed_id(Category::Flower), Some("feed-bbb"));
        assert!(config.feed_id(Category::Dabs).is_none());
    }

    #[test]
    fn feed_url_joins_base_and_id() {
        let config = build_config(env(&[
            ("MENUPRESS_API_TOKEN", "secret"),
            ("MENUPRESS_API_BASE_URL", "https://example.com/api/v1/menu_feeds/"),
            ("MENUPRESS_FEED_DABS", "feed-ccc"),
        ]))
        .unwrap();
        assert_eq!(
            config.feed_url(Category::Dabs).unwrap(),
            "https://example.com/api/v1/menu_feeds/feed-ccc"
        );
    }

    #[test]
    fn feed_url_rejects_unconfigured_category() {
        let config = build_config(env(&[("MENUPRESS_API_TOKEN", "secret")])).unwrap();
        let err = config.feed_url(Category::Prepacks).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NoFeedConfigured {
                category: Category::Prepacks,
                ..
            }
        ));
    }

    #[test]
    fn invalid_numeric_knob_is_rejected() {
        let err = build_config(env(&[
            ("MENUPRESS_API_TOKEN", "secret"),
            ("MENUPRESS_MAX_RETRIES", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidVar {
                key: "MENUPRESS_MAX_RETRIES",
                ..
            }
        ));
    }

    #[test]
    fn debug_redacts_the_token() {
        let config = build_config(env(&[("MENUPRESS_API_TOKEN", "secret")])).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[redacted]"));
    }
}
