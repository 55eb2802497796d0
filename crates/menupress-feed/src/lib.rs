pub mod client;
pub mod error;
pub mod ingest;
pub mod types;

mod rate_limit;

pub use client::{FetchError, MenuFeedClient};
pub use error::FeedError;
pub use ingest::{ingest_feed, ingest_feed_value, ingest_scraped, ScrapedRecord};
pub use types::{MenuFeed, MenuFeedResponse, MenuGroup, MenuItem, PriceEntry, Potency};
