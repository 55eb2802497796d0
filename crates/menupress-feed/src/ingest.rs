//! Converts wire-shaped feed responses and scraped listings into the
//! pipeline's [`RawProduct`] records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use menupress_core::{leading_float, Origin, RawPotency, RawProduct};

use crate::types::{MenuFeedResponse, MenuItem};

/// Farm substituted when a feed item carries no brand.
const UNKNOWN_FARM: &str = "Unknown";
/// Effect substituted when a feed item carries no flower type.
const UNKNOWN_EFFECT: &str = "Unknown";

/// Converts a decoded feed response into raw products, tagged with
/// `source_page` (the category the feed was fetched for).
#[must_use]
pub fn ingest_feed(response: &MenuFeedResponse, source_page: &str) -> Vec<RawProduct> {
    response
        .menu_feed
        .menu_groups
        .iter()
        .flat_map(|group| group.menu_items.iter())
        .map(|item| raw_from_item(item, source_page))
        .collect()
}

/// Decodes an untyped JSON body and ingests it. A malformed envelope is
/// logged and yields an empty batch; a bad feed should produce an empty
/// menu, not a crash.
#[must_use]
pub fn ingest_feed_value(body: &Value, source_page: &str) -> Vec<RawProduct> {
    match serde_json::from_value::<MenuFeedResponse>(body.clone()) {
        Ok(response) => ingest_feed(&response, source_page),
        Err(error) => {
            warn!(source_page, %error, "menu feed body did not match the expected envelope");
            Vec::new()
        }
    }
}

fn raw_from_item(item: &MenuItem, source_page: &str) -> RawProduct {
    let first_price = item.prices.first();
    let price = first_price
        .and_then(|p| p.price_cents)
        .filter(|cents| *cents != 0)
        .map(|cents| cents as f64 / 100.0);
    let size = first_price
        .and_then(|p| p.unit.as_deref())
        .and_then(leading_float);

    RawProduct {
        name: item.name.clone(),
        farm: Some(
            item.brand
                .clone()
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| UNKNOWN_FARM.to_string()),
        ),
        strain: item.strain.clone(),
        effect: Some(
            item.flower_type
                .as_deref()
                .filter(|f| !f.is_empty())
                .map_or_else(|| UNKNOWN_EFFECT.to_string(), str::to_uppercase),
        ),
        thc: item.thc.as_ref().and_then(|p| p.current.clone()),
        cbd: item.cbd.as_ref().and_then(|p| p.current.clone()),
        price,
        size,
        tag_list: item.tag_list.clone(),
        source_page: Some(source_page.to_string()),
        origin: Origin::Api,
        extra: Map::new(),
    }
}

/// One record captured off a rendered menu page, as the page-scraping
/// collaborator emits them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapedRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub farm: Option<String>,
    #[serde(default)]
    pub effect: Option<String>,
    /// Display text as scraped, e.g. `"23-27%"` or `"800mg"`.
    #[serde(default)]
    pub thc_percent: Option<RawPotency>,
    #[serde(default)]
    pub cbd_percent: Option<RawPotency>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub size: Option<f64>,
    /// Title of the page the record was scraped from.
    #[serde(default)]
    pub page_identifier: Option<String>,
}

/// Converts scraped records into raw products on the scrape path.
#[must_use]
pub fn ingest_scraped(records: &[ScrapedRecord]) -> Vec<RawProduct> {
    records
        .iter()
        .map(|record| RawProduct {
            name: record.name.clone(),
            farm: record.farm.clone(),
            strain: None,
            effect: record.effect.clone(),
            thc: record.thc_percent.clone(),
            cbd: record.cbd_percent.clone(),
            price: record.price,
            size: record.size,
            tag_list: vec![],
            source_page: record.page_identifier.clone(),
            origin: Origin::Scrape,
            extra: Map::new(),
        })
        .collect()
}
