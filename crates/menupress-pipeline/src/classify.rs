//! Turns raw vendor records into [`NormalizedProduct`]s.
//!
//! Classification is total: every raw record produces a normalized record,
//! with sentinels standing in for unusable fields. Records that fail
//! validation (no name, no farm, bad price) are only dropped at the batch
//! boundary, where the drop can be logged with its reason.

use tracing::warn;

use menupress_core::{NormalizedProduct, Origin, RawProduct};

use crate::fields;
use crate::patterns;

/// Effect text substituted when the vendor sends none. Feeds the per-origin
/// default priority rule.
const UNKNOWN_EFFECT: &str = "Unknown";

/// Source-page label for records that arrived without one.
const UNKNOWN_PAGE: &str = "unknown";

/// Classifies one raw record.
///
/// The THC parser is dispatched on the record's origin: API records carry
/// numeric potency that may be milligrams-per-package, scraped records carry
/// the display text as shown on the source page. Everything else is shared.
#[must_use]
pub fn classify(raw: &RawProduct) -> NormalizedProduct {
    let origin = raw.origin;
    let effect = raw
        .effect
        .clone()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_EFFECT.to_string());

    let thc_percent = match origin {
        Origin::Api => fields::parse_thc_api(raw.thc.as_ref(), raw.size),
        Origin::Scrape => fields::parse_thc_scraped(raw.thc.as_ref()),
    };

    let price = raw.price.unwrap_or(f64::NAN);

    NormalizedProduct {
        name: raw.name.clone(),
        cleaned_name: fields::clean_name(&raw.name),
        farm: raw.farm.clone().unwrap_or_default(),
        strain: raw.strain.clone(),
        effect_priority: fields::effect_priority(&effect, origin),
        effect,
        thc_percent,
        cbd_percent: fields::parse_cbd(raw.cbd.as_ref(), origin),
        price,
        price_group: format!("{price:.2}"),
        pack_size: fields::match_pack_size(&raw.name),
        matched_size: fields::match_unit_size(&raw.name),
        product_type: patterns::detect_product_type(&raw.name),
        size: raw.size,
        tag_list: raw.tag_list.clone(),
        source_page: raw
            .source_page
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| UNKNOWN_PAGE.to_string()),
        origin,
        extra: raw.extra.clone(),
    }
}

/// Classifies a batch, dropping records that fail validation. Each drop is
/// logged with its reason so bad vendor data is visible rather than silent.
#[must_use]
pub fn classify_batch(raw_products: &[RawProduct]) -> Vec<NormalizedProduct> {
    raw_products
        .iter()
        .map(classify)
        .filter(|product| match product.validation_failure() {
            None => true,
            Some(reason) => {
                warn!(name = %product.name, reason, "dropping unusable product record");
                false
            }
        })
        .collect()
}
