//! Wire types for the point-of-sale menu-feed API.
//!
//! Every field is defaulted: the vendor adds, renames, and omits fields
//! without notice, and a missing field should degrade to an empty value
//! rather than fail the whole feed.

use serde::{Deserialize, Serialize};

use menupress_core::RawPotency;

/// Top-level response envelope: `{"menu_feed": {...}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuFeedResponse {
    #[serde(default)]
    pub menu_feed: MenuFeed,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuFeed {
    #[serde(default)]
    pub menu_groups: Vec<MenuGroup>,
}

/// One display group in the feed (roughly a vendor category).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
}

/// One sellable item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub strain: Option<String>,
    /// Cultivator / producer; maps to the menu's farm column.
    #[serde(default)]
    pub brand: Option<String>,
    /// Effect class, e.g. `"sativa"`, `"indica"`. Lowercase on the wire.
    #[serde(default)]
    pub flower_type: Option<String>,
    #[serde(default)]
    pub thc: Option<Potency>,
    #[serde(default)]
    pub cbd: Option<Potency>,
    /// Price points; the first entry is the menu price.
    #[serde(default)]
    pub prices: Vec<PriceEntry>,
    #[serde(default)]
    pub tag_list: Vec<String>,
}

/// Potency wrapper: `{"current": 23.4}` or `{"current": "<LOQ"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Potency {
    #[serde(default)]
    pub current: Option<RawPotency>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceEntry {
    /// Integer cents. Zero is treated as "no price".
    #[serde(default)]
    pub price_cents: Option<i64>,
    /// Unit size text, e.g. `"1g"`, `"28"`.
    #[serde(default)]
    pub unit: Option<String>,
}
