//! Category-specific routing: splitting the preroll menu into its three
//! sub-menus and binning flower by price tier.
//!
//! Routing happens after grouping, so the routers consume a [`GroupedStore`]
//! and produce smaller stores (prerolls) or sorted tier lists (flower).

use serde::{Deserialize, Serialize};

use menupress_core::{EffectPriority, NormalizedProduct};

use crate::group::GroupedStore;

/// Name/type fragments that mark a preroll as infused.
pub const INFUSED_KEYWORDS: &[&str] = &[
    "moonrock",
    "moon rock",
    "slim",
    "hellavated",
    "portland heights",
];

/// Farms whose prerolls are forced into the CBD effect class regardless of
/// what the feed says. Matched as a lowercase substring of the farm name.
const CBD_FARM_FRAGMENT: &str = "east fork";

/// The three preroll sub-menus, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrerollCategory {
    SinglePrerolls,
    PrerollPacks,
    Infused,
}

impl PrerollCategory {
    pub const ALL: [Self; 3] = [Self::SinglePrerolls, Self::PrerollPacks, Self::Infused];

    /// Page heading for this sub-menu.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::SinglePrerolls => "Single Prerolls",
            Self::PrerollPacks => "Preroll Packs",
            Self::Infused => "Infused Prerolls",
        }
    }
}

/// The preroll menu split into its three sub-menus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrerollMenu {
    pub single_prerolls: GroupedStore,
    pub preroll_packs: GroupedStore,
    pub infused: GroupedStore,
}

impl PrerollMenu {
    #[must_use]
    pub fn category(&self, category: PrerollCategory) -> &GroupedStore {
        match category {
            PrerollCategory::SinglePrerolls => &self.single_prerolls,
            PrerollCategory::PrerollPacks => &self.preroll_packs,
            PrerollCategory::Infused => &self.infused,
        }
    }

    fn category_mut(&mut self, category: PrerollCategory) -> &mut GroupedStore {
        match category {
            PrerollCategory::SinglePrerolls => &mut self.single_prerolls,
            PrerollCategory::PrerollPacks => &mut self.preroll_packs,
            PrerollCategory::Infused => &mut self.infused,
        }
    }
}

/// Decides which sub-menu one preroll belongs to. Rules fire in order:
///
/// 1. An infused keyword in the name → infused.
/// 2. An infused keyword in the product type → infused.
/// 3. The literal product type `"infused"` → infused.
/// 4. A pack size → preroll packs, except two carve-outs sold as packs but
///    listed with the singles (the Kleen Karma farm and "lit stick" items).
/// 5. Everything else → single prerolls.
fn preroll_category(product: &NormalizedProduct) -> PrerollCategory {
    let name = product.name.to_lowercase();
    let product_type = product.product_type.as_deref().map(str::to_lowercase);

    let keyword_in = |text: &str| INFUSED_KEYWORDS.iter().any(|k| text.contains(k));

    if keyword_in(&name) {
        return PrerollCategory::Infused;
    }
    if let Some(ref ptype) = product_type {
        if keyword_in(ptype) {
            return PrerollCategory::Infused;
        }
        if ptype == "infused" {
            return PrerollCategory::Infused;
        }
    }
    if product.pack_size.is_some() {
        let farm = product.farm.to_lowercase();
        if farm.contains("kleen karma") || name.contains("lit stick") {
            return PrerollCategory::SinglePrerolls;
        }
        return PrerollCategory::PrerollPacks;
    }
    PrerollCategory::SinglePrerolls
}

/// Splits a grouped preroll store into the three sub-menus.
///
/// Products from the designated CBD farm have their effect rewritten before
/// routing, so they sort and color as CBD everywhere downstream. Pack-routed
/// products get their type forced to `"preroll"` so mixed-type packs don't
/// splinter into per-type sections.
#[must_use]
pub fn route_prerolls(store: &GroupedStore) -> PrerollMenu {
    let mut menu = PrerollMenu::default();

    for (_, _, products) in store.buckets() {
        for product in products {
            let mut product = product.clone();
            if product.farm.to_lowercase().contains(CBD_FARM_FRAGMENT) {
                product.effect = "CBD".to_string();
                product.effect_priority = EffectPriority::Cbd;
            }

            let category = preroll_category(&product);
            if category == PrerollCategory::PrerollPacks {
                product.product_type = Some("preroll".to_string());
            }
            menu.category_mut(category).insert(product);
        }
    }

    menu
}

/// The three flower shelves, matched on the exact price group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowerTier {
    Gold,
    Platinum,
    Diamond,
}

impl FlowerTier {
    pub const ALL: [Self; 3] = [Self::Gold, Self::Platinum, Self::Diamond];

    /// The gram price group that lands a product on this shelf. Any other
    /// price group is left off the flower menu entirely.
    #[must_use]
    pub fn price_group(self) -> &'static str {
        match self {
            Self::Gold => "6.00",
            Self::Platinum => "14.00",
            Self::Diamond => "15.00",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Diamond => "Diamond",
        }
    }

    /// Recreational price ladder printed in the shelf banner.
    #[must_use]
    pub fn rec_prices(self) -> [&'static str; 3] {
        match self {
            Self::Gold => ["$6 - Gram", "$18 - Eighth", "$34 - Quarter"],
            Self::Platinum => ["$14 - Gram", "$40 - Eighth", "$72 - Quarter"],
            Self::Diamond => ["$15 - Gram", "$45 - Eighth", "$80 - Quarter"],
        }
    }

    /// Medical (tax-exempt) price ladder printed under the recreational one.
    #[must_use]
    pub fn med_prices(self) -> [&'static str; 3] {
        match self {
            Self::Gold => ["$5 - Gram", "$14.40 - Eighth", "$28.33 - Quarter"],
            Self::Platinum => ["$11.87 - Gram", "$33.33 - Eighth", "$60 - Quarter"],
            Self::Diamond => ["$12.50 - Gram", "$37.50 - Eighth", "$66.67 - Quarter"],
        }
    }
}

/// Flower products binned and sorted per shelf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowerTiers {
    pub gold: Vec<NormalizedProduct>,
    pub platinum: Vec<NormalizedProduct>,
    pub diamond: Vec<NormalizedProduct>,
}

impl FlowerTiers {
    #[must_use]
    pub fn tier(&self, tier: FlowerTier) -> &[NormalizedProduct] {
        match tier {
            FlowerTier::Gold => &self.gold,
            FlowerTier::Platinum => &self.platinum,
            FlowerTier::Diamond => &self.diamond,
        }
    }

    fn tier_mut(&mut self, tier: FlowerTier) -> &mut Vec<NormalizedProduct> {
        match tier {
            FlowerTier::Gold => &mut self.gold,
            FlowerTier::Platinum => &mut self.platinum,
            FlowerTier::Diamond => &mut self.diamond,
        }
    }
}

/// Bins flower products into shelves by exact price group and sorts each
/// shelf by effect priority, then display name. Products priced outside the
/// three shelves are dropped from the flower menu.
#[must_use]
pub fn route_flower_tiers(store: &GroupedStore) -> FlowerTiers {
    let mut tiers = FlowerTiers::default();

    for (_, price_group, products) in store.buckets() {
        let Some(tier) = FlowerTier::ALL
            .into_iter()
            .find(|t| t.price_group() == price_group)
        else {
            continue;
        };
        tiers.tier_mut(tier).extend(products.iter().cloned());
    }

    for tier in FlowerTier::ALL {
        tiers.tier_mut(tier).sort_by(|a, b| {
            a.effect_priority
                .cmp(&b.effect_priority)
                .then_with(|| a.display_name().cmp(b.display_name()))
        });
    }

    tiers
}
