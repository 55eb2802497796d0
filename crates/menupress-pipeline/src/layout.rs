//! Print-layout assembly: packs grouped products into two-column pages,
//! flower shelves into fixed-height row pages, and prepacks into a single
//! list.
//!
//! All heights are measured in estimated print lines, tuned against the
//! physical menu template. A section costs its header plus two lines per
//! product; a page title costs three lines. Packing is greedy: fill the left
//! column, then the right, then start a new page.

use serde::{Deserialize, Serialize};

use menupress_core::{effect_label, CbdPercent, EffectPriority, NormalizedProduct};

use crate::group::GroupedStore;
use crate::route::{FlowerTier, FlowerTiers, PrerollCategory, PrerollMenu};

/// Estimated print lines available in one column.
pub const MAX_LINES_PER_COLUMN: usize = 98;
/// Lines consumed by a section header (farm, price, unit label).
pub const SECTION_HEADER_LINES: usize = 3;
/// Lines consumed by each product row in a section.
pub const LINES_PER_ITEM: usize = 2;
/// Lines consumed by a page title heading.
pub const PAGE_TITLE_LINES: usize = 3;
/// Row budget of one flower shelf page.
pub const FLOWER_PAGE_ROWS: usize = 92;
/// Rows pre-consumed on each flower page by the banner and column header.
pub const FLOWER_HEADER_ROWS: usize = 2;

/// Below this many rows the flower shelf switches to loose leading.
const FLOWER_LOOSE_THRESHOLD: usize = 40;
/// Below this many rows the prepack list switches to loose leading.
const PREPACK_LOOSE_THRESHOLD: usize = 26;
/// Final-column threshold for tight leading on the product menu.
const PRODUCTS_TIGHT_THRESHOLD: usize = 100;

/// Tag literals the point-of-sale attaches to discounted flower.
const HALF_OFF_TAG: &str = "Manager Special Flower : Foster";
const THIRTY_OFF_TAG: &str = "Last Chance Flower : Foster";

/// Repeated prices are dimmed, except this one, which always prints solid.
const ALWAYS_SOLID_PRICE: &str = "$12.50 OZ";

/// Leading applied to a rendered menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineHeight {
    Tight,
    Normal,
    Loose,
}

impl LineHeight {
    /// The CSS line-height factor.
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::Tight => 1.0,
            Self::Normal => 1.2,
            Self::Loose => 1.6,
        }
    }
}

/// One product row inside a farm section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    pub display_name: String,
    pub effect_priority: EffectPriority,
    /// THC percent (or `"N/A"`).
    pub primary_percent: String,
    /// CBD percent, present only for cbd-class products, which print both
    /// numbers side by side.
    pub secondary_percent: Option<String>,
}

impl ProductLine {
    fn from_product(product: &NormalizedProduct) -> Self {
        let secondary_percent = (product.effect_priority == EffectPriority::Cbd).then(|| {
            product
                .cbd_percent
                .as_ref()
                .map_or_else(|| "N/A".to_string(), CbdPercent::to_string)
        });
        Self {
            display_name: product.display_name().to_string(),
            effect_priority: product.effect_priority,
            primary_percent: product.thc_percent.clone(),
            secondary_percent,
        }
    }
}

/// A farm/price/type section: header plus product rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub farm: String,
    /// Two-decimal price string as printed, e.g. `"6.00"`.
    pub price_group: String,
    /// Title-cased product type, `"Other"` when the products carry none.
    pub product_type: String,
    /// Unit annotation next to the type: `"2pk 0.5g"`, `"3.5g"`, or empty.
    pub unit_label: String,
    pub lines: Vec<ProductLine>,
}

impl Section {
    /// Estimated print lines this section occupies.
    #[must_use]
    pub fn line_cost(&self) -> usize {
        SECTION_HEADER_LINES + self.lines.len() * LINES_PER_ITEM
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub title: Option<String>,
    pub left: Column,
    pub right: Column,
}

/// The packed two-column menu.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutTree {
    pub pages: Vec<Page>,
}

/// The product menu plus the leading chosen for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLayout {
    pub tree: LayoutTree,
    pub line_height: LineHeight,
}

/// Greedy two-column packer. Pages are created lazily so an empty input
/// yields an empty tree; a carried title reappears on every overflow page.
struct PagePacker {
    pages: Vec<Page>,
    title: Option<String>,
    left_count: usize,
    right_count: usize,
}

impl PagePacker {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            title: None,
            left_count: 0,
            right_count: 0,
        }
    }

    /// Opens a fresh page headed by `title`; the title is carried onto any
    /// overflow pages until the next `start_page`.
    fn start_page(&mut self, title: &str) {
        self.title = Some(title.to_string());
        self.open_page();
    }

    fn open_page(&mut self) {
        self.pages.push(Page {
            title: self.title.clone(),
            left: Column::default(),
            right: Column::default(),
        });
        self.left_count = if self.title.is_some() {
            PAGE_TITLE_LINES
        } else {
            0
        };
        self.right_count = 0;
    }

    fn push(&mut self, section: Section) {
        let cost = section.line_cost();
        if self.pages.is_empty() {
            self.open_page();
        }

        let page = self.pages.last_mut().expect("page opened above");
        if self.left_count + cost <= MAX_LINES_PER_COLUMN {
            page.left.sections.push(section);
            self.left_count += cost;
        } else if self.right_count + cost <= MAX_LINES_PER_COLUMN {
            page.right.sections.push(section);
            self.right_count += cost;
        } else {
            self.open_page();
            let page = self.pages.last_mut().expect("page opened above");
            page.left.sections.push(section);
            // Overflow pages count only the section itself, title included
            // or not; this mirrors the printed template's measurements.
            self.left_count = cost;
        }
    }

    /// Returns the packed tree and the fill of the final left column, which
    /// drives the leading decision on the product menu.
    fn finish(self) -> (LayoutTree, usize) {
        (LayoutTree { pages: self.pages }, self.left_count)
    }
}

/// Flattens a grouped store into display sections: price groups sorted by
/// price then farm, each split into per-type sections in first-seen type
/// order. `selected_farms` limits output to those farms; `None` means all.
#[must_use]
pub fn sections_from_store(
    store: &GroupedStore,
    selected_farms: Option<&[String]>,
) -> Vec<Section> {
    let mut groups: Vec<(&str, f64, &str, &[NormalizedProduct])> = store
        .buckets()
        .filter(|(farm, _, _)| {
            selected_farms.map_or(true, |farms| farms.iter().any(|f| f == farm))
        })
        .map(|(farm, price_group, products)| {
            let price = price_group.parse::<f64>().unwrap_or(0.0);
            (farm, price, price_group, products)
        })
        .collect();
    groups.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    let mut sections = Vec::new();
    for (farm, _, price_group, products) in groups {
        // Split the price group by product type, keeping first-seen order.
        let mut by_type: Vec<(String, Vec<&NormalizedProduct>)> = Vec::new();
        for product in products {
            let type_key = product
                .product_type
                .clone()
                .unwrap_or_else(|| "Other".to_string());
            match by_type.iter_mut().find(|(t, _)| *t == type_key) {
                Some((_, bucket)) => bucket.push(product),
                None => by_type.push((type_key, vec![product])),
            }
        }

        for (type_key, bucket) in by_type {
            let first = bucket[0];
            sections.push(Section {
                farm: farm.to_string(),
                price_group: price_group.to_string(),
                product_type: title_case(&type_key),
                unit_label: unit_label(first),
                lines: bucket.iter().map(|p| ProductLine::from_product(p)).collect(),
            });
        }
    }
    sections
}

/// Unit annotation for a section, taken from its first product: pack size
/// (with the matched gram size when known), else the structural gram size,
/// else nothing.
fn unit_label(product: &NormalizedProduct) -> String {
    if let Some(pack) = &product.pack_size {
        return match &product.matched_size {
            Some(size) => format!("{pack} {size}"),
            None => pack.clone(),
        };
    }
    match product.size {
        Some(size) => format!("{size}g"),
        None => String::new(),
    }
}

/// Packs the general product menu (carts, dabs) into untitled pages.
#[must_use]
pub fn layout_products(store: &GroupedStore, selected_farms: Option<&[String]>) -> ProductLayout {
    let mut packer = PagePacker::new();
    for section in sections_from_store(store, selected_farms) {
        packer.push(section);
    }
    let (tree, final_left) = packer.finish();
    let line_height = if final_left < PRODUCTS_TIGHT_THRESHOLD {
        LineHeight::Tight
    } else {
        LineHeight::Normal
    };
    ProductLayout { tree, line_height }
}

/// Packs the preroll menu: each sub-menu opens a titled page, and its
/// overflow pages repeat the title. The leading decision is the same one the
/// product menu makes, from the final left column's fill.
#[must_use]
pub fn layout_prerolls(menu: &PrerollMenu) -> ProductLayout {
    let mut packer = PagePacker::new();
    for category in PrerollCategory::ALL {
        packer.start_page(category.title());
        for section in sections_from_store(menu.category(category), None) {
            packer.push(section);
        }
    }
    let (tree, final_left) = packer.finish();
    let line_height = if final_left < PRODUCTS_TIGHT_THRESHOLD {
        LineHeight::Tight
    } else {
        LineHeight::Normal
    };
    ProductLayout { tree, line_height }
}

/// Discount badge printed on a flower row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleBadge {
    HalfOff,
    ThirtyOff,
}

impl SaleBadge {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::HalfOff => "50% off",
            Self::ThirtyOff => "30% off",
        }
    }

    #[must_use]
    pub fn background(self) -> &'static str {
        match self {
            Self::HalfOff => "#FF00BF",
            Self::ThirtyOff => "#FFD700",
        }
    }

    #[must_use]
    pub fn text_color(self) -> &'static str {
        match self {
            Self::HalfOff => "white",
            Self::ThirtyOff => "black",
        }
    }

    fn from_tags(tags: &[String]) -> Option<Self> {
        if tags.iter().any(|t| t == HALF_OFF_TAG) {
            Some(Self::HalfOff)
        } else if tags.iter().any(|t| t == THIRTY_OFF_TAG) {
            Some(Self::ThirtyOff)
        } else {
            None
        }
    }
}

/// One row of a flower shelf table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowerRow {
    pub strain: String,
    pub effect_priority: EffectPriority,
    /// Fixed badge label: `"sativa"`, `"hybrid"`, `"indica"`, or `"cbd"`.
    pub effect: String,
    pub farm: String,
    pub thc_percent: String,
    /// CBD column as printed: the reading, `"0%"`, or `"N/A"`.
    pub cbd_cell: String,
    pub price_label: String,
    /// Dimmed because the row above prints the same price.
    pub price_repeated: bool,
    #[serde(default)]
    pub sale: Option<SaleBadge>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowerPage {
    pub rows: Vec<FlowerRow>,
}

/// One shelf (Gold/Platinum/Diamond) split into row-budgeted pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowerShelf {
    pub tier: FlowerTier,
    pub pages: Vec<FlowerPage>,
}

/// The full flower menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowerLayout {
    pub shelves: Vec<FlowerShelf>,
    pub line_height: LineHeight,
}

/// Price cell text: whole-dollar prices print without cents, half-dollar
/// prices with them, and ounce packages get the `OZ` suffix.
#[must_use]
pub fn price_label(price: f64, size: Option<f64>) -> String {
    let amount = if (price.fract() - 0.5).abs() < f64::EPSILON {
        format!("{price:.2}")
    } else {
        format!("{price:.0}")
    };
    match size {
        Some(s) if s == 28.0 => format!("${amount} OZ"),
        _ => format!("${amount}"),
    }
}

/// CBD column text: missing or below-quantification readings print `"N/A"`,
/// the two-decimal zero collapses to `"0%"`, anything else prints verbatim.
fn cbd_cell(cbd: Option<&CbdPercent>) -> String {
    match cbd {
        None => "N/A".to_string(),
        Some(value) if value.is_zero() => "N/A".to_string(),
        Some(CbdPercent::Text(t)) if t == "0.00%" => "0%".to_string(),
        Some(value) => value.to_string(),
    }
}

/// Tracks consecutive identical price labels so repeats can be dimmed.
struct PriceRun {
    last: Option<String>,
}

impl PriceRun {
    fn new() -> Self {
        Self { last: None }
    }

    fn is_repeat(&mut self, label: &str) -> bool {
        if self.last.as_deref() == Some(label) && label != ALWAYS_SOLID_PRICE {
            true
        } else {
            self.last = Some(label.to_string());
            false
        }
    }
}

/// Lays out the three flower shelves. Each shelf fills pages of
/// [`FLOWER_PAGE_ROWS`] rows (banner and header pre-counted); the menu's
/// leading is loose while the final page stays short.
#[must_use]
pub fn layout_flower(tiers: &FlowerTiers) -> FlowerLayout {
    let mut shelves = Vec::new();
    // With no rows at all the leading stays at its normal value.
    let mut last_fill: Option<usize> = None;

    for tier in FlowerTier::ALL {
        let mut pages = Vec::new();
        let mut current = FlowerPage::default();
        let mut fill = FLOWER_HEADER_ROWS;
        let mut prices = PriceRun::new();

        for product in tiers.tier(tier) {
            let label = price_label(product.price, product.size);
            current.rows.push(FlowerRow {
                strain: product.display_name().to_string(),
                effect_priority: product.effect_priority,
                effect: effect_label(&product.effect).to_string(),
                farm: product.farm.clone(),
                thc_percent: product.thc_percent.clone(),
                cbd_cell: cbd_cell(product.cbd_percent.as_ref()),
                price_repeated: prices.is_repeat(&label),
                price_label: label,
                sale: SaleBadge::from_tags(&product.tag_list),
            });
            fill += 1;
            last_fill = Some(fill);

            if fill > FLOWER_PAGE_ROWS {
                pages.push(std::mem::take(&mut current));
                fill = FLOWER_HEADER_ROWS;
            }
        }
        if !current.rows.is_empty() {
            pages.push(current);
        }
        shelves.push(FlowerShelf { tier, pages });
    }

    let line_height = match last_fill {
        Some(fill) if fill < FLOWER_LOOSE_THRESHOLD => LineHeight::Loose,
        _ => LineHeight::Normal,
    };
    FlowerLayout {
        shelves,
        line_height,
    }
}

/// One row of the prepack specials list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepackRow {
    pub price_label: String,
    pub price_repeated: bool,
    pub strain: String,
    pub effect_priority: EffectPriority,
    pub effect: String,
    pub thc_percent: String,
    pub cbd_cell: String,
}

/// The single-page prepack specials list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepackLayout {
    pub title: String,
    pub disclaimer: String,
    pub rows: Vec<PrepackRow>,
    pub line_height: LineHeight,
}

/// Lays out the half-ounce prepack list: only products whose name carries
/// the `PrePack` marker, cheapest first, larger packages first at equal
/// price.
#[must_use]
pub fn layout_prepacks(store: &GroupedStore) -> PrepackLayout {
    let mut products: Vec<NormalizedProduct> = store
        .flatten()
        .into_iter()
        .filter(|p| p.name.contains("PrePack"))
        .collect();
    products.sort_by(|a, b| {
        a.price.total_cmp(&b.price).then_with(|| {
            b.size
                .unwrap_or(0.0)
                .total_cmp(&a.size.unwrap_or(0.0))
        })
    });

    let mut prices = PriceRun::new();
    let rows: Vec<PrepackRow> = products
        .iter()
        .map(|product| {
            let label = price_label(product.price, product.size);
            PrepackRow {
                price_repeated: prices.is_repeat(&label),
                price_label: label,
                strain: product.display_name().to_string(),
                effect_priority: product.effect_priority,
                effect: effect_label(&product.effect).to_string(),
                thc_percent: product.thc_percent.clone(),
                cbd_cell: cbd_cell(product.cbd_percent.as_ref()),
            }
        })
        .collect();

    let line_height = if rows.len() < PREPACK_LOOSE_THRESHOLD {
        LineHeight::Loose
    } else {
        LineHeight::Normal
    };
    PrepackLayout {
        title: "1/2 Ounce PrePack Specials".to_string(),
        disclaimer: "No Discounts Apply".to_string(),
        rows,
        line_height,
    }
}

/// Capitalizes the first letter of each word and lowercases the rest.
#[must_use]
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::group_and_sort;
    use crate::route::{route_flower_tiers, route_prerolls};
    use menupress_core::Origin;
    use serde_json::Map;

    fn make_product(farm: &str, price: f64, name: &str) -> NormalizedProduct {
        NormalizedProduct {
            name: name.to_string(),
            cleaned_name: name.to_string(),
            farm: farm.to_string(),
            strain: None,
            effect: "Hybrid".to_string(),
            effect_priority: EffectPriority::Hybrid,
            thc_percent: "20.0%".to_string(),
            cbd_percent: None,
            price,
            price_group: format!("{price:.2}"),
            pack_size: None,
            matched_size: None,
            product_type: None,
            size: None,
            tag_list: vec![],
            source_page: "carts".to_string(),
            origin: Origin::Api,
            extra: Map::new(),
        }
    }

    fn single_line_sections(count: usize) -> Vec<NormalizedProduct> {
        // Distinct farms so each product becomes its own 5-line section.
        (0..count)
            .map(|i| make_product(&format!("farm-{i:03}"), 10.0, &format!("Item {i:03}")))
            .collect()
    }

    // -----------------------------------------------------------------------
    // sections_from_store
    // -----------------------------------------------------------------------

    #[test]
    fn sections_sort_by_price_then_farm() {
        let store = group_and_sort(vec![
            make_product("zeta", 5.0, "A"),
            make_product("alpha", 9.0, "B"),
            make_product("alpha", 5.0, "C"),
        ]);
        let sections = sections_from_store(&store, None);
        let keys: Vec<_> = sections
            .iter()
            .map(|s| (s.price_group.as_str(), s.farm.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![("5.00", "alpha"), ("5.00", "zeta"), ("9.00", "alpha")]
        );
    }

    #[test]
    fn price_groups_split_by_type_in_first_seen_order() {
        let mut cart = make_product("alpha", 10.0, "Cart Item");
        cart.product_type = Some("cart".to_string());
        let mut resin = make_product("alpha", 10.0, "Resin Item");
        resin.product_type = Some("live resin".to_string());
        let untyped = make_product("alpha", 10.0, "Plain Item");

        let store = group_and_sort(vec![cart, resin, untyped]);
        let sections = sections_from_store(&store, None);
        let types: Vec<_> = sections.iter().map(|s| s.product_type.as_str()).collect();
        assert_eq!(types, vec!["Cart", "Live Resin", "Other"]);
    }

    #[test]
    fn selected_farms_filter_sections() {
        let store = group_and_sort(vec![
            make_product("alpha", 5.0, "A"),
            make_product("beta", 5.0, "B"),
        ]);
        let selected = vec!["beta".to_string()];
        let sections = sections_from_store(&store, Some(&selected));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].farm, "beta");
    }

    #[test]
    fn unit_label_prefers_pack_size() {
        let mut product = make_product("alpha", 10.0, "A");
        product.pack_size = Some("2pk".to_string());
        product.matched_size = Some("0.5g".to_string());
        assert_eq!(unit_label(&product), "2pk 0.5g");

        product.matched_size = None;
        assert_eq!(unit_label(&product), "2pk");

        product.pack_size = None;
        product.size = Some(3.5);
        assert_eq!(unit_label(&product), "3.5g");

        product.size = None;
        assert_eq!(unit_label(&product), "");
    }

    #[test]
    fn cbd_lines_carry_both_percents() {
        let mut product = make_product("alpha", 10.0, "ACDC");
        product.effect_priority = EffectPriority::Cbd;
        product.cbd_percent = Some(CbdPercent::Text("5.00%".to_string()));
        let store = group_and_sort(vec![product]);
        let sections = sections_from_store(&store, None);
        let line = &sections[0].lines[0];
        assert_eq!(line.secondary_percent.as_deref(), Some("5.00%"));
    }

    // -----------------------------------------------------------------------
    // layout_products / PagePacker
    // -----------------------------------------------------------------------

    #[test]
    fn empty_store_yields_no_pages() {
        let layout = layout_products(&GroupedStore::new(), None);
        assert!(layout.tree.pages.is_empty());
    }

    #[test]
    fn columns_fill_left_then_right_then_overflow() {
        // Each section costs 5 lines, so a 98-line column fits 19 of them
        // and a page fits 38.
        let store = group_and_sort(single_line_sections(40));
        let layout = layout_products(&store, None);

        assert_eq!(layout.tree.pages.len(), 2);
        assert_eq!(layout.tree.pages[0].left.sections.len(), 19);
        assert_eq!(layout.tree.pages[0].right.sections.len(), 19);
        assert_eq!(layout.tree.pages[1].left.sections.len(), 2);
        assert!(layout.tree.pages[1].right.sections.is_empty());
    }

    #[test]
    fn no_section_is_lost_or_duplicated() {
        let store = group_and_sort(single_line_sections(77));
        let layout = layout_products(&store, None);
        let total: usize = layout
            .tree
            .pages
            .iter()
            .map(|p| p.left.sections.len() + p.right.sections.len())
            .sum();
        assert_eq!(total, 77);
    }

    #[test]
    fn column_budget_is_respected() {
        let store = group_and_sort(single_line_sections(100));
        let layout = layout_products(&store, None);
        for page in &layout.tree.pages {
            for column in [&page.left, &page.right] {
                let cost: usize = column.sections.iter().map(Section::line_cost).sum();
                assert!(cost <= MAX_LINES_PER_COLUMN);
            }
        }
    }

    #[test]
    fn short_final_column_uses_tight_leading() {
        let store = group_and_sort(single_line_sections(3));
        let layout = layout_products(&store, None);
        assert_eq!(layout.line_height, LineHeight::Tight);
    }

    // -----------------------------------------------------------------------
    // layout_prerolls
    // -----------------------------------------------------------------------

    #[test]
    fn every_preroll_category_opens_a_titled_page() {
        let store = group_and_sort(vec![make_product("farm", 5.0, "Plain Single")]);
        let layout = layout_prerolls(&route_prerolls(&store));

        let titles: Vec<_> = layout
            .tree
            .pages
            .iter()
            .map(|p| p.title.as_deref().unwrap_or(""))
            .collect();
        assert_eq!(
            titles,
            vec!["Single Prerolls", "Preroll Packs", "Infused Prerolls"]
        );
        assert_eq!(layout.tree.pages[0].left.sections.len(), 1);
    }

    #[test]
    fn titled_pages_reserve_heading_space() {
        // With a 3-line title the left column fits 19 five-line sections
        // (3 + 95 = 98); the 39th section of the category overflows onto a
        // second titled page.
        let products: Vec<_> = (0..39)
            .map(|i| make_product(&format!("farm-{i:03}"), 5.0, &format!("Single {i:03}")))
            .collect();
        let layout = layout_prerolls(&route_prerolls(&group_and_sort(products)));

        let single_pages: Vec<_> = layout
            .tree
            .pages
            .iter()
            .filter(|p| p.title.as_deref() == Some("Single Prerolls"))
            .collect();
        assert_eq!(single_pages.len(), 2);
        assert_eq!(single_pages[0].left.sections.len(), 19);
        assert_eq!(single_pages[0].right.sections.len(), 19);
        assert_eq!(single_pages[1].left.sections.len(), 1);
    }

    #[test]
    fn preroll_menu_carries_the_leading_hint() {
        // A short menu leaves the final left column nearly empty.
        let store = group_and_sort(vec![make_product("farm", 5.0, "Plain Single")]);
        let layout = layout_prerolls(&route_prerolls(&store));
        assert_eq!(layout.line_height, LineHeight::Tight);

        // One oversized section (49 products, 3 + 98 = 101 lines) lands alone
        // on an overflow page and pushes the final fill past the threshold.
        let bulk: Vec<_> = (0..49)
            .map(|i| {
                let mut product =
                    make_product("farm", 5.0, &format!("Infused Moonrock {i:03}"));
                product.product_type = Some("infused".to_string());
                product
            })
            .collect();
        let layout = layout_prerolls(&route_prerolls(&group_and_sort(bulk)));
        assert_eq!(layout.line_height, LineHeight::Normal);
    }

    // -----------------------------------------------------------------------
    // layout_flower
    // -----------------------------------------------------------------------

    fn flower(farm: &str, price: f64, name: &str) -> NormalizedProduct {
        let mut product = make_product(farm, price, name);
        product.source_page = "flower".to_string();
        product
    }

    #[test]
    fn shelves_page_at_the_row_budget() {
        // Rows start counting above the 2 header rows, so a page holds 91
        // product rows before breaking.
        let products: Vec<_> = (0..100)
            .map(|i| flower(&format!("farm-{i:03}"), 6.0, &format!("Strain {i:03}")))
            .collect();
        let layout = layout_flower(&route_flower_tiers(&group_and_sort(products)));

        let gold = &layout.shelves[0];
        assert_eq!(gold.tier, FlowerTier::Gold);
        assert_eq!(gold.pages.len(), 2);
        assert_eq!(gold.pages[0].rows.len(), 91);
        assert_eq!(gold.pages[1].rows.len(), 9);
        assert_eq!(layout.line_height, LineHeight::Loose);
    }

    #[test]
    fn empty_shelves_produce_no_pages() {
        let layout = layout_flower(&FlowerTiers::default());
        assert_eq!(layout.shelves.len(), 3);
        assert!(layout.shelves.iter().all(|s| s.pages.is_empty()));
        // Nothing rendered, so the leading keeps its normal value.
        assert_eq!(layout.line_height, LineHeight::Normal);
    }

    #[test]
    fn sale_tags_map_to_badges() {
        let mut half = flower("a", 6.0, "Half Off Strain");
        half.tag_list = vec![HALF_OFF_TAG.to_string()];
        let mut thirty = flower("b", 6.0, "Thirty Off Strain");
        thirty.tag_list = vec![THIRTY_OFF_TAG.to_string()];
        let plain = flower("c", 6.0, "Plain Strain");

        let layout = layout_flower(&route_flower_tiers(&group_and_sort(vec![
            half, thirty, plain,
        ])));
        let rows = &layout.shelves[0].pages[0].rows;
        let badge_for = |name: &str| {
            rows.iter()
                .find(|r| r.strain == name)
                .and_then(|r| r.sale)
        };
        assert_eq!(badge_for("Half Off Strain"), Some(SaleBadge::HalfOff));
        assert_eq!(badge_for("Thirty Off Strain"), Some(SaleBadge::ThirtyOff));
        assert_eq!(badge_for("Plain Strain"), None);
    }

    #[test]
    fn repeated_prices_are_dimmed() {
        let layout = layout_flower(&route_flower_tiers(&group_and_sort(vec![
            flower("a", 6.0, "Aaa"),
            flower("b", 6.0, "Bbb"),
        ])));
        let rows = &layout.shelves[0].pages[0].rows;
        assert!(!rows[0].price_repeated);
        assert!(rows[1].price_repeated);
    }

    #[test]
    fn flower_cbd_cell_rules() {
        assert_eq!(cbd_cell(None), "N/A");
        assert_eq!(cbd_cell(Some(&CbdPercent::Number(0.0))), "N/A");
        assert_eq!(
            cbd_cell(Some(&CbdPercent::Text("0.00%".to_string()))),
            "0%"
        );
        assert_eq!(cbd_cell(Some(&CbdPercent::Text("5%".to_string()))), "5%");
    }

    // -----------------------------------------------------------------------
    // price_label
    // -----------------------------------------------------------------------

    #[test]
    fn whole_prices_print_without_cents() {
        assert_eq!(price_label(6.0, None), "$6");
        assert_eq!(price_label(40.0, None), "$40");
    }

    #[test]
    fn half_dollar_prices_keep_cents() {
        assert_eq!(price_label(12.5, None), "$12.50");
    }

    #[test]
    fn ounce_packages_get_the_suffix() {
        assert_eq!(price_label(80.0, Some(28.0)), "$80 OZ");
        assert_eq!(price_label(80.0, Some(14.0)), "$80");
    }

    // -----------------------------------------------------------------------
    // layout_prepacks
    // -----------------------------------------------------------------------

    fn prepack(price: f64, size: f64, name: &str) -> NormalizedProduct {
        let mut product = make_product("farm", price, name);
        product.size = Some(size);
        product
    }

    #[test]
    fn prepacks_filter_on_the_name_marker() {
        let store = group_and_sort(vec![
            prepack(60.0, 14.0, "PrePack Blue Dream"),
            prepack(60.0, 14.0, "Loose Blue Dream"),
        ]);
        let layout = layout_prepacks(&store);
        assert_eq!(layout.rows.len(), 1);
        assert_eq!(layout.rows[0].strain, "PrePack Blue Dream");
    }

    #[test]
    fn prepacks_sort_by_price_then_size_descending() {
        let store = group_and_sort(vec![
            prepack(80.0, 14.0, "PrePack C"),
            prepack(60.0, 14.0, "PrePack A"),
            prepack(60.0, 28.0, "PrePack B"),
        ]);
        let layout = layout_prepacks(&store);
        let names: Vec<_> = layout.rows.iter().map(|r| r.strain.as_str()).collect();
        assert_eq!(names, vec!["PrePack B", "PrePack A", "PrePack C"]);
    }

    #[test]
    fn the_solid_price_exception_never_dims() {
        let store = group_and_sort(vec![
            prepack(12.5, 28.0, "PrePack A"),
            prepack(12.5, 28.0, "PrePack B"),
        ]);
        let layout = layout_prepacks(&store);
        assert_eq!(layout.rows[0].price_label, "$12.50 OZ");
        assert!(!layout.rows[0].price_repeated);
        assert!(!layout.rows[1].price_repeated);
    }

    #[test]
    fn short_prepack_lists_use_loose_leading() {
        let store = group_and_sort(vec![prepack(60.0, 14.0, "PrePack A")]);
        assert_eq!(layout_prepacks(&store).line_height, LineHeight::Loose);
    }

    #[test]
    fn prepack_banner_text_is_fixed() {
        let layout = layout_prepacks(&GroupedStore::new());
        assert_eq!(layout.title, "1/2 Ounce PrePack Specials");
        assert_eq!(layout.disclaimer, "No Discounts Apply");
    }

    // -----------------------------------------------------------------------
    // title_case
    // -----------------------------------------------------------------------

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("live resin"), "Live Resin");
        assert_eq!(title_case("CART"), "Cart");
        assert_eq!(title_case(""), "");
    }
}
