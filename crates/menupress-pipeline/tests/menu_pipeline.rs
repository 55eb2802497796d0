//! End-to-end pipeline tests: raw vendor records through classification,
//! grouping, routing, and layout.

use menupress_core::{EffectPriority, Origin, RawPotency, RawProduct};
use menupress_pipeline::{
    classify_batch, group_and_sort, layout_prerolls, route_prerolls,
};
use serde_json::Map;

fn raw(name: &str, farm: &str, effect: &str, price: f64) -> RawProduct {
    RawProduct {
        name: name.to_string(),
        farm: Some(farm.to_string()),
        strain: None,
        effect: Some(effect.to_string()),
        thc: None,
        cbd: None,
        price: Some(price),
        size: None,
        tag_list: vec![],
        source_page: Some("prerolls".to_string()),
        origin: Origin::Scrape,
        extra: Map::new(),
    }
}

#[test]
fn scraped_pack_listing_flows_to_the_infused_menu() {
    let mut listing = raw("[$6] Hellavated 2pk", "Hellavated", "Sativa", 6.0);
    listing.thc = Some(RawPotency::Text("23-27%".to_string()));

    let products = classify_batch(&[listing]);
    assert_eq!(products.len(), 1);
    let product = &products[0];
    assert_eq!(product.cleaned_name, "Hellavated");
    assert_eq!(product.pack_size.as_deref(), Some("2pk"));
    assert_eq!(product.thc_percent, "27%");
    assert_eq!(product.effect_priority, EffectPriority::Sativa);
    assert_eq!(product.price_group, "6.00");

    let menu = route_prerolls(&group_and_sort(products));
    assert_eq!(menu.infused.product_count(), 1);

    let layout = layout_prerolls(&menu);
    let infused_page = layout
        .tree
        .pages
        .iter()
        .find(|p| p.title.as_deref() == Some("Infused Prerolls"))
        .expect("infused page present");
    let section = &infused_page.left.sections[0];
    assert_eq!(section.farm, "Hellavated");
    assert_eq!(section.price_group, "6.00");
    assert_eq!(section.unit_label, "2pk");
    assert_eq!(section.lines[0].display_name, "Hellavated");
}

#[test]
fn grouping_then_layout_loses_no_valid_product() {
    let batch: Vec<RawProduct> = (0..25)
        .map(|i| {
            raw(
                &format!("Strain {i:02} Preroll"),
                &format!("farm-{}", i % 5),
                "Hybrid",
                f64::from(i % 3) + 5.0,
            )
        })
        .collect();

    let products = classify_batch(&batch);
    let store = group_and_sort(products);
    assert_eq!(store.product_count(), 25);

    let layout = layout_prerolls(&route_prerolls(&store));
    let lines: usize = layout
        .tree
        .pages
        .iter()
        .flat_map(|p| p.left.sections.iter().chain(&p.right.sections))
        .map(|s| s.lines.len())
        .sum();
    assert_eq!(lines, 25);
}

#[test]
fn mixed_feed_sorts_within_price_groups() {
    let mut indica = raw("Apple Preroll", "farm", "Indica", 5.0);
    indica.thc = Some(RawPotency::Text("22%".to_string()));
    let sativa = raw("Zest Preroll", "farm", "Sativa", 5.0);
    let hybrid = raw("Mango Preroll", "farm", "Hybrid", 5.0);

    let store = group_and_sort(classify_batch(&[indica, hybrid, sativa]));
    let names: Vec<_> = store.farm("farm").unwrap()["5.00"]
        .iter()
        .map(|p| p.name.clone())
        .collect();
    assert_eq!(
        names,
        vec!["Zest Preroll", "Mango Preroll", "Apple Preroll"]
    );
}
