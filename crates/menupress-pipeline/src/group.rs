//! Farm → price-group storage and the grouping/sorting pass.
//!
//! [`GroupedStore`] is the in-memory shape every menu view reads: products
//! bucketed by farm, then by the two-decimal price-group key. `BTreeMap`s
//! keep iteration deterministic; views that need numeric price order sort
//! explicitly, because the string key `"14.00"` sorts before `"6.00"`
//! lexicographically.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use menupress_core::NormalizedProduct;

/// Products grouped by farm, then price group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedStore {
    farms: BTreeMap<String, BTreeMap<String, Vec<NormalizedProduct>>>,
}

impl GroupedStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files one product under its farm and price group, preserving arrival
    /// order within the bucket.
    pub fn insert(&mut self, product: NormalizedProduct) {
        self.farms
            .entry(product.farm.clone())
            .or_default()
            .entry(product.price_group.clone())
            .or_default()
            .push(product);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.farms.is_empty()
    }

    /// Total number of products across all buckets.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.farms
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Farm names in deterministic (lexicographic) order.
    #[must_use]
    pub fn farm_names(&self) -> Vec<&str> {
        self.farms.keys().map(String::as_str).collect()
    }

    /// Price-group buckets for one farm.
    #[must_use]
    pub fn farm(&self, farm: &str) -> Option<&BTreeMap<String, Vec<NormalizedProduct>>> {
        self.farms.get(farm)
    }

    /// Iterates `(farm, price_group, products)` buckets in key order.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &str, &[NormalizedProduct])> {
        self.farms.iter().flat_map(|(farm, groups)| {
            groups
                .iter()
                .map(move |(group, products)| (farm.as_str(), group.as_str(), products.as_slice()))
        })
    }

    /// Copies every product back out in bucket order.
    #[must_use]
    pub fn flatten(&self) -> Vec<NormalizedProduct> {
        self.buckets()
            .flat_map(|(_, _, products)| products.iter().cloned())
            .collect()
    }

    /// Consumes the store, yielding every product in bucket order.
    #[must_use]
    pub fn into_flat(self) -> Vec<NormalizedProduct> {
        self.farms
            .into_values()
            .flat_map(BTreeMap::into_values)
            .flatten()
            .collect()
    }

    fn sort_buckets(&mut self) {
        for groups in self.farms.values_mut() {
            for products in groups.values_mut() {
                products.sort_by(|a, b| {
                    a.effect_priority
                        .cmp(&b.effect_priority)
                        .then_with(|| a.name.cmp(&b.name))
                });
            }
        }
    }
}

impl<'a> IntoIterator for &'a GroupedStore {
    type Item = (&'a String, &'a BTreeMap<String, Vec<NormalizedProduct>>);
    type IntoIter = btree_map::Iter<'a, String, BTreeMap<String, Vec<NormalizedProduct>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.farms.iter()
    }
}

/// Input to [`group_and_sort`]: either a flat batch or an already grouped
/// store that needs regrouping (e.g. after an edit changed a price).
#[derive(Debug, Clone)]
pub enum ProductInput {
    Flat(Vec<NormalizedProduct>),
    Grouped(GroupedStore),
}

impl From<Vec<NormalizedProduct>> for ProductInput {
    fn from(products: Vec<NormalizedProduct>) -> Self {
        Self::Flat(products)
    }
}

impl From<GroupedStore> for ProductInput {
    fn from(store: GroupedStore) -> Self {
        Self::Grouped(store)
    }
}

/// Groups products by farm and price group, dropping invalid records with a
/// logged reason, then sorts every bucket by effect priority and name.
///
/// The sort is stable, so products equal on both keys keep their relative
/// arrival order.
#[must_use]
pub fn group_and_sort(input: impl Into<ProductInput>) -> GroupedStore {
    let products = match input.into() {
        ProductInput::Flat(products) => products,
        ProductInput::Grouped(store) => store.into_flat(),
    };

    let mut store = GroupedStore::new();
    for product in products {
        match product.validation_failure() {
            None => store.insert(product),
            Some(reason) => {
                warn!(name = %product.name, reason, "excluding product from menu");
            }
        }
    }
    store.sort_buckets();
    store
}
