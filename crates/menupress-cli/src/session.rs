//! In-memory editing session over the grouped menu: manual additions, undo,
//! and the farm filter.
//!
//! The first edit snapshots the loaded products, and undo always restores
//! that snapshot — "back to what was fetched", not an edit-by-edit history.

use thiserror::Error;
use tracing::info;

use menupress_core::{NormalizedProduct, Origin, RawPotency, RawProduct};
use menupress_pipeline::{classify, group_and_sort, GroupedStore};

use crate::store::SavedState;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot add product: {0}")]
    Invalid(&'static str),

    #[error("nothing to undo")]
    NothingToUndo,
}

/// A manually entered product, as collected from the command line.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub farm: String,
    pub price: f64,
    pub name: String,
    pub effect: String,
    pub thc: Option<f64>,
    pub cbd: Option<f64>,
}

/// The working menu plus edit state.
pub struct MenuSession {
    store: GroupedStore,
    backup: Option<Vec<NormalizedProduct>>,
    selected_farms: Option<Vec<String>>,
}

impl MenuSession {
    #[must_use]
    pub fn from_products(products: Vec<NormalizedProduct>) -> Self {
        Self {
            store: group_and_sort(products),
            backup: None,
            selected_farms: None,
        }
    }

    #[must_use]
    pub fn from_state(state: &SavedState) -> Self {
        let mut session = Self::from_products(state.products.clone());
        session.backup = state.backup.clone();
        session
    }

    #[must_use]
    pub fn store(&self) -> &GroupedStore {
        &self.store
    }

    /// Flat product list plus the undo snapshot, for persistence.
    #[must_use]
    pub fn snapshot(&self) -> (Vec<NormalizedProduct>, Option<Vec<NormalizedProduct>>) {
        (self.store.flatten(), self.backup.clone())
    }

    /// The farm filter for rendering; `None` shows every farm.
    #[must_use]
    pub fn selected_farms(&self) -> Option<&[String]> {
        self.selected_farms.as_deref()
    }

    /// Restricts rendering to `farms`.
    pub fn select_farms(&mut self, farms: Vec<String>) {
        self.selected_farms = Some(farms);
    }

    pub fn select_all_farms(&mut self) {
        self.selected_farms = None;
    }

    /// Flips one farm in or out of the filter. With no filter active, the
    /// toggle starts from "all farms selected" and removes the given one.
    /// Filtering only affects rendering; the store itself is untouched.
    pub fn toggle_farm(&mut self, farm: &str) {
        let mut farms = self.selected_farms.take().unwrap_or_else(|| {
            self.store
                .farm_names()
                .into_iter()
                .map(String::from)
                .collect()
        });
        if let Some(index) = farms.iter().position(|f| f == farm) {
            farms.remove(index);
        } else {
            farms.push(farm.to_string());
        }
        self.selected_farms = Some(farms);
    }

    /// Adds a hand-entered product to the menu.
    ///
    /// The entry runs through the same classification as fetched data, so
    /// name cleaning, pack/size extraction, and effect priority all apply.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Invalid`] when required fields are missing or
    /// the classified record fails validation.
    pub fn add_product(&mut self, entry: &NewProduct) -> Result<(), SessionError> {
        if entry.name.trim().is_empty() {
            return Err(SessionError::Invalid("missing strain name"));
        }
        if entry.farm.trim().is_empty() {
            return Err(SessionError::Invalid("missing farm"));
        }
        let Some(thc) = entry.thc else {
            return Err(SessionError::Invalid("missing THC percentage"));
        };

        let raw = RawProduct {
            name: capitalize_words(entry.name.trim()),
            farm: Some(entry.farm.clone()),
            strain: None,
            effect: Some(entry.effect.clone()),
            thc: Some(RawPotency::Text(format!("{thc}%"))),
            cbd: entry.cbd.map(|c| RawPotency::Text(format!("{c}%"))),
            price: Some(entry.price),
            size: None,
            tag_list: vec![],
            source_page: Some("manual".to_string()),
            origin: Origin::Scrape,
            extra: serde_json::Map::new(),
        };

        let product = classify(&raw);
        if let Some(reason) = product.validation_failure() {
            return Err(SessionError::Invalid(reason));
        }

        if self.backup.is_none() {
            self.backup = Some(self.store.flatten());
        }

        info!(name = %product.name, farm = %product.farm, "adding product to menu");
        let mut products = self.store.flatten();
        products.push(product);
        self.store = group_and_sort(products);
        Ok(())
    }

    /// Restores the pre-edit snapshot. The snapshot is kept, so repeated
    /// undo is idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NothingToUndo`] when no edit has been made.
    pub fn undo(&mut self) -> Result<(), SessionError> {
        let backup = self.backup.clone().ok_or(SessionError::NothingToUndo)?;
        info!(products = backup.len(), "restoring menu to pre-edit state");
        self.store = group_and_sort(backup);
        Ok(())
    }
}

/// Uppercases the first letter of each word, leaving the rest untouched
/// (`"blue dream OG"` → `"Blue Dream OG"`).
fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
