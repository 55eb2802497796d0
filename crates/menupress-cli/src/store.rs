//! JSON-file persistence for the working menu state.
//!
//! The state survives between invocations so a fetch, a few manual edits,
//! and a render can happen in separate runs. One file, whole-state
//! read/write; the data is a few hundred products at most.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use menupress_core::{Category, NormalizedProduct};

/// Env var overriding where the state file lives.
const STATE_PATH_VAR: &str = "MENUPRESS_STATE_PATH";
const DEFAULT_STATE_FILE: &str = "menupress-state.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read or write the state file: {0}")]
    Io(#[from] std::io::Error),

    #[error("state file is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Everything the CLI persists between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default)]
    pub products: Vec<NormalizedProduct>,
    /// Snapshot taken before the most recent edit, for undo.
    #[serde(default)]
    pub backup: Option<Vec<NormalizedProduct>>,
    /// The category the current products were fetched for.
    #[serde(default)]
    pub category: Option<Category>,
}

/// Handle to the on-disk state file.
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// Uses `MENUPRESS_STATE_PATH` when set, else a file in the working
    /// directory.
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var(STATE_PATH_VAR)
            .map_or_else(|_| PathBuf::from(DEFAULT_STATE_FILE), PathBuf::from);
        Self { path }
    }

    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved state; a missing file is an empty state, not an
    /// error, so first runs need no setup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file exists but cannot be read or
    /// parsed.
    pub fn load(&self) -> Result<SavedState, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no state file yet, starting empty");
            return Ok(SavedState::default());
        }
        let text = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the state back, pretty-printed so manual inspection stays
    /// feasible.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file cannot be written.
    pub fn save(&self, state: &SavedState) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, text)?;
        debug!(path = %self.path.display(), products = state.products.len(), "state saved");
        Ok(())
    }
}
