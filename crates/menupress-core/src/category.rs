//! The fixed set of menu categories the operator prints.
//!
//! Each category maps to one vendor menu feed and one display mode. The set
//! is closed: fetch requests for anything else are rejected before any
//! network work happens.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Carts,
    Dabs,
    Flower,
    Prerolls,
    Prepacks,
}

#[derive(Debug, Error)]
#[error("unknown category \"{0}\" (expected one of: carts, dabs, flower, prerolls, prepacks)")]
pub struct UnknownCategory(String);

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Carts,
        Self::Dabs,
        Self::Flower,
        Self::Prerolls,
        Self::Prepacks,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Carts => "carts",
            Self::Dabs => "dabs",
            Self::Flower => "flower",
            Self::Prerolls => "prerolls",
            Self::Prepacks => "prepacks",
        }
    }

    /// Environment variable carrying this category's feed ID.
    #[must_use]
    pub fn feed_env_key(self) -> &'static str {
        match self {
            Self::Carts => "MENUPRESS_FEED_CARTS",
            Self::Dabs => "MENUPRESS_FEED_DABS",
            Self::Flower => "MENUPRESS_FEED_FLOWER",
            Self::Prerolls => "MENUPRESS_FEED_PREROLLS",
            Self::Prepacks => "MENUPRESS_FEED_PREPACKS",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "carts" => Ok(Self::Carts),
            "dabs" => Ok(Self::Dabs),
            "flower" => Ok(Self::Flower),
            "prerolls" => Ok(Self::Prerolls),
            "prepacks" => Ok(Self::Prepacks),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_all_known_categories() {
        for category in Category::ALL {
            assert_eq!(Category::from_str(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Category::from_str("Flower").unwrap(), Category::Flower);
    }

    #[test]
    fn rejects_unknown_category() {
        let err = Category::from_str("edibles").unwrap_err();
        assert!(err.to_string().contains("edibles"));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&Category::Prerolls).unwrap(),
            "\"prerolls\""
        );
        let back: Category = serde_json::from_str("\"dabs\"").unwrap();
        assert_eq!(back, Category::Dabs);
    }
}
