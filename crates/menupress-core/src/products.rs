//! Canonical product types shared by the ingestion, pipeline, and CLI crates.
//!
//! ## Observed vendor encodings
//!
//! ### THC / CBD
//! Potency arrives in several encodings depending on the source:
//! - a bare number (`23.4`) or a percent string (`"23.4%"`),
//! - a hyphenated lab range (`"23-27%"`),
//! - a milligram dose (`"800mg"`, `"1200mg"`),
//! - the below-limit-of-quantification marker `"<LOQ"` (CBD only).
//!   [`RawPotency`] models the number-or-text split; the pipeline's field
//!   parsers own the interpretation rules.
//!
//! ### Price
//! The menu-feed API sends integer cents (`price_cents`); scraped listings
//! send decimal dollars. Both are converted to dollars (`f64`) at ingestion,
//! so `RawProduct::price` is always dollars-or-absent.
//!
//! ### Unknown fields
//! Vendors add fields without notice. Both product shapes carry a flattened
//! `extra` map so unrecognized fields survive the pipeline untouched instead
//! of being allow-listed away.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Which ingestion path produced a record.
///
/// The two paths share the classification rules but diverge in two documented
/// places: the CBD percent format (`{:.2}%` for API, bare number + `%` for
/// scrape) and the unknown-effect default priority (hybrid for API,
/// cbd-dominant for scrape, where the scrape display uses 4 as a CBD-bucket
/// signal).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Vendor menu-feed API (nested groups/items envelope).
    #[default]
    Api,
    /// DOM-scraped product listing (flat record array).
    Scrape,
}

/// A potency (or other numeric-ish) value exactly as the vendor sent it:
/// either a JSON number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPotency {
    Number(f64),
    Text(String),
}

impl RawPotency {
    /// Renders the value as text, the way a loosely typed consumer would see it.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(t) => t.clone(),
        }
    }

    /// Interprets the value as a number, using leading-prefix parsing for
    /// text (so `"23.4%"` → `23.4`). Returns `None` when no numeric prefix
    /// exists.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(t) => leading_float(t),
        }
    }

    /// Returns `true` for values that signal "no reading": numeric zero or
    /// empty text. Text `"0"` is deliberately NOT blank — it parses to a
    /// legitimate 0.0% reading downstream.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Number(n) => *n == 0.0,
            Self::Text(t) => t.trim().is_empty(),
        }
    }
}

/// Parses the leading numeric prefix of a string: optional sign, digits,
/// at most one decimal point. Mirrors the prefix semantics loosely typed
/// scrapers rely on (`"23.4% THC"` → `23.4`).
#[must_use]
pub fn leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0usize;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    if !seen_digit {
        return None;
    }
    text[..end].parse().ok()
}

/// A product record as handed over by the fetch/scrape collaborator.
/// Immutable once constructed; the classifier reads it and never writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    /// Free-text vendor name, e.g. `"[$6] Hellavated 2pk"`.
    pub name: String,
    /// Brand / cultivator. Records without one are rejected at validation.
    #[serde(default)]
    pub farm: Option<String>,
    #[serde(default)]
    pub strain: Option<String>,
    /// Free-text effect, e.g. `"Sativa"`, `"HYBRID"`, `"CBD"`.
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub thc: Option<RawPotency>,
    #[serde(default)]
    pub cbd: Option<RawPotency>,
    /// Price in dollars. `None` (or non-finite) fails validation later.
    #[serde(default)]
    pub price: Option<f64>,
    /// Unit size in grams, when the vendor provides it structurally.
    #[serde(default)]
    pub size: Option<f64>,
    /// Promotional / inventory flags, passed through for sale detection.
    #[serde(default)]
    pub tag_list: Vec<String>,
    /// Which listing the record came from (category name or scraped page title).
    #[serde(default)]
    pub source_page: Option<String>,
    #[serde(default)]
    pub origin: Origin,
    /// Unrecognized vendor fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ordinal effect class used as the primary sort key and color selector.
///
/// The numeric values are part of the persisted format (1 = sativa,
/// 2 = hybrid/unknown, 3 = indica, 4 = cbd-dominant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum EffectPriority {
    Sativa = 1,
    Hybrid = 2,
    Indica = 3,
    Cbd = 4,
}

impl EffectPriority {
    /// RGB color assigned to this effect class on printed menus.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Sativa => "rgb(190, 0, 0)",
            Self::Hybrid => "rgb(0, 128, 0)",
            Self::Indica => "rgb(160, 32, 240)",
            Self::Cbd => "rgb(0, 0, 240)",
        }
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<EffectPriority> for u8 {
    fn from(value: EffectPriority) -> Self {
        value as Self
    }
}

impl TryFrom<u8> for EffectPriority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Sativa),
            2 => Ok(Self::Hybrid),
            3 => Ok(Self::Indica),
            4 => Ok(Self::Cbd),
            other => Err(format!("effect priority out of range: {other}")),
        }
    }
}

/// Collapses a free-text effect to the fixed badge label used on menu rows.
#[must_use]
pub fn effect_label(effect: &str) -> &'static str {
    let lower = effect.to_lowercase();
    if lower.contains("sativa") {
        "sativa"
    } else if lower.contains("indica") {
        "indica"
    } else if lower.contains("cbd") {
        "cbd"
    } else {
        "hybrid"
    }
}

/// A parsed CBD percent. Kept as number-or-text because the `<LOQ` marker
/// normalizes to the number `0`, while parseable readings normalize to a
/// formatted percent string — the two are rendered differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CbdPercent {
    Number(f64),
    Text(String),
}

impl CbdPercent {
    /// `true` for the `<LOQ` → `0` marker.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        matches!(self, Self::Number(n) if *n == 0.0)
    }
}

impl std::fmt::Display for CbdPercent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(t) => write!(f, "{t}"),
        }
    }
}

/// The canonical cleaned record every display path consumes.
///
/// Both potency fields are always present even when unparseable: `thc_percent`
/// carries the literal `"N/A"` sentinel, `cbd_percent` carries `None`. The
/// asymmetry is intentional and matches how the two fields are rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    pub name: String,
    /// Display name with known quantity/size/type tokens stripped.
    pub cleaned_name: String,
    pub farm: String,
    #[serde(default)]
    pub strain: Option<String>,
    pub effect: String,
    pub effect_priority: EffectPriority,
    /// Formatted percent string, or the literal `"N/A"`.
    pub thc_percent: String,
    /// Parsed CBD value; `None` means unparseable (distinct from `"N/A"`).
    pub cbd_percent: Option<CbdPercent>,
    /// Price in dollars. Finite and non-negative for every validated record.
    pub price: f64,
    /// `price` formatted to exactly two decimals; the grouping key. Two
    /// prices that round to the same cents share a group by design.
    pub price_group: String,
    /// e.g. `"2pk"`.
    #[serde(default)]
    pub pack_size: Option<String>,
    /// e.g. `"0.5g"` (leading-dot sizes are zero-prefixed).
    #[serde(default)]
    pub matched_size: Option<String>,
    /// Concentrate/format tag, e.g. `"live resin"`, `"preroll"`.
    #[serde(default)]
    pub product_type: Option<String>,
    /// Structural unit size in grams, when the vendor provided one.
    #[serde(default)]
    pub size: Option<f64>,
    #[serde(default)]
    pub tag_list: Vec<String>,
    pub source_page: String,
    #[serde(default)]
    pub origin: Origin,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NormalizedProduct {
    /// Strain name when present, otherwise the cleaned name. Flavored items
    /// often lack a strain, which is why the cleaned name exists at all.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.strain.as_deref() {
            Some(strain) if !strain.is_empty() => strain,
            _ => &self.cleaned_name,
        }
    }

    /// Returns the reason this record must be excluded from grouping, or
    /// `None` if the record is usable.
    #[must_use]
    pub fn validation_failure(&self) -> Option<&'static str> {
        if self.name.is_empty() {
            Some("missing name")
        } else if self.farm.is_empty() {
            Some("missing farm")
        } else if !self.price.is_finite() {
            Some("price is not a number")
        } else if self.price < 0.0 {
            Some("negative price")
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation_failure().is_none()
    }
}
