//! Pure field-level parsers: potency, price, effect priority, name cleaning,
//! and the pack/size extractors.
//!
//! Every function here is total — unparseable input produces a sentinel
//! (`"N/A"` for THC, `None` for CBD), never an error. The asymmetry between
//! the two sentinels is intentional: the display paths render them
//! differently.
//!
//! The THC milligram-to-percent constants (divide by 20 above 999 mg, else by
//! 10; divide by unit-size × 10 on the API path at ≥ 99) are empirical
//! calibrations against this vendor's data, not a general formula. Do not
//! generalize them.

use std::sync::LazyLock;

use regex::Regex;

use menupress_core::{leading_float, CbdPercent, EffectPriority, Origin, RawPotency};

use crate::patterns;

/// Sentinel for an absent or unusable THC reading.
pub const THC_NA: &str = "N/A";

/// Leading bracketed price annotation with a trailing dash:
/// `"[$6] Hellavated - 2pk"` → everything through the dash goes.
static PRICE_DASH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?-").expect("valid price-dash pattern"));

/// Bracketed annotation without a dash: `"[$6] Hellavated"` → the bracket
/// group alone goes.
static PRICE_BRACKET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid price-bracket pattern"));

/// Pack count before a literal `pk` suffix, e.g. `"2pk"`, `"12pk"`.
static PACK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b\d+pk\b").expect("valid pack pattern"));

/// Classifies a free-text effect into its sort/color priority.
///
/// Rules are evaluated in fixed order: sativa (substring) → hybrid (exact) →
/// indica (substring) → cbd (substring) → per-origin default. The API path
/// defaults unknown effects to hybrid; the scrape path defaults to the
/// cbd-dominant bucket, which its display logic uses as a CBD signal.
#[must_use]
pub fn effect_priority(effect: &str, origin: Origin) -> EffectPriority {
    let lower = effect.to_lowercase();
    if lower.contains("sativa") {
        EffectPriority::Sativa
    } else if lower == "hybrid" {
        EffectPriority::Hybrid
    } else if lower.contains("indica") {
        EffectPriority::Indica
    } else if lower.contains("cbd") {
        EffectPriority::Cbd
    } else {
        match origin {
            Origin::Api => EffectPriority::Hybrid,
            Origin::Scrape => EffectPriority::Cbd,
        }
    }
}

/// Parses a scraped THC value into a display percent.
///
/// - Hyphenated lab range: keep the high bound (`"23-27%"` → `"27%"`).
/// - Milligram dose: convert to an approximate percent — above 999 mg divide
///   by 20, otherwise by 10 — rendered to one decimal with a `%` suffix
///   (`"1200mg"` → `"60.0%"`, `"800mg"` → `"80.0%"`).
/// - Anything else passes through as-is.
/// - Absent or blank input yields [`THC_NA`].
#[must_use]
pub fn parse_thc_scraped(raw: Option<&RawPotency>) -> String {
    let Some(raw) = raw.filter(|r| !r.is_blank()) else {
        return THC_NA.to_string();
    };

    let mut percent = raw.as_text().trim().to_string();
    if let Some((_, high)) = percent.split_once('-') {
        percent = high.trim().to_string();
    }

    if percent.ends_with("mg") {
        if let Some(mg) = first_integer(&percent) {
            let divisor = if mg > 999 { 20.0 } else { 10.0 };
            #[allow(clippy::cast_precision_loss)]
            return format!("{:.1}%", mg as f64 / divisor);
        }
    }

    percent
}

/// Parses an API-sourced THC value into a display percent.
///
/// Values below 99 are already percentages and are rendered to one decimal.
/// Values at or above 99 are total milligrams per package and are divided by
/// (unit size × 10). Absent/zero input — or a ≥ 99 value with no usable unit
/// size to divide by — yields [`THC_NA`].
#[must_use]
pub fn parse_thc_api(raw: Option<&RawPotency>, size: Option<f64>) -> String {
    let Some(raw) = raw.filter(|r| !r.is_blank()) else {
        return THC_NA.to_string();
    };
    let Some(value) = raw.as_number() else {
        return THC_NA.to_string();
    };

    if value < 99.0 {
        return format!("{value:.1}%");
    }

    match size.filter(|s| s.is_finite() && *s > 0.0) {
        Some(size) => format!("{:.1}%", value / (size * 10.0)),
        None => THC_NA.to_string(),
    }
}

/// Parses a CBD value.
///
/// - The literal `"<LOQ"` (below limit of quantification) maps to the number
///   `0`.
/// - Other text is stripped to `[0-9.-]`; a `value-0` range keeps only the
///   leading value.
/// - The API variant renders two decimals (`"5.00%"`); the scrape variant
///   renders the bare number (`"5%"`). The divergence is intentional — the
///   two ingestion sources feed different display formats.
/// - Non-text input and unparseable text yield `None`.
#[must_use]
pub fn parse_cbd(raw: Option<&RawPotency>, origin: Origin) -> Option<CbdPercent> {
    let RawPotency::Text(text) = raw? else {
        return None;
    };

    if text == "<LOQ" {
        return Some(CbdPercent::Number(0.0));
    }

    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let value = if cleaned.contains("-0") {
        leading_float(cleaned.split('-').next().unwrap_or(""))?
    } else {
        leading_float(&cleaned)?
    };

    Some(CbdPercent::Text(match origin {
        Origin::Api => format!("{value:.2}%"),
        Origin::Scrape => format!("{value}%"),
    }))
}

/// Parses free-text price into dollars: strips everything but digits and
/// dots, then parses. `None` means the record is unusable and will be
/// dropped by validation.
#[must_use]
pub fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    leading_float(&cleaned)
}

/// Cleans a vendor name into a display name: strips the leading bracketed
/// price annotation, erases every known catalog token at a word boundary,
/// and collapses whitespace. Idempotent.
#[must_use]
pub fn clean_name(name: &str) -> String {
    // The annotation usually ends at a dash ("[$6] Hellavated - ..."); when
    // no dash follows, only the bracket group itself is dropped.
    let without_annotation = if PRICE_DASH_PATTERN.is_match(name) {
        PRICE_DASH_PATTERN.replace(name, "")
    } else {
        PRICE_BRACKET_PATTERN.replace(name, "")
    };

    patterns::strip_known_tokens(without_annotation.trim())
}

/// Extracts a pack-size token: any integer before a literal `pk` suffix.
/// Returns the matched text (`"2pk"`) or `None`.
#[must_use]
pub fn match_pack_size(name: &str) -> Option<String> {
    PACK_PATTERN.find(name).map(|m| m.as_str().to_string())
}

/// Extracts a unit-size token: a decimal or integer immediately before a
/// literal `g` at a word boundary, not preceded by another digit. Leading-dot
/// decimals are zero-prefixed (`".5g"` → `"0.5g"`).
///
/// Implemented as a byte scan because the "not preceded by a digit" guard is
/// a lookbehind the `regex` crate does not support.
#[must_use]
pub fn match_unit_size(name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    let bytes = lower.as_bytes();
    let len = bytes.len();
    let mut i = 0usize;

    while i < len {
        let starts_number = bytes[i].is_ascii_digit()
            || (bytes[i] == b'.' && i + 1 < len && bytes[i + 1].is_ascii_digit());
        if !starts_number {
            i += 1;
            continue;
        }

        let num_start = i;
        let mut has_dot = false;
        while i < len && (bytes[i].is_ascii_digit() || (bytes[i] == b'.' && !has_dot)) {
            if bytes[i] == b'.' {
                has_dot = true;
            }
            i += 1;
        }

        // A digit immediately before the run only happens on the dot-start
        // case ("1.2.5g" scanning ".5" after "1.2"). Resume right after the
        // dot so the digits themselves still get a chance to match.
        if num_start > 0 && bytes[num_start - 1].is_ascii_digit() {
            i = num_start + 1;
            continue;
        }

        let followed_by_g = bytes.get(i) == Some(&b'g');
        let boundary_after_g = match bytes.get(i + 1) {
            None => true,
            Some(b) => !b.is_ascii_alphanumeric() && *b != b'_',
        };
        if followed_by_g && boundary_after_g {
            let mut size = lower[num_start..i].to_string();
            if size.starts_with('.') {
                size.insert(0, '0');
            }
            return Some(format!("{size}g"));
        }
    }

    None
}

/// First run of ASCII digits in `text`, parsed as an integer.
fn first_integer(text: &str) -> Option<u64> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
