//! Static catalogs of known quantity/size/product-type tokens and the
//! compiled patterns built from them.
//!
//! The catalogs are configuration, not logic: adding a token changes what
//! gets stripped or classified, never the shape of the pipeline. Matching is
//! case-insensitive, tokens are regex-escaped before compilation, and the
//! strip pattern only fires at word boundaries so `"2pk"` inside
//! `"Party2pkg"` survives.

use std::sync::LazyLock;

use regex::Regex;

/// Pack-quantity tokens as they appear in vendor names.
pub const QUANTITY_TOKENS: &[&str] = &["2pk", "5pk", "6pk", "8pk", "10pk", "20pk"];

/// Literal unit-size strings seen in this vendor's data. Leading-dot forms
/// are listed because names carry them verbatim (`".5g"`).
pub const SIZE_TOKENS: &[&str] = &[
    "2.51g", "2.5g", "1.5g", "0.5g", ".53g", ".5g", ".78g", ".75g", "1g", "2g",
];

/// Cartridge / disposable phrasing variants.
pub const CART_TOKENS: &[&str] = &["all in one", "all in 1", "dispo", "disposable"];

/// Product-format tokens. Ordered: earlier entries win when two tokens could
/// match at the same position (e.g. `"live resin"` before `"rosin"`).
pub const PRODUCT_TOKENS: &[&str] = &[
    "cart",
    "cartridge",
    "blend",
    "infused",
    "preroll",
    "prerolls",
    "blunt",
    "kief",
    "shatter",
    "badder",
    "batter",
    "crumble",
    "bubble hash",
    "moonrock",
    "moon rock",
    "cured hash",
    "rso",
    "elro",
    "elro/rso",
    "sugar wax",
    "live rosin/cured resin",
    "live resin",
    "cured resin",
    "temple ball",
    "wax",
    "live rosin",
    "rosin",
    "diamonds & sauce",
    "diamonds",
    "slim",
    "HTE",
    "liquid diamond",
    "distillate",
    "flavored",
    "live terpene",
    "rosin/cured resin",
    "cloud bar",
    "feco/rso",
    "moon rocks",
    "cold cured live hash",
    "lr/distillate",
];

/// Extract/concentrate tokens checked first during type detection.
pub const PRIMARY_TYPE_TOKENS: &[&str] = &[
    "cured resin",
    "badder",
    "batter",
    "crumble",
    "bubble hash",
    "moonrock",
    "moon rock",
    "cured hash",
    "sugar wax",
    "rosin/cured resin",
    "live resin",
    "temple ball",
    "wax",
    "rosin",
    "diamonds & sauce",
    "diamonds",
    "HTE",
    "liquid diamond",
    "distillate",
    "flavored",
    "cloud bar",
    "moon rocks",
    "cold cured live hash",
    "lit stick",
    "lcr",
    "llr",
    "brush applicator",
];

/// Generic format tokens checked only when no primary token matches.
pub const SECONDARY_TYPE_TOKENS: &[&str] = &[
    "cart",
    "cartridge",
    "disposable",
    "preroll",
    "prerolls",
    "blunt",
    "blend",
    "infused",
    "kief",
    "shatter",
    "slim",
    "feco/rso",
    "rso",
    "elro",
    "elro/rso",
    "live terpene",
];

fn alternation(tokens: impl IntoIterator<Item = &'static str>) -> String {
    tokens
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

/// All catalogs combined into one word-boundary-anchored strip pattern.
/// A match consumes the adjacent whitespace, so stripping replaces the match
/// with a single space and the caller collapses whitespace afterwards.
static STRIP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let tokens = alternation(
        QUANTITY_TOKENS
            .iter()
            .chain(SIZE_TOKENS)
            .chain(CART_TOKENS)
            .chain(PRODUCT_TOKENS)
            .copied(),
    );
    Regex::new(&format!(r"(?i)(?:^|\s)(?:{tokens})(?:\s|$)")).expect("valid strip pattern")
});

static PRIMARY_TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "(?i)({})",
        alternation(PRIMARY_TYPE_TOKENS.iter().copied())
    ))
    .expect("valid primary type pattern")
});

static SECONDARY_TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        "(?i)({})",
        alternation(SECONDARY_TYPE_TOKENS.iter().copied())
    ))
    .expect("valid secondary type pattern")
});

/// Erases every catalog token appearing at a word boundary and collapses the
/// remaining whitespace. Idempotent.
///
/// The replacement loop runs to a fixpoint because a single pass cannot see
/// tokens whose leading boundary was consumed by the previous match
/// (`"Gummy 2pk 0.5g"` needs two passes).
#[must_use]
pub fn strip_known_tokens(name: &str) -> String {
    let mut current = name.to_string();
    while STRIP_PATTERN.is_match(&current) {
        current = STRIP_PATTERN.replace_all(&current, " ").into_owned();
    }
    current.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classifies a product name against the two-tier token catalogs: primary
/// concentrate tokens first, then the generic secondary tokens. Returns the
/// matched token (lowercased) or `None`.
#[must_use]
pub fn detect_product_type(name: &str) -> Option<String> {
    let lower = name.to_lowercase();
    PRIMARY_TYPE_PATTERN
        .find(&lower)
        .or_else(|| SECONDARY_TYPE_PATTERN.find(&lower))
        .map(|m| m.as_str().to_string())
}
