//! Field-type-specific text normalization.
//!
//! Recognized readings, catalog expected values, and stored variants are all
//! passed through the same rule for a field before comparison, so scoring is
//! always apples-to-apples. Every rule is pure, total (empty input yields an
//! empty string), and deterministic.

use once_cell::sync::Lazy;
use regex::Regex;

/// Two "<digits>GB" tokens joined by OCR-confusable separator glyphs.
static CAPACITY_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\dGB)[\sIl1/\\]+(\d+GB)").unwrap());

/// A final "<digits>GB" token followed by one ambiguous superscript mark.
static CAPACITY_SUPERSCRIPT: Lazy<Regex> =
    Lazy::new(|| Regex::new("(\\dGB)[1'\"`’”]$").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// The kinds of label fields with bespoke normalization rules.
///
/// Unknown field names fall back to [`FieldKind::Generic`], which leaves the
/// text untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Storage capacity, e.g. `128GB | 256GB¹`.
    Capacity,
    /// Model code, e.g. `SM-A266M/DS`.
    BasicModel,
    /// EAN barcode payload, digits only.
    Ean,
    /// Color name, letters only.
    Color,
    /// Any other field; compared verbatim.
    Generic,
}

impl FieldKind {
    /// Resolves the kind from a canonical field name (case-insensitive).
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_uppercase().as_str() {
            "CAPACITY" => Self::Capacity,
            "BASIC MODEL" => Self::BasicModel,
            "EAN" => Self::Ean,
            "COLOR" => Self::Color,
            _ => Self::Generic,
        }
    }

    /// Applies this kind's normalization rule.
    pub fn normalize(&self, text: &str) -> String {
        match self {
            Self::Capacity => normalize_capacity(text),
            Self::BasicModel => normalize_basic_model(text),
            Self::Ean => normalize_ean(text),
            Self::Color => normalize_color(text),
            Self::Generic => text.to_string(),
        }
    }
}

/// Capacity: rewrite confused separators to `" | "` and a trailing
/// ambiguous mark after the last "<digits>GB" token to `¹`.
fn normalize_capacity(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let t = CAPACITY_SEPARATOR.replace_all(&collapsed, "${1} | ${2}");
    let t = t.replace('|', " | ");
    let t = WHITESPACE.replace_all(&t, " ");
    let t = t.trim();
    CAPACITY_SUPERSCRIPT.replace(t, "${1}¹").into_owned()
}

/// Basic model: strip whitespace, map `I`/`l` misreads to `/`, and force
/// the slash after the 7-character prefix when the code lacks one.
fn normalize_basic_model(text: &str) -> String {
    let mut t: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == 'I' || c == 'l' { '/' } else { c })
        .collect();
    if !t.contains('/') && t.chars().count() > 7 {
        let split = t.char_indices().nth(7).map(|(i, _)| i).unwrap_or(t.len());
        t.insert(split, '/');
    }
    t
}

/// EAN: digits only.
fn normalize_ean(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Color: Latin letters (accents included) only, uppercased.
fn normalize_color(text: &str) -> String {
    text.chars()
        .filter(|c| matches!(c, 'A'..='Z' | 'a'..='z' | 'À'..='ÿ'))
        .collect::<String>()
        .to_uppercase()
}
