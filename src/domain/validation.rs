//! Field validation: normalization, fuzzy scoring against expected values
//! and approved variants, and the pass/fail decision policy.

use crate::processors::{sequence_ratio, FieldKind};
use std::fmt;

/// Minimum similarity score for a PASS, boundary inclusive.
pub const PASS_THRESHOLD: f64 = 0.93;

/// The immutable verdict for one field of one label.
#[derive(Debug, Clone)]
pub struct FieldVerdict {
    /// Display name of the field, e.g. `Capacity`.
    pub field: String,
    /// Whether the reading passed.
    pub valid: bool,
    /// The reading before normalization.
    pub raw: String,
    /// The reading after normalization.
    pub normalized: String,
    /// The expected value from the catalog, as specified (unnormalized).
    pub expected: String,
    /// The winning similarity score in [0, 1].
    pub score: f64,
    /// The normalized variant that carried the PASS, when variant-driven.
    pub matched_variant: Option<String>,
}

impl fmt::Display for FieldVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "OCR_Pre='{}' | OCR_Pos='{}' | Expected='{}' | Score={:.3} | {}",
            self.raw,
            self.normalized,
            self.expected,
            self.score,
            if self.valid { "PASS" } else { "FAIL" },
        )?;
        if let Some(variant) = &self.matched_variant {
            write!(f, " (VARIANT: {variant})")?;
        }
        Ok(())
    }
}

/// Validates a raw reading against the expected value and the approved
/// variant set for the field.
///
/// The reading, the expected value, and every variant are normalized with
/// the field kind's rule; candidates are scored with [`sequence_ratio`] and
/// the maximum wins, earliest candidate first on ties (so an expected value
/// beats an equally-scoring variant).
///
/// Decision policy, two tiers:
///
/// 1. When an expected value is defined, PASS requires the best candidate to
///    be the normalized expected value with score at or above the threshold.
/// 2. Even when tier 1 fails, including when no expected value exists, a
///    variant that is the best candidate at or above the threshold rescues
///    the field, and the verdict records it as `matched_variant`.
///
/// An approved deviation can therefore override a stale or absent catalog
/// value without a catalog edit.
pub fn validate_field(
    kind: FieldKind,
    field: impl Into<String>,
    raw: &str,
    expected: &str,
    variants: &[String],
    threshold: f64,
) -> FieldVerdict {
    let normalized = kind.normalize(raw);
    let expected_norm = kind.normalize(expected);

    // Candidate list: normalized expected first (when non-empty), then the
    // normalized variants with their provenance.
    let mut candidates: Vec<(String, bool)> = Vec::with_capacity(1 + variants.len());
    if !expected_norm.is_empty() {
        candidates.push((expected_norm, false));
    }
    candidates.extend(variants.iter().map(|v| (kind.normalize(v), true)));

    let mut score = 0.0_f64;
    let mut best: Option<&(String, bool)> = None;
    for candidate in &candidates {
        let s = sequence_ratio(&normalized, &candidate.0);
        if s > score {
            score = s;
            best = Some(candidate);
        }
    }

    // Tier 1: a defined expected value must itself win.
    let expected_defined = !expected.is_empty();
    let mut valid = expected_defined
        && score >= threshold
        && matches!(best, Some((_, is_variant)) if !is_variant);

    // Tier 2: a best-matching variant at the bar rescues the field.
    let mut matched_variant = None;
    if !valid && score >= threshold {
        if let Some((text, true)) = best {
            valid = true;
            matched_variant = Some(text.clone());
        }
    }

    FieldVerdict {
        field: field.into(),
        valid,
        raw: raw.to_string(),
        normalized,
        expected: expected.to_string(),
        score,
        matched_variant,
    }
}
