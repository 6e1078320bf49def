//! Label regions, outcome markers, and per-label results.

use crate::domain::FieldVerdict;
use crate::processors::BoundingBox;
use image::{Rgb, RgbImage};

/// A detected label with its assigned reading-order index.
///
/// Created once per detected label per image and never mutated afterwards;
/// the index is what reports and annotations refer to.
#[derive(Debug, Clone, Copy)]
pub struct LabelRegion {
    /// 0-based reading-order index.
    pub index: usize,
    /// Region in source-image coordinates.
    pub bbox: BoundingBox,
}

impl LabelRegion {
    /// 1-based label number as drawn and reported, zero-padded.
    pub fn number(&self) -> String {
        format!("{:02}", self.index + 1)
    }
}

/// Visual marker for a processed label. Drives annotation color only; the
/// field-level verdicts are authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMarker {
    /// Not yet classified, or mixed results without failures.
    Neutral,
    /// Mean field similarity above the confident threshold.
    ConfidentPass,
    /// At least one field failed validation.
    Attention,
}

impl LabelMarker {
    /// Classifies the marker from the label's verdicts.
    ///
    /// A confident mean wins over the attention check, matching the
    /// annotation behavior the reviewers are calibrated to.
    pub fn classify(verdicts: &[FieldVerdict], confident_mean: f64) -> Self {
        if !verdicts.is_empty() {
            let mean = verdicts.iter().map(|v| v.score).sum::<f64>() / verdicts.len() as f64;
            if mean > confident_mean {
                return Self::ConfidentPass;
            }
        }
        if verdicts.iter().any(|v| !v.valid) {
            Self::Attention
        } else {
            Self::Neutral
        }
    }

    /// Annotation color for this marker.
    pub fn color(&self) -> Rgb<u8> {
        match self {
            Self::Neutral => Rgb([0, 0, 255]),
            Self::ConfidentPass => Rgb([0, 255, 0]),
            Self::Attention => Rgb([255, 0, 0]),
        }
    }
}

/// Everything produced for one label region.
///
/// Consumed by the pipeline for aggregation and annotation, and by the
/// reviewer workflow when a failing crop is queued for manual approval.
#[derive(Debug, Clone)]
pub struct LabelOutcome {
    /// Reading-order index of the label.
    pub index: usize,
    /// The oriented label crop that fields were read from.
    pub crop: RgbImage,
    /// One verdict per validated field, in detection order.
    pub fields: Vec<FieldVerdict>,
    /// Visual classification of the label.
    pub marker: LabelMarker,
}

impl LabelOutcome {
    /// Whether any field failed validation.
    pub fn has_failures(&self) -> bool {
        self.fields.iter().any(|v| !v.valid)
    }

    /// The verdicts that failed.
    pub fn failing_fields(&self) -> impl Iterator<Item = &FieldVerdict> {
        self.fields.iter().filter(|v| !v.valid)
    }
}
