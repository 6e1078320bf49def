//! Pipeline configuration.

use crate::domain::PASS_THRESHOLD;
use crate::processors::DEFAULT_ROW_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the [`Inspector`](crate::pipeline::Inspector).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectorConfig {
    /// Upper bound on concurrent label tasks. The effective pool size is
    /// capped at the number of detected labels.
    pub max_workers: usize,
    /// Vertical-center proximity (pixels) grouping label boxes into rows.
    pub row_threshold: u32,
    /// Minimum similarity score for a field PASS, boundary inclusive.
    pub pass_threshold: f64,
    /// Mean field score above which a label is marked as a confident pass.
    pub confident_mean: f64,
    /// When set, per-image artifacts (annotated image, metrics report,
    /// failing crops) are written under `<output_root>/<image id>/`.
    pub output_root: Option<PathBuf>,
    /// Whether crops of failing labels are persisted for manual review.
    pub save_failed_crops: bool,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            row_threshold: DEFAULT_ROW_THRESHOLD,
            pass_threshold: PASS_THRESHOLD,
            confident_mean: 0.95,
            output_root: None,
            save_failed_crops: false,
        }
    }
}
