//! Metrics aggregation and the per-image text report.

use crate::domain::LabelOutcome;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Aggregated pass/fail metrics for one inspected image.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    image_id: String,
    client: String,
    lines: Vec<LabelBlock>,
    total_labels: usize,
    total_fails: usize,
    fields_per_label: usize,
}

#[derive(Debug, Clone)]
struct LabelBlock {
    number: String,
    fields: Vec<(String, String)>,
}

impl MetricsReport {
    /// Builds the report from reading-order label outcomes.
    pub fn from_outcomes(
        image_id: impl Into<String>,
        client: Option<&str>,
        outcomes: &[LabelOutcome],
    ) -> Self {
        let mut lines = Vec::with_capacity(outcomes.len());
        let mut total_fails = 0;
        let mut fields_per_label = 0;

        for outcome in outcomes {
            let fields = outcome
                .fields
                .iter()
                .map(|v| (v.field.clone(), v.to_string()))
                .collect::<Vec<_>>();
            total_fails += outcome.failing_fields().count();
            fields_per_label = fields_per_label.max(outcome.fields.len());
            lines.push(LabelBlock {
                number: format!("{:02}", outcome.index + 1),
                fields,
            });
        }

        Self {
            image_id: image_id.into(),
            client: client.unwrap_or("N/A").to_string(),
            lines,
            total_labels: outcomes.len(),
            total_fails,
            fields_per_label,
        }
    }

    /// Total labels inspected.
    pub fn total_labels(&self) -> usize {
        self.total_labels
    }

    /// Total failing fields across all labels.
    pub fn total_fails(&self) -> usize {
        self.total_fails
    }

    /// Failing fields as a percentage of (labels × fields per label), or
    /// `None` when there is nothing to rate.
    pub fn fail_rate(&self) -> Option<f64> {
        let denominator = (self.total_labels * self.fields_per_label) as f64;
        (denominator > 0.0).then(|| 100.0 * self.total_fails as f64 / denominator)
    }

    /// Renders the report text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "==== {} ====", self.image_id);
        let _ = writeln!(out, "Client: {}", self.client);
        for block in &self.lines {
            let _ = writeln!(out, "Label #{}:", block.number);
            for (field, line) in &block.fields {
                let _ = writeln!(out, "  {field}: {line}");
            }
        }
        match self.fail_rate() {
            Some(rate) => {
                let _ = writeln!(
                    out,
                    "Summary: Total Labels: {} | Total fails: {} | Fail rate: {:.1}%",
                    self.total_labels, self.total_fails, rate
                );
            }
            None => {
                let _ = writeln!(out, "Summary: No labels detected.");
            }
        }
        out
    }

    /// Writes the rendered report to `path`.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        debug!(path = %path.display(), "writing metrics report");
        fs::write(path, self.render())
    }
}
