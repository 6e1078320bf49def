//! The label inspection pipeline.
//!
//! [`Inspector`] orchestrates one image end to end: label detection, reading
//! order, a bounded worker pool of per-label tasks, annotated-image
//! composition, and metrics reporting.

pub mod config;
pub mod inspector;
pub mod label;
pub mod progress;
pub mod report;

pub use config::InspectorConfig;
pub use inspector::{Inspection, Inspector, InspectorBuilder};
pub use progress::{CancelToken, ProgressSink};
pub use report::MetricsReport;
