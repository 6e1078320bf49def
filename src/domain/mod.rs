//! Domain types for label inspection: field specifications, label regions
//! and outcomes, and the field validation engine.

pub mod label;
pub mod spec;
pub mod validation;

pub use label::{LabelMarker, LabelOutcome, LabelRegion};
pub use spec::{canonical_field_name, FieldSpec};
pub use validation::{validate_field, FieldVerdict, PASS_THRESHOLD};
