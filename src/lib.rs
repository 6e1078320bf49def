//! # labelscan
//!
//! A label inspection library: given a photograph containing printed
//! product labels and the expected field values for a product code, locate
//! each label, read its fields, verify every field against the expectation
//! and a set of previously approved variants, and report pass/fail per
//! field with a similarity score.
//!
//! ## Components
//!
//! - **Reading order**: detected label boxes are sorted into a
//!   deterministic top-to-bottom, left-to-right sequence so numbering is
//!   stable across runs.
//! - **Field validation**: field-type-specific normalization, fuzzy
//!   scoring against the expected value and approved variants, and a
//!   two-tier pass policy that lets an approved deviation override a stale
//!   catalog value.
//! - **Variant store**: an append-only JSON knowledge base of approved
//!   readings, grown through a reviewer workflow.
//! - **Pipeline**: a bounded worker pool processing labels concurrently,
//!   composing an annotated image and a per-image metrics report.
//!
//! Detection models, text recognition, barcode decoding, and the
//! specification catalog are injected through the traits in
//! [`core::traits`]; the library never holds ambient model state.
//!
//! ## Modules
//!
//! * [`core`] - Error types and the injected capability traits
//! * [`domain`] - Field specifications, label outcomes, and validation
//! * [`pipeline`] - The inspection pipeline, progress, and reporting
//! * [`processors`] - Geometry, layout ordering, normalization, scoring
//! * [`store`] - The persistent variant store
//! * [`utils`] - Image helpers and annotation drawing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use labelscan::prelude::*;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn capabilities() -> (Arc<dyn labelscan::core::RegionDetector>, Arc<dyn labelscan::core::RegionDetector>, Arc<dyn labelscan::core::TextRecognizer>, Arc<dyn labelscan::core::BarcodeDecoder>, Arc<dyn labelscan::core::SpecCatalog>) { unimplemented!() }
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (labels, fields, recognizer, barcode, catalog) = capabilities();
//!
//! let inspector = Inspector::builder()
//!     .label_detector(labels)
//!     .field_detector(fields)
//!     .recognizer(recognizer)
//!     .barcode_decoder(barcode)
//!     .catalog(catalog)
//!     .variants(Arc::new(VariantStore::open("variants.json")?))
//!     .config(InspectorConfig::default())
//!     .build()?;
//!
//! let cancel = CancelToken::new();
//! let inspection = inspector.inspect_path(
//!     Path::new("shot.jpg"),
//!     "SM-A266M",
//!     Some("10.0.0.7"),
//!     &cancel,
//! )?;
//! println!("{}", inspection.report.render());
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod store;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use labelscan::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{InspectError, InspectResult};
    pub use crate::domain::{FieldSpec, FieldVerdict, LabelOutcome};
    pub use crate::pipeline::{
        CancelToken, Inspection, Inspector, InspectorConfig, MetricsReport, ProgressSink,
    };
    pub use crate::store::VariantStore;
}
