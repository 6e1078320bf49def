//! Core building blocks: error types and the injected capability traits.

pub mod errors;
pub mod traits;

pub use errors::{InspectError, InspectResult};
pub use traits::{BarcodeDecoder, Detection, RegionDetector, SpecCatalog, TextRecognizer};
