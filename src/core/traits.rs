//! Capability traits for the external collaborators of the pipeline.
//!
//! Detection models, text recognition, barcode decoding, and the
//! specification catalog are not implemented here. They are injected into
//! the [`Inspector`](crate::pipeline::Inspector) at construction time and
//! specified only at this boundary.
//!
//! Every capability is constructed once, before the worker pool exists, and
//! shared read-only across concurrent label tasks. Implementations MUST be
//! safe for concurrent read-only use; that requirement is carried by the
//! `Send + Sync` bounds and is part of the contract, not an assumption.

use crate::core::errors::InspectResult;
use crate::processors::BoundingBox;
use image::RgbImage;

/// One detection returned by a [`RegionDetector`] pass.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Detected region in the coordinates of the image that was passed in.
    pub bbox: BoundingBox,
    /// Model class index; resolved to a name via [`RegionDetector::class_name`].
    pub class_id: usize,
    /// Model confidence in [0, 1].
    pub confidence: f32,
}

/// An object detector returning class-labelled bounding boxes.
///
/// Used twice with differently trained capability sets: once for label
/// regions on the full image, once for field regions on an oriented label
/// crop.
pub trait RegionDetector: Send + Sync {
    /// Detect regions on the given image.
    fn detect(&self, image: &RgbImage) -> InspectResult<Vec<Detection>>;

    /// Resolve a class index to its raw class label, if known.
    fn class_name(&self, class_id: usize) -> Option<&str>;
}

/// A text recognition engine.
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in an image crop. Returns an empty string when no
    /// text is found; channel ordering is the caller's responsibility.
    fn recognize(&self, crop: &RgbImage) -> InspectResult<String>;
}

/// A barcode decoding engine.
pub trait BarcodeDecoder: Send + Sync {
    /// Decode a barcode from an image crop, returning the digits-only
    /// payload, or an empty string when nothing decodes.
    fn decode(&self, crop: &RgbImage) -> InspectResult<String>;
}

/// Lookup of expected field values for a product code.
///
/// Absence of the code is a reportable error, never a silently empty
/// specification.
pub trait SpecCatalog: Send + Sync {
    /// Resolve the field specification for a product code.
    fn lookup(&self, product_code: &str) -> InspectResult<crate::domain::FieldSpec>;
}
