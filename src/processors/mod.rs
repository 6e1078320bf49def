//! Pure processing primitives: geometry, layout ordering, text
//! normalization, and similarity scoring.
//!
//! Everything in this module is deterministic and free of I/O, which is what
//! lets the validation engine run unsynchronized inside concurrent label
//! tasks.

pub mod geometry;
pub mod layout;
pub mod normalize;
pub mod scoring;

pub use geometry::BoundingBox;
pub use layout::{reading_order, DEFAULT_ROW_THRESHOLD};
pub use normalize::FieldKind;
pub use scoring::sequence_ratio;
