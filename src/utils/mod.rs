//! Utility functions for image handling and annotation drawing.

pub mod image;
pub mod visualization;

pub use image::{crop_box, load_image, rotate_cw};
pub use visualization::{draw_label_marker, MarkerStyle};
