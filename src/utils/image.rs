//! Image loading, cropping, and orientation helpers.

use crate::core::InspectResult;
use crate::processors::BoundingBox;
use image::{imageops, RgbImage};
use std::path::Path;

/// Loads an image from disk and converts it to 8-bit RGB.
pub fn load_image(path: &Path) -> InspectResult<RgbImage> {
    let img = image::open(path)?;
    Ok(img.to_rgb8())
}

/// Crops the region covered by `bbox`, clamped to the image bounds.
///
/// Returns `None` when nothing of the box lies inside the image.
pub fn crop_box(img: &RgbImage, bbox: &BoundingBox) -> Option<RgbImage> {
    let clamped = bbox.clamp_to(img.width(), img.height())?;
    Some(
        imageops::crop_imm(img, clamped.x1, clamped.y1, clamped.width(), clamped.height())
            .to_image(),
    )
}

/// Rotates 90° clockwise, so labels printed sideways present upright text
/// to the recognizer.
pub fn rotate_cw(img: &RgbImage) -> RgbImage {
    imageops::rotate90(img)
}
