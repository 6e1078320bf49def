//! Annotation drawing for inspected labels.
//!
//! Each processed label gets a hollow rectangle and its reading-order
//! number drawn into the shared annotated image, colored by the label's
//! marker. Index text needs a font; when none is available the rectangle
//! is still drawn and the number is skipped.

use crate::domain::LabelRegion;
use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::Path;
use tracing::debug;

/// Styling for label markers.
pub struct MarkerStyle {
    /// Font for the index number. If `None`, number rendering is skipped.
    pub font: Option<FontVec>,
    /// Pixel scale of the index number.
    pub font_scale: f32,
    /// Rectangle line thickness.
    pub thickness: i32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            font: None,
            font_scale: 28.0,
            thickness: 2,
        }
    }
}

impl MarkerStyle {
    /// Loads a font from the given path.
    pub fn with_font_path(font_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let font_data = std::fs::read(font_path)?;
        let font = FontVec::try_from_vec(font_data)
            .map_err(|_| format!("Failed to parse font file: {}", font_path.display()))?;
        Ok(Self {
            font: Some(font),
            ..Self::default()
        })
    }

    /// Attempts to load a system font from common locations, falling back
    /// to the numberless default style when none is found.
    pub fn with_system_font() -> Self {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
            "C:\\Windows\\Fonts\\arial.ttf",
        ];
        for path in font_paths {
            if let Ok(style) = Self::with_font_path(Path::new(path)) {
                debug!(path, "loaded system font for label markers");
                return style;
            }
        }
        debug!("no system font found, label numbers will be skipped");
        Self::default()
    }
}

/// Draws one label's marker: a hollow rectangle around its region plus the
/// 1-based label number near the bottom-left corner.
///
/// Concurrent label tasks draw into disjoint regions by construction, but
/// the shared buffer itself must be locked by the caller.
pub fn draw_label_marker(
    canvas: &mut RgbImage,
    region: &LabelRegion,
    color: Rgb<u8>,
    style: &MarkerStyle,
) {
    let bbox = &region.bbox;
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);

    for inset in 0..style.thickness {
        let left = bbox.x1 as i32 + inset;
        let top = bbox.y1 as i32 + inset;
        let w = bbox.width() as i32 - 2 * inset;
        let h = bbox.height() as i32 - 2 * inset;
        if w <= 0 || h <= 0 || left + w > width || top + h > height {
            break;
        }
        let rect = Rect::at(left, top).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(canvas, rect, color);
    }

    if let Some(font) = &style.font {
        let x = bbox.x1 as i32 + 5;
        let y = bbox.y2 as i32 - 5 - style.font_scale as i32;
        if x < width && y >= 0 {
            draw_text_mut(
                canvas,
                color,
                x,
                y,
                PxScale::from(style.font_scale),
                font,
                &region.number(),
            );
        }
    }
}
