//! Reading-order sorting for detected label boxes.
//!
//! Detected boxes arrive in arbitrary order; label numbering must be stable
//! and reproducible for audit and manual review, so ordering is a pure
//! function of the box geometry: top to bottom, left to right.

use crate::processors::BoundingBox;

/// Default vertical-center proximity (in pixels) under which two boxes are
/// considered part of the same row.
pub const DEFAULT_ROW_THRESHOLD: u32 = 30;

/// Sorts boxes into reading order and returns the permutation of input
/// indices.
///
/// Boxes are grouped into rows during a single top-to-bottom scan of their
/// vertical centers: a gap strictly greater than `row_threshold` between
/// consecutive sorted centers starts a new row, while a gap exactly at the
/// threshold extends the current one. Within a row, boxes are ordered by
/// horizontal center; rows are concatenated in scan order.
///
/// The output is always a permutation of `0..boxes.len()`; empty input
/// yields an empty permutation.
pub fn reading_order(boxes: &[BoundingBox], row_threshold: u32) -> Vec<usize> {
    if boxes.is_empty() {
        return Vec::new();
    }

    let mut by_center: Vec<(usize, u32, u32)> = boxes
        .iter()
        .enumerate()
        .map(|(i, b)| (i, b.center_x(), b.center_y()))
        .collect();
    by_center.sort_by_key(|&(_, cx, cy)| (cy, cx));

    // Single scan over sorted centers; each row closes when the vertical gap
    // to the previous center exceeds the threshold.
    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut current: Vec<usize> = Vec::new();
    let mut last_cy: Option<u32> = None;
    for &(i, _, cy) in &by_center {
        if let Some(prev) = last_cy {
            if cy.abs_diff(prev) > row_threshold {
                rows.push(std::mem::take(&mut current));
            }
        }
        current.push(i);
        last_cy = Some(cy);
    }
    if !current.is_empty() {
        rows.push(current);
    }

    let mut order = Vec::with_capacity(boxes.len());
    for row in &mut rows {
        row.sort_by_key(|&i| boxes[i].center_x());
        order.extend(row.iter().copied());
    }
    order
}
