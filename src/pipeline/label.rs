//! Per-label processing: cropping, field detection, reading, validation,
//! and annotation.

use crate::core::{
    BarcodeDecoder, InspectError, InspectResult, RegionDetector, TextRecognizer,
};
use crate::domain::{
    canonical_field_name, validate_field, FieldSpec, LabelMarker, LabelOutcome, LabelRegion,
};
use crate::pipeline::{InspectorConfig, ProgressSink};
use crate::processors::FieldKind;
use crate::store::VariantStore;
use crate::utils::{crop_box, draw_label_marker, rotate_cw, MarkerStyle};
use image::{Rgb, RgbImage};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Processes one label region against the active specification.
///
/// One instance is shared read-only by all label tasks of an image run; the
/// only shared mutable state is the annotated buffer behind its mutex.
pub(crate) struct LabelProcessor<'a> {
    pub field_detector: &'a dyn RegionDetector,
    pub recognizer: &'a dyn TextRecognizer,
    pub barcode: &'a dyn BarcodeDecoder,
    pub spec: &'a FieldSpec,
    pub variants: &'a VariantStore,
    pub config: &'a InspectorConfig,
    pub annotated: &'a Mutex<RgbImage>,
    pub style: &'a MarkerStyle,
    pub sink: &'a dyn ProgressSink,
}

impl LabelProcessor<'_> {
    /// Runs the full per-label flow and returns the outcome.
    ///
    /// Field-level capability failures degrade to empty readings and FAIL
    /// verdicts; an error returned here means the whole label could not be
    /// processed and its outcome is omitted by the caller.
    pub fn process(&self, source: &RgbImage, region: &LabelRegion) -> InspectResult<LabelOutcome> {
        let crop = crop_box(source, &region.bbox).ok_or_else(|| {
            InspectError::invalid_input(format!(
                "label {} box lies outside the image bounds",
                region.number()
            ))
        })?;
        // Labels are printed sideways relative to the photograph; the field
        // detector and recognizer were characterized against upright crops.
        let oriented = rotate_cw(&crop);

        self.draw(region, LabelMarker::Neutral.color());

        let detections = self.field_detector.detect(&oriented)?;
        debug!(
            label = %region.number(),
            detections = detections.len(),
            "field detection complete"
        );

        let mut verdicts = Vec::new();
        for detection in &detections {
            let Some(raw_name) = self.field_detector.class_name(detection.class_id) else {
                debug!(class_id = detection.class_id, "unnamed field class, skipping");
                continue;
            };
            let canonical = canonical_field_name(raw_name);
            if !self.spec.contains(&canonical) {
                debug!(field = %canonical, "field not in specification, skipping");
                continue;
            }

            let kind = FieldKind::from_name(&canonical);
            let reading = self.read_field(kind, crop_box(&oriented, &detection.bbox));
            let expected = self.spec.expected_for(&canonical).unwrap_or("");
            let variants = self
                .variants
                .variants_for(self.spec.product_code(), &canonical);
            let verdict = validate_field(
                kind,
                display_name(kind, &canonical),
                &reading,
                expected,
                &variants,
                self.config.pass_threshold,
            );
            debug!(
                label = %region.number(),
                field = %verdict.field,
                score = verdict.score,
                valid = verdict.valid,
                "field validated"
            );
            verdicts.push(verdict);
        }

        let marker = LabelMarker::classify(&verdicts, self.config.confident_mean);
        self.draw(region, marker.color());

        Ok(LabelOutcome {
            index: region.index,
            crop: oriented,
            fields: verdicts,
            marker,
        })
    }

    /// Obtains the raw reading for one detected field crop.
    ///
    /// EAN prefers the barcode decoder and only falls back to text
    /// recognition when nothing decodes. Other kinds recognize text and
    /// apply the kind's fixup, so the validator sees the same normalized
    /// form the comparison side gets.
    fn read_field(&self, kind: FieldKind, crop: Option<RgbImage>) -> String {
        let Some(crop) = crop else {
            return String::new();
        };
        match kind {
            FieldKind::Ean => {
                let decoded = match self.barcode.decode(&crop) {
                    Ok(payload) => payload,
                    Err(error) => {
                        warn!(%error, "barcode decode failed, falling back to text recognition");
                        String::new()
                    }
                };
                if decoded.is_empty() {
                    self.recognize(&crop)
                } else {
                    decoded
                }
            }
            _ => kind.normalize(&self.recognize(&crop)),
        }
    }

    fn recognize(&self, crop: &RgbImage) -> String {
        match self.recognizer.recognize(crop) {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "text recognition failed, treating as empty reading");
                String::new()
            }
        }
    }

    /// Draws the label marker into the shared annotated buffer and emits a
    /// frame snapshot while the buffer is locked.
    fn draw(&self, region: &LabelRegion, color: Rgb<u8>) {
        let mut canvas = self.annotated.lock().unwrap();
        draw_label_marker(&mut canvas, region, color, self.style);
        self.sink.on_frame(&canvas);
    }
}

/// Report-facing field name: title case, with the EAN acronym kept as-is.
fn display_name(kind: FieldKind, canonical: &str) -> String {
    if kind == FieldKind::Ean {
        return canonical.to_string();
    }
    canonical
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
