//! Whole-image orchestration.
//!
//! The [`Inspector`] owns the injected capabilities and drives one image at
//! a time: detect label regions, fix their reading order, fan the labels out
//! over a bounded worker pool, reassemble outcomes in reading order, compose
//! the annotated image, and produce the metrics report.

use crate::core::{
    BarcodeDecoder, InspectError, InspectResult, RegionDetector, SpecCatalog, TextRecognizer,
};
use crate::domain::{LabelOutcome, LabelRegion};
use crate::pipeline::label::LabelProcessor;
use crate::pipeline::progress::NullSink;
use crate::pipeline::{CancelToken, InspectorConfig, MetricsReport, ProgressSink};
use crate::processors::{reading_order, BoundingBox};
use crate::store::VariantStore;
use crate::utils::{load_image, MarkerStyle};
use image::RgbImage;
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

/// Everything produced for one inspected image.
#[derive(Debug)]
pub struct Inspection {
    /// Identifier of the image (file stem for path inputs).
    pub image_id: String,
    /// Per-label outcomes in reading order. Cancelled or failed labels are
    /// absent.
    pub outcomes: Vec<LabelOutcome>,
    /// The source image with every label's marker drawn.
    pub annotated: RgbImage,
    /// Aggregated metrics for the image.
    pub report: MetricsReport,
}

/// The label inspection pipeline.
///
/// Capabilities are constructed once, injected at build time, and shared
/// read-only across all concurrent label tasks; there is no ambient model
/// state and no per-task initialization.
pub struct Inspector {
    label_detector: Arc<dyn RegionDetector>,
    field_detector: Arc<dyn RegionDetector>,
    recognizer: Arc<dyn TextRecognizer>,
    barcode: Arc<dyn BarcodeDecoder>,
    catalog: Arc<dyn SpecCatalog>,
    variants: Arc<VariantStore>,
    config: InspectorConfig,
    style: MarkerStyle,
    sink: Arc<dyn ProgressSink>,
}

impl Inspector {
    /// Starts building an inspector.
    pub fn builder() -> InspectorBuilder {
        InspectorBuilder::default()
    }

    /// The variant store, for the reviewer approval workflow.
    pub fn variants(&self) -> &VariantStore {
        &self.variants
    }

    /// Inspects an image file.
    ///
    /// The file stem becomes the image identifier used in artifacts and the
    /// report header. An unreadable image is fatal for this image; no
    /// partial artifacts are produced.
    pub fn inspect_path(
        &self,
        path: &Path,
        product_code: &str,
        client: Option<&str>,
        cancel: &CancelToken,
    ) -> InspectResult<Inspection> {
        let image = load_image(path)?;
        let image_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        self.inspect_image(&image, &image_id, product_code, client, cancel)
    }

    /// Inspects an in-memory image.
    pub fn inspect_image(
        &self,
        image: &RgbImage,
        image_id: &str,
        product_code: &str,
        client: Option<&str>,
        cancel: &CancelToken,
    ) -> InspectResult<Inspection> {
        let spec = self.catalog.lookup(product_code)?;

        let detections = self.label_detector.detect(image)?;
        let boxes: Vec<BoundingBox> = detections.iter().map(|d| d.bbox).collect();
        let order = reading_order(&boxes, self.config.row_threshold);
        let regions: Vec<LabelRegion> = order
            .iter()
            .enumerate()
            .map(|(index, &detected)| LabelRegion {
                index,
                bbox: boxes[detected],
            })
            .collect();
        info!(image_id, labels = regions.len(), "label detection complete");

        let annotated = Mutex::new(image.clone());
        let outcomes = self.process_regions(image, &regions, &spec, &annotated, cancel)?;

        let report = MetricsReport::from_outcomes(image_id, client, &outcomes);
        let annotated = annotated
            .into_inner()
            .map_err(|_| InspectError::config("annotated buffer lock poisoned"))?;

        if let Some(root) = self.config.output_root.clone() {
            self.write_artifacts(&root, image_id, &annotated, &report, &outcomes)?;
        }

        info!(
            image_id,
            labels = outcomes.len(),
            fails = report.total_fails(),
            "inspection complete"
        );
        Ok(Inspection {
            image_id: image_id.to_string(),
            outcomes,
            annotated,
            report,
        })
    }

    /// Fans label tasks out over a bounded pool and reassembles outcomes in
    /// reading order.
    ///
    /// Tasks may complete in any order; the indexed collect keeps the
    /// aggregation keyed by reading-order position, never completion order.
    fn process_regions(
        &self,
        image: &RgbImage,
        regions: &[LabelRegion],
        spec: &crate::domain::FieldSpec,
        annotated: &Mutex<RgbImage>,
        cancel: &CancelToken,
    ) -> InspectResult<Vec<LabelOutcome>> {
        let total = regions.len();
        if total == 0 {
            return Ok(Vec::new());
        }

        let processor = LabelProcessor {
            field_detector: self.field_detector.as_ref(),
            recognizer: self.recognizer.as_ref(),
            barcode: self.barcode.as_ref(),
            spec,
            variants: &self.variants,
            config: &self.config,
            annotated,
            style: &self.style,
            sink: self.sink.as_ref(),
        };

        let workers = self.config.max_workers.clamp(1, total);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| InspectError::config(format!("worker pool: {e}")))?;
        debug!(workers, total, "label worker pool ready");

        let completed = AtomicUsize::new(0);
        let slots: Vec<Option<LabelOutcome>> = pool.install(|| {
            regions
                .par_iter()
                .map(|region| {
                    if cancel.is_cancelled() {
                        debug!(label = %region.number(), "cancelled before start");
                        return None;
                    }
                    match processor.process(image, region) {
                        Ok(outcome) => {
                            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                            self.sink.on_progress(done, total);
                            Some(outcome)
                        }
                        Err(error) => {
                            error!(
                                label = %region.number(),
                                %error,
                                "label task failed, omitting its outcome"
                            );
                            None
                        }
                    }
                })
                .collect()
        });

        Ok(slots.into_iter().flatten().collect())
    }

    /// Writes the per-image artifacts under `<root>/<image id>/`.
    fn write_artifacts(
        &self,
        root: &Path,
        image_id: &str,
        annotated: &RgbImage,
        report: &MetricsReport,
        outcomes: &[LabelOutcome],
    ) -> InspectResult<()> {
        let dir = root.join(image_id);
        std::fs::create_dir_all(&dir)?;

        annotated
            .save(dir.join(format!("{image_id}_annotated.png")))
            .map_err(InspectError::ImageLoad)?;
        report.write_to(&dir.join("metrics.txt"))?;

        if self.config.save_failed_crops {
            for outcome in outcomes.iter().filter(|o| o.has_failures()) {
                let name = format!("label_{:02}_ng.png", outcome.index + 1);
                outcome
                    .crop
                    .save(dir.join(&name))
                    .map_err(InspectError::ImageLoad)?;
                debug!(image_id, crop = %name, "failing label crop saved for review");
            }
        }
        Ok(())
    }
}

/// Builder wiring capabilities and configuration into an [`Inspector`].
#[derive(Default)]
pub struct InspectorBuilder {
    label_detector: Option<Arc<dyn RegionDetector>>,
    field_detector: Option<Arc<dyn RegionDetector>>,
    recognizer: Option<Arc<dyn TextRecognizer>>,
    barcode: Option<Arc<dyn BarcodeDecoder>>,
    catalog: Option<Arc<dyn SpecCatalog>>,
    variants: Option<Arc<VariantStore>>,
    config: Option<InspectorConfig>,
    style: Option<MarkerStyle>,
    sink: Option<Arc<dyn ProgressSink>>,
}

impl InspectorBuilder {
    /// The detector trained for label regions on full images.
    pub fn label_detector(mut self, detector: Arc<dyn RegionDetector>) -> Self {
        self.label_detector = Some(detector);
        self
    }

    /// The detector trained for field regions on oriented label crops.
    pub fn field_detector(mut self, detector: Arc<dyn RegionDetector>) -> Self {
        self.field_detector = Some(detector);
        self
    }

    /// The text recognition engine.
    pub fn recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// The barcode decoding engine.
    pub fn barcode_decoder(mut self, decoder: Arc<dyn BarcodeDecoder>) -> Self {
        self.barcode = Some(decoder);
        self
    }

    /// The specification catalog.
    pub fn catalog(mut self, catalog: Arc<dyn SpecCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// The variant store.
    pub fn variants(mut self, variants: Arc<VariantStore>) -> Self {
        self.variants = Some(variants);
        self
    }

    /// Pipeline configuration; defaults apply when not set.
    pub fn config(mut self, config: InspectorConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Marker styling for the annotated image.
    pub fn marker_style(mut self, style: MarkerStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Progress receiver; a no-op sink is used when not set.
    pub fn progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Builds the inspector, failing when a required capability is missing.
    pub fn build(self) -> InspectResult<Inspector> {
        fn require<T>(value: Option<T>, what: &str) -> InspectResult<T> {
            value.ok_or_else(|| InspectError::config(format!("{what} is required")))
        }

        Ok(Inspector {
            label_detector: require(self.label_detector, "label detector")?,
            field_detector: require(self.field_detector, "field detector")?,
            recognizer: require(self.recognizer, "text recognizer")?,
            barcode: require(self.barcode, "barcode decoder")?,
            catalog: require(self.catalog, "specification catalog")?,
            variants: require(self.variants, "variant store")?,
            config: self.config.unwrap_or_default(),
            style: self.style.unwrap_or_default(),
            sink: self.sink.unwrap_or_else(|| Arc::new(NullSink)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Detection;
    use crate::domain::{FieldSpec, LabelMarker};
    use image::Rgb;
    use std::collections::HashMap;
    use tempfile::TempDir;

    /// Detector scripted with fixed boxes per class.
    struct ScriptedDetector {
        detections: Vec<(BoundingBox, usize)>,
        classes: Vec<&'static str>,
    }

    impl RegionDetector for ScriptedDetector {
        fn detect(&self, _image: &RgbImage) -> InspectResult<Vec<Detection>> {
            Ok(self
                .detections
                .iter()
                .map(|&(bbox, class_id)| Detection {
                    bbox,
                    class_id,
                    confidence: 0.99,
                })
                .collect())
        }

        fn class_name(&self, class_id: usize) -> Option<&str> {
            self.classes.get(class_id).copied()
        }
    }

    /// Recognizer keyed on the crop's fill color and height, so each
    /// (label, field) pair can be scripted independently.
    struct ScriptedRecognizer {
        by_color_and_height: HashMap<(u8, u32), &'static str>,
    }

    impl TextRecognizer for ScriptedRecognizer {
        fn recognize(&self, crop: &RgbImage) -> InspectResult<String> {
            let key = (crop.get_pixel(0, 0)[0], crop.height());
            Ok(self
                .by_color_and_height
                .get(&key)
                .copied()
                .unwrap_or("")
                .to_string())
        }
    }

    struct ScriptedBarcode {
        payload: &'static str,
    }

    impl BarcodeDecoder for ScriptedBarcode {
        fn decode(&self, _crop: &RgbImage) -> InspectResult<String> {
            Ok(self.payload.to_string())
        }
    }

    struct TestCatalog {
        spec: FieldSpec,
    }

    impl SpecCatalog for TestCatalog {
        fn lookup(&self, product_code: &str) -> InspectResult<FieldSpec> {
            if product_code == self.spec.product_code() {
                Ok(self.spec.clone())
            } else {
                Err(InspectError::unknown_product(product_code))
            }
        }
    }

    struct CountingSink {
        calls: AtomicUsize,
    }

    impl ProgressSink for CountingSink {
        fn on_progress(&self, _completed: usize, _total: usize) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Two side-by-side labels filled with distinct colors; each oriented
    /// crop is 100 wide and 80 tall, with the capacity field in the top 30
    /// rows and the color field below it.
    fn test_image() -> RgbImage {
        let mut img = RgbImage::new(200, 100);
        for y in 0..100 {
            for x in 0..80 {
                img.put_pixel(x, y, Rgb([10, 0, 0]));
            }
            for x in 120..200 {
                img.put_pixel(x, y, Rgb([20, 0, 0]));
            }
        }
        img
    }

    fn label_detector() -> Arc<dyn RegionDetector> {
        Arc::new(ScriptedDetector {
            // Listed right-to-left on purpose; reading order must fix it.
            detections: vec![
                (BoundingBox::new(120, 0, 200, 100), 0),
                (BoundingBox::new(0, 0, 80, 100), 0),
            ],
            classes: vec!["label"],
        })
    }

    fn field_detector() -> Arc<dyn RegionDetector> {
        Arc::new(ScriptedDetector {
            detections: vec![
                (BoundingBox::new(0, 0, 100, 30), 0),
                (BoundingBox::new(0, 30, 100, 80), 1),
            ],
            classes: vec!["capacity", "color"],
        })
    }

    fn recognizer() -> Arc<dyn TextRecognizer> {
        Arc::new(ScriptedRecognizer {
            by_color_and_height: HashMap::from([
                ((10, 30), "128GB | 256GB"),
                ((10, 50), "Black"),
                ((20, 30), "128GB"),
                ((20, 50), "Black"),
            ]),
        })
    }

    fn build_inspector(dir: &TempDir, config: InspectorConfig) -> Inspector {
        let spec = FieldSpec::new(
            "SM-TEST",
            [("CAPACITY", "128GB | 256GB"), ("COLOR", "Black")],
        );
        Inspector::builder()
            .label_detector(label_detector())
            .field_detector(field_detector())
            .recognizer(recognizer())
            .barcode_decoder(Arc::new(ScriptedBarcode { payload: "" }))
            .catalog(Arc::new(TestCatalog { spec }))
            .variants(Arc::new(
                VariantStore::open(dir.path().join("variants.json")).unwrap(),
            ))
            .config(config)
            .build()
            .unwrap()
    }

    #[test]
    fn build_fails_without_capabilities() {
        assert!(matches!(
            Inspector::builder().build(),
            Err(InspectError::Config { .. })
        ));
    }

    #[test]
    fn unknown_product_code_is_fatal() {
        let dir = TempDir::new().unwrap();
        let inspector = build_inspector(&dir, InspectorConfig::default());
        let result = inspector.inspect_image(
            &test_image(),
            "shot",
            "NO-SUCH-CODE",
            None,
            &CancelToken::new(),
        );
        assert!(matches!(result, Err(InspectError::UnknownProduct { .. })));
    }

    #[test]
    fn two_labels_one_capacity_failure() {
        let dir = TempDir::new().unwrap();
        let inspector = build_inspector(&dir, InspectorConfig::default());
        let inspection = inspector
            .inspect_image(&test_image(), "shot", "SM-TEST", None, &CancelToken::new())
            .unwrap();

        assert_eq!(inspection.outcomes.len(), 2);

        // Reading order: the left label is #1 despite being detected second.
        let first = &inspection.outcomes[0];
        assert_eq!(first.index, 0);
        assert!(!first.has_failures());
        assert_eq!(first.marker, LabelMarker::ConfidentPass);
        assert!(first.fields.iter().all(|v| v.score == 1.0));

        let second = &inspection.outcomes[1];
        assert_eq!(second.index, 1);
        assert_eq!(second.marker, LabelMarker::Attention);
        let failing: Vec<_> = second.failing_fields().collect();
        assert_eq!(failing.len(), 1);
        assert_eq!(failing[0].field, "Capacity");
        assert!(failing[0].score < 0.93);

        // 1 failing field of 2 labels × 2 fields.
        assert_eq!(inspection.report.fail_rate(), Some(25.0));
        assert!(inspection
            .report
            .render()
            .contains("Total Labels: 2 | Total fails: 1 | Fail rate: 25.0%"));

        // The annotated composite carries both markers.
        assert_eq!(
            inspection.annotated.get_pixel(0, 0),
            &Rgb([0, 255, 0]),
            "confident label outlined in green"
        );
        assert_eq!(
            inspection.annotated.get_pixel(120, 0),
            &Rgb([255, 0, 0]),
            "failing label outlined in red"
        );
    }

    #[test]
    fn approved_variant_rescues_the_failing_capacity() {
        let dir = TempDir::new().unwrap();
        let inspector = build_inspector(&dir, InspectorConfig::default());
        inspector
            .variants()
            .approve("SM-TEST", "CAPACITY", "128GB")
            .unwrap();

        let inspection = inspector
            .inspect_image(&test_image(), "shot", "SM-TEST", None, &CancelToken::new())
            .unwrap();
        let second = &inspection.outcomes[1];
        assert!(!second.has_failures());
        let capacity = &second.fields[0];
        assert_eq!(capacity.matched_variant.as_deref(), Some("128GB"));
        assert_eq!(inspection.report.total_fails(), 0);
    }

    #[test]
    fn zero_labels_is_an_empty_result_not_an_error() {
        let dir = TempDir::new().unwrap();
        let spec = FieldSpec::new("SM-TEST", [("CAPACITY", "128GB | 256GB")]);
        let inspector = Inspector::builder()
            .label_detector(Arc::new(ScriptedDetector {
                detections: vec![],
                classes: vec!["label"],
            }))
            .field_detector(field_detector())
            .recognizer(recognizer())
            .barcode_decoder(Arc::new(ScriptedBarcode { payload: "" }))
            .catalog(Arc::new(TestCatalog { spec }))
            .variants(Arc::new(
                VariantStore::open(dir.path().join("variants.json")).unwrap(),
            ))
            .build()
            .unwrap();

        let inspection = inspector
            .inspect_image(&test_image(), "shot", "SM-TEST", None, &CancelToken::new())
            .unwrap();
        assert!(inspection.outcomes.is_empty());
        assert!(inspection
            .report
            .render()
            .contains("Summary: No labels detected."));
    }

    #[test]
    fn cancellation_skips_tasks_without_error() {
        let dir = TempDir::new().unwrap();
        let inspector = build_inspector(&dir, InspectorConfig::default());
        let cancel = CancelToken::new();
        cancel.cancel();
        let inspection = inspector
            .inspect_image(&test_image(), "shot", "SM-TEST", None, &cancel)
            .unwrap();
        assert!(inspection.outcomes.is_empty());
    }

    #[test]
    fn progress_is_reported_per_completed_label() {
        let dir = TempDir::new().unwrap();
        let sink = Arc::new(CountingSink {
            calls: AtomicUsize::new(0),
        });
        let spec = FieldSpec::new(
            "SM-TEST",
            [("CAPACITY", "128GB | 256GB"), ("COLOR", "Black")],
        );
        let inspector = Inspector::builder()
            .label_detector(label_detector())
            .field_detector(field_detector())
            .recognizer(recognizer())
            .barcode_decoder(Arc::new(ScriptedBarcode { payload: "" }))
            .catalog(Arc::new(TestCatalog { spec }))
            .variants(Arc::new(
                VariantStore::open(dir.path().join("variants.json")).unwrap(),
            ))
            .progress_sink(sink.clone())
            .build()
            .unwrap();

        inspector
            .inspect_image(&test_image(), "shot", "SM-TEST", None, &CancelToken::new())
            .unwrap();
        assert_eq!(sink.calls.load(Ordering::SeqCst), 2);
    }

    /// One label filling the left side of the test image.
    fn single_label_detector() -> Arc<dyn RegionDetector> {
        Arc::new(ScriptedDetector {
            detections: vec![(BoundingBox::new(0, 0, 80, 100), 0)],
            classes: vec!["label"],
        })
    }

    fn ean_inspector(
        dir: &TempDir,
        fields: Arc<dyn RegionDetector>,
        recognizer: Arc<dyn TextRecognizer>,
        payload: &'static str,
    ) -> Inspector {
        let spec = FieldSpec::new("SM-TEST", [("EAN", "8806095338551")]);
        Inspector::builder()
            .label_detector(single_label_detector())
            .field_detector(fields)
            .recognizer(recognizer)
            .barcode_decoder(Arc::new(ScriptedBarcode { payload }))
            .catalog(Arc::new(TestCatalog { spec }))
            .variants(Arc::new(
                VariantStore::open(dir.path().join("variants.json")).unwrap(),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn ean_prefers_the_barcode_decoder() {
        let dir = TempDir::new().unwrap();
        let fields = Arc::new(ScriptedDetector {
            detections: vec![(BoundingBox::new(0, 0, 100, 80), 0)],
            classes: vec!["ean"],
        });
        // The recognizer would return garbage; it must not be consulted.
        let recognizer = Arc::new(ScriptedRecognizer {
            by_color_and_height: HashMap::from([((10, 80), "not a barcode")]),
        });
        let inspector = ean_inspector(&dir, fields, recognizer, "8806095338551");

        let inspection = inspector
            .inspect_image(&test_image(), "shot", "SM-TEST", None, &CancelToken::new())
            .unwrap();
        let verdict = &inspection.outcomes[0].fields[0];
        assert_eq!(verdict.field, "EAN");
        assert!(verdict.valid);
        assert_eq!(verdict.raw, "8806095338551");
    }

    #[test]
    fn ean_falls_back_to_text_recognition_when_decode_is_empty() {
        let dir = TempDir::new().unwrap();
        let fields = Arc::new(ScriptedDetector {
            detections: vec![(BoundingBox::new(0, 0, 100, 80), 0)],
            classes: vec!["ean"],
        });
        let recognizer = Arc::new(ScriptedRecognizer {
            by_color_and_height: HashMap::from([((10, 80), "880 6095-33855 1")]),
        });
        let inspector = ean_inspector(&dir, fields, recognizer, "");

        let inspection = inspector
            .inspect_image(&test_image(), "shot", "SM-TEST", None, &CancelToken::new())
            .unwrap();
        let verdict = &inspection.outcomes[0].fields[0];
        assert!(verdict.valid);
        assert_eq!(verdict.raw, "880 6095-33855 1");
        assert_eq!(verdict.normalized, "8806095338551");
    }

    #[test]
    fn unknown_field_classes_are_ignored() {
        let dir = TempDir::new().unwrap();
        let fields = Arc::new(ScriptedDetector {
            detections: vec![
                (BoundingBox::new(0, 0, 100, 30), 0),
                (BoundingBox::new(0, 30, 100, 80), 1),
                (BoundingBox::new(0, 0, 50, 10), 2),
            ],
            classes: vec!["capacity", "color", "serial_no"],
        });
        let spec = FieldSpec::new(
            "SM-TEST",
            [("CAPACITY", "128GB | 256GB"), ("COLOR", "Black")],
        );
        let inspector = Inspector::builder()
            .label_detector(single_label_detector())
            .field_detector(fields)
            .recognizer(recognizer())
            .barcode_decoder(Arc::new(ScriptedBarcode { payload: "" }))
            .catalog(Arc::new(TestCatalog { spec }))
            .variants(Arc::new(
                VariantStore::open(dir.path().join("variants.json")).unwrap(),
            ))
            .build()
            .unwrap();

        let inspection = inspector
            .inspect_image(&test_image(), "shot", "SM-TEST", None, &CancelToken::new())
            .unwrap();
        let fields: Vec<&str> = inspection.outcomes[0]
            .fields
            .iter()
            .map(|v| v.field.as_str())
            .collect();
        assert_eq!(fields, vec!["Capacity", "Color"]);
    }

    struct FailingRecognizer;

    impl TextRecognizer for FailingRecognizer {
        fn recognize(&self, _crop: &RgbImage) -> InspectResult<String> {
            Err(InspectError::capability(
                "text recognizer",
                "engine unavailable",
                std::io::Error::other("engine down"),
            ))
        }
    }

    #[test]
    fn recognizer_failure_degrades_to_a_failing_field() {
        let dir = TempDir::new().unwrap();
        let spec = FieldSpec::new("SM-TEST", [("CAPACITY", "128GB | 256GB")]);
        let inspector = Inspector::builder()
            .label_detector(single_label_detector())
            .field_detector(Arc::new(ScriptedDetector {
                detections: vec![(BoundingBox::new(0, 0, 100, 30), 0)],
                classes: vec!["capacity"],
            }))
            .recognizer(Arc::new(FailingRecognizer))
            .barcode_decoder(Arc::new(ScriptedBarcode { payload: "" }))
            .catalog(Arc::new(TestCatalog { spec }))
            .variants(Arc::new(
                VariantStore::open(dir.path().join("variants.json")).unwrap(),
            ))
            .build()
            .unwrap();

        let inspection = inspector
            .inspect_image(&test_image(), "shot", "SM-TEST", None, &CancelToken::new())
            .unwrap();
        // The label survives with an empty reading that fails validation.
        assert_eq!(inspection.outcomes.len(), 1);
        let verdict = &inspection.outcomes[0].fields[0];
        assert!(!verdict.valid);
        assert_eq!(verdict.raw, "");
        assert_eq!(verdict.score, 0.0);
    }

    struct FailingDetector;

    impl RegionDetector for FailingDetector {
        fn detect(&self, _image: &RgbImage) -> InspectResult<Vec<Detection>> {
            Err(InspectError::capability(
                "field detector",
                "inference failed",
                std::io::Error::other("cuda error"),
            ))
        }

        fn class_name(&self, _class_id: usize) -> Option<&str> {
            None
        }
    }

    #[test]
    fn field_detector_failure_omits_the_label_only() {
        let dir = TempDir::new().unwrap();
        let spec = FieldSpec::new("SM-TEST", [("CAPACITY", "128GB | 256GB")]);
        let inspector = Inspector::builder()
            .label_detector(single_label_detector())
            .field_detector(Arc::new(FailingDetector))
            .recognizer(recognizer())
            .barcode_decoder(Arc::new(ScriptedBarcode { payload: "" }))
            .catalog(Arc::new(TestCatalog { spec }))
            .variants(Arc::new(
                VariantStore::open(dir.path().join("variants.json")).unwrap(),
            ))
            .build()
            .unwrap();

        let inspection = inspector
            .inspect_image(&test_image(), "shot", "SM-TEST", None, &CancelToken::new())
            .unwrap();
        assert!(inspection.outcomes.is_empty());
    }

    #[test]
    fn artifacts_are_written_when_an_output_root_is_set() {
        let dir = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let config = InspectorConfig {
            output_root: Some(out.path().to_path_buf()),
            save_failed_crops: true,
            ..InspectorConfig::default()
        };
        let inspector = build_inspector(&dir, config);
        inspector
            .inspect_image(
                &test_image(),
                "shot-42",
                "SM-TEST",
                Some("10.1.2.3"),
                &CancelToken::new(),
            )
            .unwrap();

        let base = out.path().join("shot-42");
        assert!(base.join("shot-42_annotated.png").exists());
        let metrics = std::fs::read_to_string(base.join("metrics.txt")).unwrap();
        assert!(metrics.contains("Client: 10.1.2.3"));
        // Label #2 fails its capacity field, so its crop is kept for review.
        assert!(base.join("label_02_ng.png").exists());
        assert!(!base.join("label_01_ng.png").exists());
    }
}
