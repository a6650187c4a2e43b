//! The shared decode → normalize → infer → shape pipeline.

use super::adapter::InferenceAdapter;
use super::debug_dump::DebugDumper;
use super::entry_point::EntryPoint;
use crate::core::config::{ConfigValidator, PipelineConfig};
use crate::core::errors::{DigitError, DigitResult};
use crate::core::traits::Classifier;
use crate::domain::{
    CanonicalTensor, PipelineStage, PredictionResult, ProbabilityVector, RawImage,
};
use crate::processors::{DigitNormalizer, ImageDecoder, ResultShaper};
use std::sync::Arc;
use tracing::{debug, info, warn};

type StageResult<T> = Result<T, (PipelineStage, DigitError)>;

/// One request in, one [`PredictionResult`] out.
///
/// The pipeline never returns an error or panics past its boundary: every
/// failure becomes the error variant of the result, tagged with the stage
/// that raised it. It holds no per-request state and can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct DigitPipeline {
    decoder: ImageDecoder,
    normalizer: DigitNormalizer,
    adapter: InferenceAdapter,
    shaper: ResultShaper,
    entry_point: EntryPoint,
    empty_input_threshold: f32,
    dumper: Option<DebugDumper>,
}

impl DigitPipeline {
    /// Builds a pipeline around a loaded classifier.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn new(
        classifier: Arc<dyn Classifier>,
        config: &PipelineConfig,
        entry_point: EntryPoint,
    ) -> DigitResult<Self> {
        config.validate()?;
        let pipeline = Self {
            decoder: ImageDecoder::new(),
            normalizer: DigitNormalizer::new(&config.normalizer)?,
            adapter: InferenceAdapter::new(classifier),
            shaper: ResultShaper::new(),
            entry_point,
            empty_input_threshold: config.empty_input_threshold,
            dumper: config.debug_dump_dir.as_ref().map(DebugDumper::new),
        };
        debug!(
            "Built {} pipeline: classifier '{}', filter {}, empty-input check {}",
            entry_point,
            pipeline.adapter.classifier_name(),
            pipeline.normalizer.filter(),
            entry_point.checks_empty_input()
        );
        Ok(pipeline)
    }

    /// Builds a pipeline with default settings.
    pub fn with_defaults(classifier: Arc<dyn Classifier>, entry_point: EntryPoint) -> Self {
        Self {
            decoder: ImageDecoder::new(),
            normalizer: DigitNormalizer::default(),
            adapter: InferenceAdapter::new(classifier),
            shaper: ResultShaper::new(),
            entry_point,
            empty_input_threshold: PipelineConfig::default().empty_input_threshold,
            dumper: None,
        }
    }

    pub fn entry_point(&self) -> EntryPoint {
        self.entry_point
    }

    pub fn classifier_name(&self) -> &str {
        self.adapter.classifier_name()
    }

    /// Classifies a `"<prefix>,<base64>"` data URL.
    pub fn run_data_url(&self, data_url: &str) -> PredictionResult {
        let outcome = self
            .decoder
            .decode_data_url(data_url)
            .map_err(|e| (PipelineStage::Decode, e))
            .and_then(|raw| self.process(&raw));
        self.finish(outcome)
    }

    /// Classifies a row-major RGBA buffer.
    pub fn run_rgba(&self, width: u32, height: u32, buffer: Vec<u8>) -> PredictionResult {
        let outcome = self
            .decoder
            .decode_rgba(width, height, buffer)
            .map_err(|e| (PipelineStage::Decode, e))
            .and_then(|raw| self.process(&raw));
        self.finish(outcome)
    }

    /// Classifies an already decoded image.
    pub fn run_raw(&self, raw: &RawImage) -> PredictionResult {
        self.finish(self.process(raw))
    }

    /// Normalizes without classifying.
    pub fn normalize(&self, raw: &RawImage) -> DigitResult<CanonicalTensor> {
        self.normalizer.normalize(raw)
    }

    /// Rejects a tensor whose sum is at or below the threshold.
    ///
    /// Applied only when the entry point asks for it.
    pub fn check_content(&self, tensor: &CanonicalTensor) -> DigitResult<()> {
        let sum = tensor.sum();
        if sum <= self.empty_input_threshold {
            return Err(DigitError::empty_input(sum, self.empty_input_threshold));
        }
        Ok(())
    }

    fn process(&self, raw: &RawImage) -> StageResult<ProbabilityVector> {
        if let Some(dumper) = &self.dumper {
            dumper.dump_original(raw);
        }

        let tensor = self
            .normalizer
            .normalize(raw)
            .map_err(|e| (PipelineStage::Normalize, e))?;

        if let Some(dumper) = &self.dumper {
            dumper.dump_canonical(&tensor);
        }

        if self.entry_point.checks_empty_input() {
            self.check_content(&tensor)
                .map_err(|e| (PipelineStage::ContentCheck, e))?;
        }

        self.adapter
            .infer(&tensor)
            .map_err(|e| (PipelineStage::Inference, e))
    }

    fn finish(&self, outcome: StageResult<ProbabilityVector>) -> PredictionResult {
        let result = match outcome {
            Ok(distribution) => self.shaper.success(distribution),
            Err((stage, error)) => self.shaper.failure(stage, &error),
        };
        match &result {
            PredictionResult::Success(prediction) => info!(
                "Predicted class: {}, confidence: {:.4}",
                prediction.predicted_class, prediction.confidence
            ),
            PredictionResult::Failure(record) => warn!(
                "{} request failed ({}): {}",
                self.entry_point, record.kind, record.message
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;
    use crate::core::tensor::{Tensor2D, Tensor4D};
    use crate::pipeline::debug_dump::{CANONICAL_IMAGE_FILE, ORIGINAL_IMAGE_FILE};
    use image::{Rgba, RgbaImage};
    use ndarray::Array2;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingClassifier {
        output: Vec<f32>,
        calls: AtomicUsize,
    }

    impl CountingClassifier {
        fn new(output: Vec<f32>) -> Arc<Self> {
            Arc::new(Self {
                output,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl Classifier for CountingClassifier {
        fn classify(&self, input: &Tensor4D) -> DigitResult<Tensor2D> {
            assert_eq!(input.shape(), &[1, 28, 28, 1]);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Array2::from_shape_vec((1, self.output.len()), self.output.clone()).unwrap())
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn blank_canvas() -> Vec<u8> {
        RgbaImage::from_pixel(280, 280, Rgba([255, 255, 255, 255])).into_raw()
    }

    fn one_hot(class: usize) -> Vec<f32> {
        let mut values = vec![0.0; 10];
        values[class] = 1.0;
        values
    }

    #[test]
    fn test_canvas_blank_input_is_empty_without_inference() {
        let classifier = CountingClassifier::new(one_hot(5));
        let pipeline = DigitPipeline::with_defaults(classifier.clone(), EntryPoint::Canvas);

        let result = pipeline.run_rgba(280, 280, blank_canvas());
        assert_eq!(result.error_kind(), Some(ErrorKind::EmptyInput));
        assert_eq!(result.error().unwrap().stage, PipelineStage::ContentCheck);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_http_blank_input_is_classified() {
        let classifier = CountingClassifier::new(one_hot(5));
        let pipeline = DigitPipeline::with_defaults(classifier.clone(), EntryPoint::Http);

        let result = pipeline.run_rgba(280, 280, blank_canvas());
        assert_eq!(result.prediction().unwrap().predicted_class, 5);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_malformed_data_url_fails_at_decode() {
        let classifier = CountingClassifier::new(one_hot(1));
        let pipeline = DigitPipeline::with_defaults(classifier.clone(), EntryPoint::Http);

        for input in ["no separator here", "data:image/png;base64,%%%"] {
            let result = pipeline.run_data_url(input);
            let record = result.error().unwrap();
            assert_eq!(record.kind, ErrorKind::Decode);
            assert_eq!(record.stage, PipelineStage::Decode);
            assert!(record.message.starts_with("decode failed: "));
        }
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_wrong_output_width_is_inference_error() {
        let classifier = CountingClassifier::new(vec![0.5; 9]);
        let pipeline = DigitPipeline::with_defaults(classifier, EntryPoint::Http);

        let result = pipeline.run_rgba(280, 280, blank_canvas());
        let record = result.error().unwrap();
        assert_eq!(record.kind, ErrorKind::Inference);
        assert_eq!(record.stage, PipelineStage::Inference);
    }

    #[test]
    fn test_check_content_threshold_is_exclusive() {
        let classifier = CountingClassifier::new(one_hot(0));
        let config = PipelineConfig {
            empty_input_threshold: 2.0,
            ..PipelineConfig::default()
        };
        let pipeline = DigitPipeline::new(classifier, &config, EntryPoint::Canvas).unwrap();

        let mut array = ndarray::Array4::zeros((1, 28, 28, 1));
        array[[0, 0, 0, 0]] = 1.0;
        array[[0, 0, 1, 0]] = 1.0;
        let at_threshold = CanonicalTensor::new(array.clone()).unwrap();
        assert!(pipeline.check_content(&at_threshold).is_err());

        array[[0, 0, 2, 0]] = 0.5;
        let above = CanonicalTensor::new(array).unwrap();
        assert!(pipeline.check_content(&above).is_ok());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let classifier = CountingClassifier::new(one_hot(0));
        let config = PipelineConfig {
            empty_input_threshold: f32::NAN,
            ..PipelineConfig::default()
        };
        let err = DigitPipeline::new(classifier, &config, EntryPoint::Http).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Startup);
    }

    #[test]
    fn test_debug_dump_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let classifier = CountingClassifier::new(one_hot(4));
        let config = PipelineConfig {
            debug_dump_dir: Some(dir.path().to_path_buf()),
            ..PipelineConfig::default()
        };
        let pipeline = DigitPipeline::new(classifier, &config, EntryPoint::Http).unwrap();

        let result = pipeline.run_rgba(280, 280, blank_canvas());
        assert!(result.is_success());
        assert!(dir.path().join(ORIGINAL_IMAGE_FILE).is_file());
        assert!(dir.path().join(CANONICAL_IMAGE_FILE).is_file());
    }
}
