//! State of one interactive drawing session.

use super::message::CanvasMessage;
use super::surface::DrawingCanvas;
use crate::core::config::{ModelConfig, PipelineConfig};
use crate::core::constants::DEFAULT_TOPK;
use crate::core::errors::{DigitResult, ErrorKind};
use crate::core::traits::Classifier;
use crate::domain::PredictionResult;
use crate::models::OnnxDigitClassifier;
use crate::pipeline::{DigitPipeline, EntryPoint};
use crate::processors::top_k;
use std::sync::Arc;
use tracing::{info, warn};

/// Whether the session can classify.
///
/// A failed load is not fatal here: the session keeps running, shows a
/// banner and can retry with [`CanvasSession::reload_classifier`].
#[derive(Debug, Clone)]
pub enum ClassifierState {
    Ready(DigitPipeline),
    Unavailable { message: String },
}

/// A drawing surface paired with the shared pipeline.
#[derive(Debug)]
pub struct CanvasSession {
    canvas: DrawingCanvas,
    state: ClassifierState,
    pipeline_config: PipelineConfig,
    topk: usize,
    message: CanvasMessage,
}

impl CanvasSession {
    /// Creates a session with no classifier yet.
    pub fn new(canvas: DrawingCanvas, pipeline_config: PipelineConfig) -> Self {
        Self {
            canvas,
            state: ClassifierState::Unavailable {
                message: "no classifier loaded".to_string(),
            },
            pipeline_config,
            topk: DEFAULT_TOPK,
            message: CanvasMessage::Idle,
        }
    }

    /// Creates a session and tries to load the model; failure becomes the banner.
    pub fn load(
        canvas: DrawingCanvas,
        model_config: &ModelConfig,
        pipeline_config: PipelineConfig,
    ) -> Self {
        let mut session = Self::new(canvas, pipeline_config);
        session.reload_classifier(model_config);
        session
    }

    /// Number of ranked digits shown with a prediction.
    pub fn with_topk(mut self, topk: usize) -> Self {
        self.topk = topk;
        self
    }

    /// (Re)loads the model from disk. Returns whether the session is ready.
    pub fn reload_classifier(&mut self, model_config: &ModelConfig) -> bool {
        match OnnxDigitClassifier::load(model_config) {
            Ok(classifier) => self.set_classifier(Arc::new(classifier)).is_ok(),
            Err(e) => {
                let message = e.full_message();
                warn!("Classifier unavailable: {}", message);
                self.state = ClassifierState::Unavailable { message };
                false
            }
        }
    }

    /// Installs an already loaded classifier.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the session's pipeline settings are
    /// invalid; the session is then left unavailable.
    pub fn set_classifier(&mut self, classifier: Arc<dyn Classifier>) -> DigitResult<()> {
        match DigitPipeline::new(classifier, &self.pipeline_config, EntryPoint::Canvas) {
            Ok(pipeline) => {
                info!("Canvas ready with classifier '{}'", pipeline.classifier_name());
                self.state = ClassifierState::Ready(pipeline);
                Ok(())
            }
            Err(e) => {
                self.state = ClassifierState::Unavailable {
                    message: e.full_message(),
                };
                Err(e)
            }
        }
    }

    pub fn state(&self) -> &ClassifierState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ClassifierState::Ready(_))
    }

    /// The startup banner, present while no classifier is available.
    pub fn banner(&self) -> Option<CanvasMessage> {
        match &self.state {
            ClassifierState::Ready(_) => None,
            ClassifierState::Unavailable { message } => {
                Some(CanvasMessage::ClassifierUnavailable {
                    message: message.clone(),
                })
            }
        }
    }

    pub fn canvas(&self) -> &DrawingCanvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut DrawingCanvas {
        &mut self.canvas
    }

    pub fn message(&self) -> &CanvasMessage {
        &self.message
    }

    /// Classifies the current drawing and updates the message.
    pub fn predict(&mut self) -> &CanvasMessage {
        self.message = match &self.state {
            ClassifierState::Unavailable { message } => CanvasMessage::ClassifierUnavailable {
                message: message.clone(),
            },
            ClassifierState::Ready(_) if !self.canvas.has_drawn() => CanvasMessage::EmptyCanvas,
            ClassifierState::Ready(pipeline) => {
                let result = pipeline.run_rgba(
                    self.canvas.width(),
                    self.canvas.height(),
                    self.canvas.to_rgba_buffer(),
                );
                self.message_for(result)
            }
        };
        &self.message
    }

    /// Resets the surface and the message; the pipeline is not involved.
    pub fn clear(&mut self) {
        self.canvas.clear();
        self.message = CanvasMessage::Idle;
    }

    fn message_for(&self, result: PredictionResult) -> CanvasMessage {
        match result {
            PredictionResult::Success(prediction) => CanvasMessage::Prediction {
                ranking: top_k(&prediction.distribution, self.topk),
                prediction,
            },
            PredictionResult::Failure(record) => match record.kind {
                ErrorKind::EmptyInput => CanvasMessage::NothingDrawn,
                kind => CanvasMessage::PredictionFailed {
                    kind,
                    detail: record.message,
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::DigitError;
    use crate::core::tensor::{Tensor2D, Tensor4D};
    use ndarray::Array2;

    struct FixedClassifier(Vec<f32>);

    impl Classifier for FixedClassifier {
        fn classify(&self, _input: &Tensor4D) -> DigitResult<Tensor2D> {
            Ok(Array2::from_shape_vec((1, self.0.len()), self.0.clone()).unwrap())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn classify(&self, _input: &Tensor4D) -> DigitResult<Tensor2D> {
            Err(DigitError::inference_error_msg("failing", "forward pass", "boom"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn ready_session(classifier: Arc<dyn Classifier>) -> CanvasSession {
        let mut session = CanvasSession::new(DrawingCanvas::default(), PipelineConfig::default());
        session.set_classifier(classifier).unwrap();
        session
    }

    fn draw_one(session: &mut CanvasSession) {
        session
            .canvas_mut()
            .stroke(&[(140.0, 40.0), (140.0, 240.0)]);
    }

    #[test]
    fn test_missing_model_shows_banner_and_can_retry() {
        let mut session = CanvasSession::load(
            DrawingCanvas::default(),
            &ModelConfig::new("models/not-here.onnx"),
            PipelineConfig::default(),
        );
        assert!(!session.is_ready());
        let banner = session.banner().unwrap();
        assert!(banner.is_error());
        assert!(banner.to_string().contains("not-here.onnx"));

        draw_one(&mut session);
        assert!(matches!(
            session.predict(),
            CanvasMessage::ClassifierUnavailable { .. }
        ));

        assert!(!session.reload_classifier(&ModelConfig::new("models/still-missing.onnx")));
        session
            .set_classifier(Arc::new(FixedClassifier(vec![0.1; 10])))
            .unwrap();
        assert!(session.is_ready());
        assert!(session.banner().is_none());
    }

    #[test]
    fn test_predict_before_drawing_skips_pipeline() {
        let mut session = ready_session(Arc::new(FailingClassifier));
        assert_eq!(session.predict(), &CanvasMessage::EmptyCanvas);
    }

    #[test]
    fn test_faint_drawing_is_nothing_drawn() {
        let config = PipelineConfig {
            empty_input_threshold: 1.0,
            ..PipelineConfig::default()
        };
        let mut canvas = DrawingCanvas::new(280, 2).unwrap();
        // A dot a few pixels wide carries far less than one output pixel of ink.
        canvas.begin_stroke(140.0, 140.0);
        let mut session = CanvasSession::new(canvas, config);
        session
            .set_classifier(Arc::new(FixedClassifier(vec![0.1; 10])))
            .unwrap();
        assert!(session.canvas().has_drawn());
        assert_eq!(session.predict(), &CanvasMessage::NothingDrawn);
    }

    #[test]
    fn test_successful_prediction_ranks_top_three() {
        let mut values = vec![0.0; 10];
        values[1] = 0.7;
        values[7] = 0.2;
        values[4] = 0.1;
        let mut session = ready_session(Arc::new(FixedClassifier(values)));
        draw_one(&mut session);

        match session.predict() {
            CanvasMessage::Prediction {
                prediction,
                ranking,
            } => {
                assert_eq!(prediction.predicted_class, 1);
                let digits: Vec<u8> = ranking.iter().map(|r| r.digit).collect();
                assert_eq!(digits, vec![1, 7, 4]);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_inference_failure_is_styled_error() {
        let mut session = ready_session(Arc::new(FailingClassifier));
        draw_one(&mut session);
        match session.predict() {
            CanvasMessage::PredictionFailed { kind, detail } => {
                assert_eq!(*kind, ErrorKind::Inference);
                assert!(detail.contains("boom"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_clear_resets_message() {
        let mut session = ready_session(Arc::new(FixedClassifier(vec![0.1; 10])));
        draw_one(&mut session);
        session.predict();
        session.clear();
        assert_eq!(session.message(), &CanvasMessage::Idle);
        assert!(!session.canvas().has_drawn());
    }
}
