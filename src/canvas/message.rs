//! User-facing messages of the interactive front-end.

use crate::core::errors::ErrorKind;
use crate::domain::Prediction;
use crate::processors::RankedDigit;
use std::fmt;

/// How a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStyle {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageStyle {
    /// A short tag for plain-text output.
    pub fn tag(self) -> &'static str {
        match self {
            MessageStyle::Info => "info",
            MessageStyle::Success => "ok",
            MessageStyle::Warning => "warn",
            MessageStyle::Error => "error",
        }
    }
}

/// What the result panel currently shows. Each failure kind gets its own
/// variant so it can be styled distinctly.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasMessage {
    /// Nothing requested yet, or the surface was just cleared.
    Idle,
    /// Predict was pressed before anything was drawn; the pipeline was not called.
    EmptyCanvas,
    /// Something was drawn but too faint to count as a digit.
    NothingDrawn,
    /// A successful prediction with the top-ranked digits.
    Prediction {
        prediction: Prediction,
        ranking: Vec<RankedDigit>,
    },
    /// The pipeline failed at decode or inference.
    PredictionFailed { kind: ErrorKind, detail: String },
    /// The classifier could not be loaded.
    ClassifierUnavailable { message: String },
}

impl CanvasMessage {
    pub fn style(&self) -> MessageStyle {
        match self {
            CanvasMessage::Idle => MessageStyle::Info,
            CanvasMessage::EmptyCanvas | CanvasMessage::NothingDrawn => MessageStyle::Warning,
            CanvasMessage::Prediction { .. } => MessageStyle::Success,
            CanvasMessage::PredictionFailed { .. } | CanvasMessage::ClassifierUnavailable { .. } => {
                MessageStyle::Error
            }
        }
    }

    pub fn is_error(&self) -> bool {
        self.style() == MessageStyle::Error
    }
}

impl fmt::Display for CanvasMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.style().tag();
        match self {
            CanvasMessage::Idle => write!(
                f,
                "[{tag}] Draw a digit and run \"predict\" to see the prediction."
            ),
            CanvasMessage::EmptyCanvas => {
                write!(f, "[{tag}] Canvas is empty. Please draw a digit first!")
            }
            CanvasMessage::NothingDrawn => {
                write!(f, "[{tag}] Please draw a digit on the canvas first!")
            }
            CanvasMessage::Prediction {
                prediction,
                ranking,
            } => {
                writeln!(f, "[{tag}] Predicted digit: {}", prediction.predicted_class)?;
                writeln!(f, "       Confidence: {:.1}%", prediction.confidence * 100.0)?;
                write!(f, "       Top {}:", ranking.len())?;
                for entry in ranking {
                    write!(f, "  {entry}")?;
                }
                Ok(())
            }
            CanvasMessage::PredictionFailed { kind, detail } => write!(
                f,
                "[{tag}] Prediction failed ({kind}). Please try drawing again.\n       {detail}"
            ),
            CanvasMessage::ClassifierUnavailable { message } => write!(
                f,
                "[{tag}] Error loading model: {message}\n       Run \"reload\" once the model file is in place."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProbabilityVector;
    use crate::processors::top_k;

    #[test]
    fn test_styles_distinguish_failures() {
        assert_eq!(CanvasMessage::Idle.style(), MessageStyle::Info);
        assert_eq!(CanvasMessage::NothingDrawn.style(), MessageStyle::Warning);
        let failed = CanvasMessage::PredictionFailed {
            kind: ErrorKind::Inference,
            detail: "inference failed".to_string(),
        };
        assert!(failed.is_error());
        assert!(failed.to_string().contains("InferenceError"));
    }

    #[test]
    fn test_prediction_rendering() {
        let distribution =
            ProbabilityVector::new([0.0, 0.0, 0.05, 0.0, 0.0, 0.0, 0.0, 0.9, 0.05, 0.0]).unwrap();
        let message = CanvasMessage::Prediction {
            prediction: Prediction::from_distribution(distribution),
            ranking: top_k(&distribution, 3),
        };
        let text = message.to_string();
        assert!(text.starts_with("[ok] Predicted digit: 7"));
        assert!(text.contains("Confidence: 90.0%"));
        assert!(text.contains("Top 3:  7: 90.00%  2: 5.00%  8: 5.00%"));
    }
}
