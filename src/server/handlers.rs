//! Request handlers and wire types.

use super::AppState;
use crate::core::errors::{DigitError, SimpleError};
use crate::domain::{ErrorRecord, PipelineStage, PredictionResult};
use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::error;

/// Body of `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    /// A data URL such as `data:image/png;base64,iVBOR...`.
    pub image: String,
}

/// Response of `POST /predict`; always sent with status 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictResponse {
    Prediction {
        class: u8,
        confidence: f32,
        predictions: Vec<f32>,
    },
    Error {
        error: String,
    },
}

impl From<&PredictionResult> for PredictResponse {
    fn from(result: &PredictionResult) -> Self {
        match result {
            PredictionResult::Success(prediction) => PredictResponse::Prediction {
                class: prediction.predicted_class,
                confidence: prediction.confidence,
                predictions: prediction.distribution.as_slice().to_vec(),
            },
            PredictionResult::Failure(record) => PredictResponse::Error {
                error: record.message.clone(),
            },
        }
    }
}

pub(super) async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Json<PredictResponse> {
    let request: PredictRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            let err = DigitError::decode_error(
                "request body must be a JSON object with an 'image' string",
                e,
            );
            let record = ErrorRecord::from_error(PipelineStage::Decode, &err);
            return Json(PredictResponse::from(&PredictionResult::Failure(record)));
        }
    };

    let worker_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || {
        worker_state.pipeline.run_data_url(&request.image)
    })
    .await
    .unwrap_or_else(|e| {
        error!("Prediction task did not complete: {}", e);
        let err = DigitError::inference_error(
            state.pipeline.classifier_name(),
            "prediction task did not complete",
            SimpleError::new(e.to_string()),
        );
        PredictionResult::Failure(ErrorRecord::from_error(PipelineStage::Inference, &err))
    });

    Json(PredictResponse::from(&result))
}

pub(super) async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.pipeline.classifier_name(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ErrorKind;
    use crate::domain::{Prediction, ProbabilityVector};

    #[test]
    fn test_success_wire_shape() {
        let distribution =
            ProbabilityVector::new([0.1, 0.05, 0.05, 0.6, 0.0, 0.0, 0.0, 0.1, 0.05, 0.05]).unwrap();
        let result = PredictionResult::Success(Prediction::from_distribution(distribution));
        let value = serde_json::to_value(PredictResponse::from(&result)).unwrap();
        assert_eq!(value["class"], 3);
        assert!((value["confidence"].as_f64().unwrap() - 0.6).abs() < 1e-6);
        assert_eq!(value["predictions"].as_array().unwrap().len(), 10);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_wire_shape() {
        let record = ErrorRecord {
            kind: ErrorKind::Decode,
            stage: PipelineStage::Decode,
            message: "decode failed: malformed payload".to_string(),
        };
        let value =
            serde_json::to_value(PredictResponse::from(&PredictionResult::Failure(record))).unwrap();
        assert_eq!(value, json!({ "error": "decode failed: malformed payload" }));
    }
}
