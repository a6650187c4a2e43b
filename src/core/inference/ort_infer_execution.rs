use super::*;
use crate::core::errors::SimpleError;
use ndarray::ArrayView2;
use ort::value::TensorRef;

impl OrtInfer {
    /// Returns the model path associated with this inference engine.
    pub fn model_path(&self) -> &std::path::Path {
        &self.model_path
    }

    /// Returns the model name associated with this inference engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn run_inference_with_processor<T>(
        &self,
        x: &Tensor4D,
        processor: impl FnOnce(&[i64], &[f32]) -> Result<T, DigitError>,
    ) -> Result<T, DigitError> {
        let input_shape = x.shape().to_vec();

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            DigitError::tensor_operation_error(
                "tensor_conversion",
                &input_shape,
                &input_shape,
                &format!("Failed to convert input tensor with shape {input_shape:?}"),
                e,
            )
        })?;

        let inputs = ort::inputs![self.input_name.as_str() => input_tensor];

        let idx = self
            .next_idx
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            % self.sessions.len();
        let mut session_guard = self.sessions[idx].lock().map_err(|_| {
            DigitError::inference_error(
                &self.model_name,
                &format!(
                    "Failed to acquire session lock for session {}/{}",
                    idx,
                    self.sessions.len()
                ),
                SimpleError::new("Session lock acquisition failed"),
            )
        })?;

        let outputs = session_guard.run(inputs).map_err(|e| {
            DigitError::inference_error(
                &self.model_name,
                &format!(
                    "ONNX Runtime forward pass failed with input '{}' -> output '{}' for shape {:?}",
                    self.input_name, self.output_name, input_shape
                ),
                e,
            )
        })?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| {
                DigitError::inference_error(
                    &self.model_name,
                    &format!("Model produced no output named '{}'", self.output_name),
                    SimpleError::new("Missing output tensor"),
                )
            })?
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                DigitError::inference_error(
                    &self.model_name,
                    &format!("Failed to extract output tensor '{}' as f32", self.output_name),
                    e,
                )
            })?;
        let (output_shape, output_data) = output;

        processor(output_shape, output_data)
    }

    /// Runs the model and returns its output as a `[batch, classes]` matrix.
    pub fn infer_2d(&self, x: &Tensor4D) -> Result<Tensor2D, DigitError> {
        let batch_size = x.shape()[0];
        let input_shape = x.shape().to_vec();
        self.run_inference_with_processor(x, |output_shape, output_data| {
            if output_shape.len() != 2 {
                return Err(DigitError::tensor_operation_error(
                    "output_validation",
                    &[batch_size, 0],
                    &output_shape.iter().map(|&d| d.max(0) as usize).collect::<Vec<_>>(),
                    &format!(
                        "Model '{}' 2D inference: expected 2D output tensor, got {}D",
                        self.model_name,
                        output_shape.len()
                    ),
                    SimpleError::new("Invalid output tensor dimensions"),
                ));
            }

            let num_classes = output_shape[1].max(0) as usize;
            let expected_len = batch_size * num_classes;

            if output_data.len() != expected_len {
                return Err(DigitError::tensor_operation_error(
                    "output_data_validation",
                    &[expected_len],
                    &[output_data.len()],
                    &format!(
                        "Model '{}' 2D inference: output data size mismatch for input shape {:?} -> output shape {:?}",
                        self.model_name, input_shape, output_shape
                    ),
                    SimpleError::new("Output tensor data size mismatch"),
                ));
            }

            let array_view = ArrayView2::from_shape((batch_size, num_classes), output_data)?;
            Ok(array_view.to_owned())
        })
    }
}
