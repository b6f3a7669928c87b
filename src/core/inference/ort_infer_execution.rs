use super::*;
use crate::core::errors::SimpleError;
use ndarray::ArrayView2;
use ort::value::TensorRef;

impl OrtInfer {
    /// Returns the configured or discovered output tensor name.
    fn get_output_name(&self) -> Result<String, TtaError> {
        if let Some(ref name) = self.output_name {
            return Ok(name.clone());
        }
        let session = self
            .session
            .lock()
            .map_err(|_| TtaError::invalid_input("Failed to acquire session lock"))?;
        session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                TtaError::invalid_input(
                    "No outputs available in session - model may be invalid or corrupted",
                )
            })
    }

    /// Returns the model name associated with this inference engine.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub(super) fn run_2d(&self, x: &Tensor4D, aux: Option<&Tensor2D>) -> Result<Tensor2D, TtaError> {
        let batch_size = x.shape()[0];
        let input_shape = x.shape().to_vec();

        let output_name = self.get_output_name().map_err(|e| {
            TtaError::inference_error(
                &self.model_name,
                &format!(
                    "Failed to get output name for model at '{}'",
                    self.model_path.display()
                ),
                e,
            )
        })?;

        let input_tensor = TensorRef::from_array_view(x.view()).map_err(|e| {
            TtaError::inference_error(
                &self.model_name,
                &format!("Failed to convert input tensor with shape {:?}", input_shape),
                e,
            )
        })?;

        let mut session_guard = self.session.lock().map_err(|_| {
            TtaError::inference_error(
                &self.model_name,
                "Failed to acquire session lock",
                SimpleError::new("Session lock acquisition failed"),
            )
        })?;

        let outputs = match (self.aux_input_name.as_deref(), aux) {
            (Some(aux_name), Some(aux)) => {
                let aux_tensor = TensorRef::from_array_view(aux.view()).map_err(|e| {
                    TtaError::inference_error(
                        &self.model_name,
                        &format!("Failed to convert auxiliary tensor with shape {:?}", aux.shape()),
                        e,
                    )
                })?;
                let inputs = ort::inputs![
                    self.input_name.as_str() => input_tensor,
                    aux_name => aux_tensor
                ];
                session_guard.run(inputs)
            }
            _ => session_guard.run(ort::inputs![self.input_name.as_str() => input_tensor]),
        }
        .map_err(|e| {
            TtaError::inference_error(
                &self.model_name,
                &format!(
                    "ONNX Runtime inference failed with input '{}' -> output '{}'",
                    self.input_name, output_name
                ),
                e,
            )
        })?;

        let (output_shape, output_data) = outputs[output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                TtaError::inference_error(
                    &self.model_name,
                    &format!("Failed to extract output tensor '{}' as f32", output_name),
                    e,
                )
            })?;

        if output_shape.len() != 2 {
            return Err(TtaError::tensor_operation(
                "output_validation",
                SimpleError::new(format!(
                    "Model '{}': expected 2D output tensor, got shape {:?}",
                    self.model_name, output_shape
                )),
            ));
        }

        let num_classes = output_shape[1] as usize;
        let expected_len = batch_size * num_classes;
        if output_data.len() != expected_len {
            return Err(TtaError::tensor_shape_mismatch(
                "output_data_validation",
                &[expected_len],
                &[output_data.len()],
            ));
        }

        let array_view = ArrayView2::from_shape((batch_size, num_classes), output_data)?;
        Ok(array_view.to_owned())
    }
}
