//! Core ONNX Runtime inference engine with configurable sessions.

use crate::core::{batch::Tensor2D, batch::Tensor4D, errors::TtaError};
use ort::{session::Session, value::ValueType};
use std::sync::Mutex;

#[path = "ort_infer_builders.rs"]
mod ort_infer_builders;
#[path = "ort_infer_execution.rs"]
mod ort_infer_execution;

/// ONNX Runtime session wrapper feeding an image batch and an optional
/// auxiliary `[N, 1]` batch and returning a `[N, C]` output.
pub struct OrtInfer {
    pub(super) session: Mutex<Session>,
    pub(super) input_name: String,
    pub(super) aux_input_name: Option<String>,
    pub(super) output_name: Option<String>,
    pub(super) model_path: std::path::PathBuf,
    pub(super) model_name: String,
}

impl std::fmt::Debug for OrtInfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtInfer")
            .field("input_name", &self.input_name)
            .field("aux_input_name", &self.aux_input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtInfer {
    /// Attempts to retrieve the primary input tensor shape.
    ///
    /// Returns a vector of dimensions if available. Dynamic dimensions (e.g., -1) are returned as-is.
    pub fn primary_input_shape(&self) -> Option<Vec<i64>> {
        let session_guard = self.session.lock().ok()?;
        let input = session_guard
            .inputs
            .iter()
            .find(|i| i.name == self.input_name)
            .or_else(|| session_guard.inputs.first())?;
        match &input.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }

    /// Runs the model on an image batch alone.
    pub fn infer_2d(&self, x: &Tensor4D) -> Result<Tensor2D, TtaError> {
        self.run_2d(x, None)
    }

    /// Runs the model on an image batch together with the auxiliary scalar batch.
    ///
    /// When no auxiliary input name is configured the auxiliary tensor is ignored.
    pub fn infer_2d_with_aux(&self, x: &Tensor4D, aux: &Tensor2D) -> Result<Tensor2D, TtaError> {
        if aux.nrows() != x.shape()[0] {
            return Err(TtaError::tensor_shape_mismatch(
                "auxiliary input validation",
                &[x.shape()[0], 1],
                aux.shape(),
            ));
        }
        self.run_2d(x, Some(aux))
    }
}
