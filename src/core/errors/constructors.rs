//! Error constructor utilities.
//!
//! Ergonomic helpers for creating [`TtaError`] values with consistent context
//! and error chaining.

use super::types::{ImageProcessError, ProcessingStage, SimpleError, TtaError};
use crate::core::config::ConfigError;
use std::path::Path;

impl TtaError {
    /// Creates a TtaError for tensor operations.
    ///
    /// # Arguments
    ///
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn tensor_operation(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::TensorOperation,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a TtaError for a tensor shape mismatch, keeping both shapes in the message.
    pub fn tensor_shape_mismatch(operation: &str, expected: &[usize], actual: &[usize]) -> Self {
        Self::tensor_operation(
            operation,
            SimpleError::new(format!(
                "expected shape {:?}, got {:?}",
                expected, actual
            )),
        )
    }

    /// Creates a TtaError for augmentation failures.
    pub fn augmentation(
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind: ProcessingStage::Augmentation,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a TtaError for aggregation failures.
    pub fn aggregation(context: &str) -> Self {
        Self::Processing {
            kind: ProcessingStage::Aggregation,
            context: context.to_string(),
            source: Box::new(SimpleError::new(context)),
        }
    }

    /// Creates a TtaError for output failures.
    pub fn output(context: &str, error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Processing {
            kind: ProcessingStage::Output,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a TtaError for a failed model invocation.
    ///
    /// # Arguments
    ///
    /// * `model_name` - Name of the model that failed.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying runtime error.
    pub fn inference_error(
        model_name: &str,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a TtaError for a model file that could not be turned into a session.
    ///
    /// The optional suggestion is appended to the context.
    pub fn model_load_error(
        path: &Path,
        reason: &str,
        suggestion: Option<&str>,
        error: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        let context = match suggestion {
            Some(s) => format!("{reason} ({s})"),
            None => reason.to_string(),
        };
        Self::ModelLoad {
            path: path.to_path_buf(),
            context,
            source: error.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an error for an unknown ensembling strategy.
    pub fn unsupported_ensembling(name: impl Into<String>) -> Self {
        Self::UnsupportedEnsembling { name: name.into() }
    }

    /// Maps a cropping failure onto the public error type.
    ///
    /// `CropSizeTooLarge` keeps its sizes so the message names both the crop and the image.
    pub fn from_crop_error(
        error: ImageProcessError,
        crop_size: u32,
        height: u32,
        width: u32,
    ) -> Self {
        match error {
            ImageProcessError::CropSizeTooLarge => Self::CropSizeTooLarge {
                crop_size,
                height,
                width,
            },
            other => Self::augmentation(
                &format!("cropping {crop_size}x{crop_size} from {height}x{width} image"),
                other,
            ),
        }
    }
}

impl From<ConfigError> for TtaError {
    fn from(error: ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_too_large_keeps_sizes() {
        let err = TtaError::from_crop_error(ImageProcessError::CropSizeTooLarge, 600, 512, 512);
        assert!(matches!(
            err,
            TtaError::CropSizeTooLarge {
                crop_size: 600,
                height: 512,
                width: 512
            }
        ));
        assert_eq!(
            err.to_string(),
            "requested crop size 600 is bigger than input size (512, 512)"
        );
    }

    #[test]
    fn other_crop_errors_become_augmentation_failures() {
        let err = TtaError::from_crop_error(ImageProcessError::CropOutOfBounds, 10, 5, 5);
        assert!(matches!(
            err,
            TtaError::Processing {
                kind: ProcessingStage::Augmentation,
                ..
            }
        ));
    }

    #[test]
    fn unsupported_ensembling_message() {
        let err = TtaError::unsupported_ensembling("arithmetic");
        assert!(err.to_string().contains("'arithmetic' is not implemented"));
    }

    #[test]
    fn model_load_error_appends_suggestion() {
        let err = TtaError::model_load_error(
            Path::new("weights/model.onnx"),
            "failed to create ONNX session",
            Some("verify model file exists"),
            None::<std::io::Error>,
        );
        let message = err.to_string();
        assert!(message.contains("weights/model.onnx"));
        assert!(message.contains("verify model file exists"));
    }

    #[test]
    fn config_error_converts() {
        let err: TtaError = ConfigError::InvalidConfig {
            message: "crop_size must be positive".to_string(),
        }
        .into();
        assert!(err.to_string().contains("crop_size must be positive"));
    }
}
