//! Error types for the test-time augmentation pipeline.
//!
//! This module defines the errors that can occur while loading test images,
//! building augmented batches, running the classifier, aggregating predictions
//! and writing submission artifacts.

use std::path::PathBuf;
use thiserror::Error;

/// Enum representing different stages of processing in the pipeline.
///
/// This enum is used to identify which stage an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred during tensor operations.
    TensorOperation,
    /// Error occurred while cropping or transforming an image.
    Augmentation,
    /// Error occurred while aggregating crop probabilities.
    Aggregation,
    /// Error occurred while writing output artifacts.
    Output,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::TensorOperation => write!(f, "tensor operation"),
            ProcessingStage::Augmentation => write!(f, "augmentation"),
            ProcessingStage::Aggregation => write!(f, "aggregation"),
            ProcessingStage::Output => write!(f, "output"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// Low-level errors raised by pixel cropping helpers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageProcessError {
    /// The crop size has a zero dimension.
    #[error("invalid crop size")]
    InvalidCropSize,
    /// The crop size exceeds the image in at least one dimension.
    #[error("crop size is larger than the image")]
    CropSizeTooLarge,
    /// The crop coordinates do not describe a non-empty rectangle.
    #[error("invalid crop coordinates")]
    InvalidCropCoordinates,
    /// The crop rectangle reaches outside of the image.
    #[error("crop out of bounds")]
    CropOutOfBounds,
}

/// Enum representing the errors that can abort a prediction run.
#[derive(Error, Debug)]
pub enum TtaError {
    /// Error occurred while decoding an image.
    #[error("failed to load image '{}'", path.display())]
    ImageLoad {
        /// Path of the image that failed to decode.
        path: PathBuf,
        /// The decoder error.
        #[source]
        source: image::ImageError,
    },

    /// The decoded image does not have the expected `(height, width, channels)` shape.
    #[error(
        "image '{}' has shape {actual:?}, expected {expected:?}",
        path.display()
    )]
    InvalidImageShape {
        /// Path of the offending image.
        path: PathBuf,
        /// Expected `(height, width, channels)`.
        expected: (u32, u32, u8),
        /// Actual `(height, width, channels)`.
        actual: (u32, u32, u8),
    },

    /// The requested crop is bigger than the input image.
    #[error("requested crop size {crop_size} is bigger than input size ({height}, {width})")]
    CropSizeTooLarge {
        /// Requested square crop side.
        crop_size: u32,
        /// Image height.
        height: u32,
        /// Image width.
        width: u32,
    },

    /// The ensembling strategy is not implemented.
    #[error("ensembling strategy '{name}' is not implemented (supported: geometric)")]
    UnsupportedEnsembling {
        /// The requested strategy name.
        name: String,
    },

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error occurred while running the classifier.
    #[error("inference failed in model '{model_name}': {context}")]
    Inference {
        /// Name of the model that failed.
        model_name: String,
        /// Additional context about the failure.
        context: String,
        /// The underlying runtime error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error occurred while loading a model file.
    #[error("failed to load model '{}': {context}", path.display())]
    ModelLoad {
        /// Path of the model file.
        path: PathBuf,
        /// Additional context, including a suggestion when available.
        context: String,
        /// The underlying runtime error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// Error from the CSV writer.
    #[error("csv")]
    Csv(#[from] csv::Error),

    /// Error from the Parquet writer.
    #[error("parquet")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Error from building Arrow record batches.
    #[error("arrow")]
    Arrow(#[from] arrow_schema::ArrowError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// A plain message error used as the source of wrapped errors.
#[derive(Debug)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new error carrying the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SimpleError {}
