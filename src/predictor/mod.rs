//! Predictor implementations.
//!
//! The pipeline depends only on [`ProbabilityPredictor`](crate::core::ProbabilityPredictor);
//! this module provides the ONNX-backed implementation and its builder.

/// Camera model classifier scoring augmented crops
pub mod camera_classifier;

pub use camera_classifier::{CameraClassifier, CameraClassifierBuilder, CameraClassifierConfig};
