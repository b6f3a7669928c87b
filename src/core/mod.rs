//! The core module of the prediction pipeline.
//!
//! This module contains the fundamental components shared by every stage:
//! - Batch containers and tensor aliases
//! - Configuration management
//! - Constants used throughout the pipeline
//! - Error handling
//! - ONNX Runtime inference engine integration
//! - The predictor trait
//!
//! It also provides re-exports of commonly used types and functions for convenience.

pub mod batch;
pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;
pub mod traits;

pub use crate::utils::init_tracing;
pub use batch::{AugmentedBatch, AugmentedView, Tensor2D, Tensor4D};
pub use config::{
    ConfigError, ConfigValidator, ConfigValidatorExt, OnnxThreadingConfig, OrtExecutionProvider,
    OrtGraphOptimizationLevel, OrtSessionConfig, ParallelPolicy,
};
pub use constants::*;
pub use errors::{ProcessingStage, TtaError, TtaResult};
pub use inference::OrtInfer;
pub use traits::ProbabilityPredictor;
