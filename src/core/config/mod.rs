//! Configuration management.
//!
//! This module provides configuration types, validation traits, and ONNX
//! Runtime session settings shared by the predictor and the pipeline.

pub mod errors;
pub mod onnx;
pub mod parallel;

pub use errors::{ConfigError, ConfigValidator, ConfigValidatorExt};
pub use onnx::*;
pub use parallel::{OnnxThreadingConfig, ParallelPolicy};
