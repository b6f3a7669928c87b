//! Error types for the prediction pipeline.
//!
//! This module provides the error type returned by every fallible operation in
//! the crate together with helper constructors for attaching context.
//!
//! # Usage
//!
//! ```rust
//! use d4_tta::core::errors::{TtaError, ProcessingStage};
//!
//! // Create a processing error with context
//! let error = TtaError::tensor_operation(
//!     "Failed to pack augmented views into a batch tensor",
//!     std::io::Error::new(std::io::ErrorKind::InvalidData, "Invalid tensor shape")
//! );
//!
//! // Create a configuration error
//! let config_error = TtaError::config_error("Missing required model path");
//! ```

pub mod constructors;
pub mod types;

pub use types::{ImageProcessError, ProcessingStage, SimpleError, TtaError};

/// Convenient result alias for pipeline operations.
pub type TtaResult<T> = Result<T, TtaError>;
