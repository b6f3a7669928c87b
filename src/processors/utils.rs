//! Utility functions for image processing operations.
//!
//! - `image_utils`: Helper functions for basic image operations
//! - `crop`: Square cropping at a fixed position

pub mod crop;
pub mod image_utils;

pub use crop::Crop;
