//! Domain types for camera-model prediction.
//!
//! - `image`: decoded test images and the manipulated flag
//! - `labels`: the ordered class names the classifier emits
//! - `prediction`: per-image decisions and their distribution

pub mod image;
pub mod labels;
pub mod prediction;

pub use image::{SourceImage, is_manipulated};
pub use labels::{ClassLabels, DEFAULT_CAMERA_CLASSES};
pub use prediction::{ClassDistribution, PredictionRecord};
