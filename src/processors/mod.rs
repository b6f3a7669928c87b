//! Image and probability processing for test-time augmentation.
//!
//! # Modules
//!
//! * `augment` - Five-crop × D4 view generation
//! * `d4` - The eight symmetries of the square
//! * `ensemble` - Aggregation of per-view probabilities
//! * `softmax` - Logit normalization
//! * `types` - Type definitions used across the processors module
//! * `utils` - Cropping helpers

pub mod augment;
pub mod d4;
pub mod ensemble;
pub mod softmax;
pub mod types;
pub mod utils;

pub use augment::{TtaAugmenter, five_crop_positions};
pub use d4::D4Transform;
pub use ensemble::{Ensembling, aggregate, argmax, geometric_mean};
pub use softmax::{softmax, softmax_rows};
pub use types::*;
pub use utils::Crop;
