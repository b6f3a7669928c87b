//! # D4 TTA
//!
//! Test-time augmented image classification on ONNX Runtime.
//!
//! Every test image is cut into five square crops (four corners and the
//! center) and each crop is expanded by the eight symmetries of the square
//! (the dihedral group D4), giving 40 views. A probability model scores all
//! views in one batch, the per-view distributions are combined with a
//! geometric mean, and the arg-max class is written to a submission CSV next
//! to two Parquet probability tables.
//!
//! ## Modules
//!
//! * [`core`] - Errors, configuration, batch containers, and the ONNX Runtime engine
//! * [`domain`] - Source images, class labels, and prediction records
//! * [`predictor`] - The ONNX camera-model classifier
//! * [`processors`] - Cropping, D4 symmetries, softmax, and ensembling
//! * [`pipeline`] - Configuration loading, prefetching loader, runner, and writers
//! * [`utils`] - Image loading, label files, and tracing setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use d4_tta::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! init_tracing();
//!
//! let classifier = CameraClassifierBuilder::new()
//!     .model_path("models/resnet50.onnx")
//!     .build()?;
//!
//! let config = TtaConfig::new().with_output_dir("submit");
//! let runner = TtaRunner::new(classifier, config)?;
//! let summary = runner.run(Path::new("data/test"))?;
//!
//! println!("{}", summary.distribution);
//! # Ok(())
//! # }
//! ```
//!
//! Any type implementing [`core::ProbabilityPredictor`] can stand in for the
//! ONNX classifier.

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod predictor;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use d4_tta::prelude::*;
/// ```
///
/// Included items cover a typical run:
/// - Running (`TtaRunner`, `TtaConfig`, `ConfigLoader`, `RunSummary`)
/// - The classifier (`CameraClassifier`, `CameraClassifierBuilder`)
/// - Augmentation and ensembling (`TtaAugmenter`, `D4Transform`, `Ensembling`)
/// - Essential error and result types (`TtaError`, `TtaResult`)
pub mod prelude {
    pub use crate::pipeline::{ConfigLoader, RunSummary, TtaConfig, TtaRunner};

    pub use crate::predictor::{CameraClassifier, CameraClassifierBuilder};

    pub use crate::processors::{D4Transform, Ensembling, TtaAugmenter};

    pub use crate::core::{ProbabilityPredictor, TtaError, TtaResult};

    pub use crate::domain::ClassLabels;
    pub use crate::utils::{init_tracing, load_image};
}
