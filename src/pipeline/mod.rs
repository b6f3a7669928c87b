//! The prediction pipeline.
//!
//! This module ties the pieces of a run together: configuration loading,
//! directory listing with a prefetching loader, the [`TtaRunner`] that scores
//! and aggregates each image, and the writers for the submission CSV and the
//! probability tables.

pub mod config;
pub mod loader;
pub mod naming;
pub mod runner;
pub mod stats;
pub mod writer;

pub use config::{ConfigFormat, ConfigLoader, TtaConfig};
pub use loader::{PrefetchLoader, list_images};
pub use naming::{OutputNames, model_stem, run_name};
pub use runner::{RunSummary, TtaRunner};
pub use stats::PipelineStats;
pub use writer::{PredictionWriter, ProbabilityTable, TABLE_METADATA_KEY};
