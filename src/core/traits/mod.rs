//! Trait definitions for the prediction pipeline.

pub mod standard;

pub use standard::ProbabilityPredictor;
