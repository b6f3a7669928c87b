//! Structures and helpers for ONNX Runtime inference.
//!
//! The engine owns a single session; it is driven from one thread at a time by
//! the prediction loop.

pub mod ort_infer;

pub use ort_infer::OrtInfer;
