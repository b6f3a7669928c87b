//! The predictor seam between augmentation and aggregation.

use crate::core::batch::{Tensor2D, Tensor4D};
use crate::core::errors::TtaError;

/// A model that scores a batch of augmented views.
///
/// Implementations receive an NHWC image tensor of raw `0..=255` values and a
/// `[N, 1]` tensor carrying the manipulated flag, and must return an `[N, C]`
/// matrix of non-negative rows summing to 1. The pipeline validates the row
/// count against the batch and the column count against the class labels.
pub trait ProbabilityPredictor {
    /// Returns per-view class probabilities.
    fn predict_probabilities(
        &self,
        images: &Tensor4D,
        manipulated: &Tensor2D,
    ) -> Result<Tensor2D, TtaError>;

    /// Returns the name used to label this predictor's outputs.
    fn model_name(&self) -> &str;
}

impl<P: ProbabilityPredictor + ?Sized> ProbabilityPredictor for &P {
    fn predict_probabilities(
        &self,
        images: &Tensor4D,
        manipulated: &Tensor2D,
    ) -> Result<Tensor2D, TtaError> {
        (**self).predict_probabilities(images, manipulated)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

impl<P: ProbabilityPredictor + ?Sized> ProbabilityPredictor for Box<P> {
    fn predict_probabilities(
        &self,
        images: &Tensor4D,
        manipulated: &Tensor2D,
    ) -> Result<Tensor2D, TtaError> {
        (**self).predict_probabilities(images, manipulated)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
