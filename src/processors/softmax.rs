//! Row-wise softmax over classifier logits.

use crate::core::batch::Tensor2D;
use crate::core::errors::TtaError;
use ndarray::Axis;

/// Converts one row of logits to probabilities.
///
/// The row maximum is subtracted before exponentiation.
///
/// # Errors
///
/// `TtaError::InvalidInput` if any logit is NaN or infinite.
pub fn softmax(logits: &[f32]) -> Result<Vec<f32>, TtaError> {
    if let Some(bad) = logits.iter().find(|v| !v.is_finite()) {
        return Err(TtaError::invalid_input(format!(
            "cannot normalize non-finite logit {bad}"
        )));
    }
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    Ok(exps.into_iter().map(|v| v / sum).collect())
}

/// Applies [`softmax`] to every row of a `[N, C]` matrix in place.
pub fn softmax_rows(matrix: &mut Tensor2D) -> Result<(), TtaError> {
    for mut row in matrix.axis_iter_mut(Axis(0)) {
        let probs = softmax(&row.to_vec())?;
        for (dst, p) in row.iter_mut().zip(probs) {
            *dst = p;
        }
    }
    Ok(())
}
