//! Reduction of per-view probability rows to one per-image vector.

use crate::core::batch::Tensor2D;
use crate::core::errors::TtaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy for combining the probability rows of one image.
///
/// Parsing an unknown name fails, so an unsupported strategy is rejected when
/// the configuration is read rather than after images have been processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ensembling {
    /// Elementwise geometric mean followed by renormalization.
    #[default]
    Geometric,
}

impl Ensembling {
    pub fn as_str(&self) -> &'static str {
        match self {
            Ensembling::Geometric => "geometric",
        }
    }
}

impl fmt::Display for Ensembling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ensembling {
    type Err = TtaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "geometric" => Ok(Ensembling::Geometric),
            _ => Err(TtaError::unsupported_ensembling(s)),
        }
    }
}

impl TryFrom<String> for Ensembling {
    type Error = TtaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ensembling> for String {
    fn from(value: Ensembling) -> Self {
        value.as_str().to_string()
    }
}

fn validate(probs: &Tensor2D) -> Result<(), TtaError> {
    if probs.nrows() == 0 || probs.ncols() == 0 {
        return Err(TtaError::invalid_input(format!(
            "cannot aggregate a probability matrix of shape {:?}",
            probs.shape()
        )));
    }
    if let Some(bad) = probs.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(TtaError::invalid_input(format!(
            "probabilities must be finite and non-negative, found {bad}"
        )));
    }
    if let Some(row) = probs.rows().into_iter().position(|row| row.sum() == 0.0) {
        return Err(TtaError::invalid_input(format!(
            "probability row {row} has no mass"
        )));
    }
    Ok(())
}

/// Elementwise geometric mean of the rows of `probs`, renormalized to sum to 1.
///
/// Computed as `exp(mean(ln p))` per column; a column containing a zero yields a
/// zero component. Identical rows are returned unchanged.
///
/// # Errors
///
/// `TtaError::InvalidInput` for an empty matrix, a negative or non-finite entry,
/// or a row without mass. An aggregation error if the rows share no class with
/// non-zero probability.
pub fn geometric_mean(probs: &Tensor2D) -> Result<Vec<f32>, TtaError> {
    validate(probs)?;
    let first = probs.row(0);
    if probs.rows().into_iter().all(|row| row == first) {
        return Ok(first.to_vec());
    }
    let n = probs.nrows() as f64;

    let means: Vec<f64> = probs
        .columns()
        .into_iter()
        .map(|column| {
            if column.iter().any(|&p| p == 0.0) {
                0.0
            } else {
                (column.iter().map(|&p| (p as f64).ln()).sum::<f64>() / n).exp()
            }
        })
        .collect();

    let total: f64 = means.iter().sum();
    if total == 0.0 {
        return Err(TtaError::aggregation(
            "every class has zero probability in at least one view",
        ));
    }
    Ok(means.into_iter().map(|m| (m / total) as f32).collect())
}

/// Combines the probability rows of one image.
///
/// A single row is returned unchanged.
pub fn aggregate(probs: &Tensor2D, ensembling: Ensembling) -> Result<Vec<f32>, TtaError> {
    validate(probs)?;
    if probs.nrows() == 1 {
        return Ok(probs.row(0).to_vec());
    }
    match ensembling {
        Ensembling::Geometric => geometric_mean(probs),
    }
}

/// Index of the largest value; the first one wins on ties. NaN values are skipped.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}
