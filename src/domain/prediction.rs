//! Per-image decisions and their class distribution.

use super::labels::ClassLabels;
use crate::core::batch::Tensor2D;
use std::fmt;

/// The outcome for one test image.
#[derive(Debug, Clone)]
pub struct PredictionRecord {
    /// File name of the source image.
    pub file_name: String,
    /// Index of the predicted class.
    pub class_index: usize,
    /// Name of the predicted class.
    pub class_label: String,
    /// Aggregated probability vector, one entry per class.
    pub probabilities: Vec<f32>,
    /// Probability rows of every augmented view, in view order.
    pub view_probabilities: Tensor2D,
}

impl PredictionRecord {
    /// Row identifiers for the per-view probability table: `<file name>_tta<i>`.
    pub fn view_names(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.view_probabilities.nrows()).map(move |i| format!("{}_tta{}", self.file_name, i))
    }
}

/// Number of images assigned to each class.
#[derive(Debug, Clone)]
pub struct ClassDistribution {
    labels: ClassLabels,
    counts: Vec<usize>,
}

impl ClassDistribution {
    pub fn new(labels: ClassLabels) -> Self {
        let counts = vec![0; labels.len()];
        Self { labels, counts }
    }

    /// Counts one prediction of class `index`; out-of-range indices are ignored.
    pub fn record(&mut self, index: usize) {
        if let Some(count) = self.counts.get_mut(index) {
            *count += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn count(&self, index: usize) -> usize {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// `(label, count, fraction)` for every class in label order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, usize, f64)> + '_ {
        let total = self.total();
        self.labels.iter().zip(&self.counts).map(move |(label, &count)| {
            let fraction = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            };
            (label, count, fraction)
        })
    }
}

impl fmt::Display for ClassDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.labels.iter().map(str::len).max().unwrap_or(0);
        for (label, count, fraction) in self.entries() {
            writeln!(f, "{label:<width$} {count:>6} {:>6.2}%", fraction * 100.0)?;
        }
        Ok(())
    }
}
