//! Output file naming.

use crate::processors::Ensembling;
use std::path::{Path, PathBuf};

/// Name that labels every artifact of a run.
///
/// The TTA suffix keeps augmented and plain runs of the same weights apart.
pub fn run_name(model_name: &str, use_tta: bool, ensembling: Ensembling) -> String {
    if use_tta {
        format!("{model_name}_tta_{ensembling}")
    } else {
        model_name.to_string()
    }
}

/// Stem of a weights file, e.g. `resnet_best` for `weights/resnet_best.onnx`.
pub fn model_stem(weights: &Path) -> String {
    weights
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string())
}

/// Paths of the files written by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub run_name: String,
    pub submission_csv: PathBuf,
    pub image_probabilities: PathBuf,
    pub view_probabilities: PathBuf,
}

impl OutputNames {
    pub fn new(output_dir: &Path, run_name: impl Into<String>) -> Self {
        let run_name = run_name.into();
        Self {
            submission_csv: output_dir.join(format!("submission_{run_name}.csv")),
            image_probabilities: output_dir.join(format!("{run_name}_test_pr.parquet")),
            view_probabilities: output_dir.join(format!("{run_name}_test_pr_with_tta.parquet")),
            run_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tta_runs_carry_the_strategy() {
        let stem = model_stem(Path::new("weights/resnet_best.onnx"));
        assert_eq!(stem, "resnet_best");
        assert_eq!(
            run_name(&stem, true, Ensembling::Geometric),
            "resnet_best_tta_geometric"
        );
        assert_eq!(run_name(&stem, false, Ensembling::Geometric), "resnet_best");
    }

    #[test]
    fn output_paths_follow_run_name() {
        let names = OutputNames::new(Path::new("submit"), "m_tta_geometric");
        assert_eq!(
            names.submission_csv,
            PathBuf::from("submit/submission_m_tta_geometric.csv")
        );
        assert_eq!(
            names.image_probabilities,
            PathBuf::from("submit/m_tta_geometric_test_pr.parquet")
        );
        assert_eq!(
            names.view_probabilities,
            PathBuf::from("submit/m_tta_geometric_test_pr_with_tta.parquet")
        );
    }
}
