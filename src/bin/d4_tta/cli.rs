//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

/// Predict camera models for a directory of test images with five-crop x D4 TTA.
#[derive(Parser, Debug)]
#[command(name = "d4-tta")]
#[command(version, about = "Test-time augmented classification with geometric-mean ensembling")]
pub struct Args {
    /// Path to the ONNX model file
    #[arg(short, long)]
    pub model_path: PathBuf,

    /// Directory holding the test images
    #[arg(short, long)]
    pub test_dir: PathBuf,

    /// Score a single center crop per image instead of 40 views
    #[arg(long)]
    pub no_tta: bool,

    /// How per-view probabilities are combined
    #[arg(long)]
    pub ensembling: Option<String>,

    /// Side of the square crops fed to the model
    #[arg(long)]
    pub crop_size: Option<u32>,

    /// Directory receiving the submission CSV and probability tables
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Number of image decoding workers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Newline-delimited class names, in model output order
    #[arg(long)]
    pub labels: Option<PathBuf>,

    /// TOML or JSON run configuration; flags given here override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Execution device: cpu, cuda or cuda:N
    #[arg(short, long, default_value = "cpu")]
    pub device: String,
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::{CommandFactory, Parser};

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "d4-tta",
            "--model-path",
            "m.onnx",
            "--test-dir",
            "test",
            "--no-tta",
            "--workers",
            "3",
        ])
        .unwrap();
        assert!(args.no_tta);
        assert_eq!(args.workers, Some(3));
        assert_eq!(args.device, "cpu");
        assert!(args.crop_size.is_none());
    }

    #[test]
    fn model_path_is_required() {
        assert!(Args::try_parse_from(["d4-tta", "--test-dir", "test"]).is_err());
    }
}
