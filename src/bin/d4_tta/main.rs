//! `d4-tta`: predict a directory of test images with five-crop x D4 TTA.
//!
//! Usage:
//! ```text
//! d4-tta --model-path models/resnet50.onnx --test-dir data/test --output-dir submit
//! ```

mod cli;

use clap::Parser;
use cli::Args;
use d4_tta::core::config::OrtExecutionProvider;
use d4_tta::pipeline::{ConfigLoader, RunSummary, TtaConfig, TtaRunner};
use d4_tta::predictor::CameraClassifier;
use d4_tta::processors::Ensembling;
use d4_tta::utils::init_tracing;
use std::error::Error;
use std::process::ExitCode;
use tracing::{error, info};

/// Layers the command-line flags over the loaded configuration.
fn build_config(args: &Args) -> Result<TtaConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => TtaConfig::default(),
    };

    if args.no_tta {
        config.use_tta = false;
    }
    if let Some(name) = &args.ensembling {
        config.ensembling = name.parse::<Ensembling>()?;
    }
    if let Some(crop_size) = args.crop_size {
        config.crop_size = crop_size;
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(workers) = args.workers {
        config.parallel.num_workers = workers;
    }
    if let Some(labels) = &args.labels {
        config.labels_path = Some(labels.clone());
    }

    let providers = OrtExecutionProvider::parse_device(&args.device).ok_or_else(|| {
        format!(
            "Unsupported device: {}. Supported devices: cpu, cuda, cuda:N",
            args.device
        )
    })?;
    config.classifier.session = config
        .parallel
        .onnx_threading
        .apply_to(config.classifier.session.clone())
        .with_execution_providers(providers);

    Ok(config)
}

fn run(args: &Args) -> Result<RunSummary, Box<dyn Error>> {
    let config = build_config(args)?;

    let classifier = CameraClassifier::new(config.classifier.clone(), &args.model_path)?;
    let runner = TtaRunner::new(classifier, config)?;
    info!("run name: {}", runner.run_name());

    Ok(runner.run(&args.test_dir)?)
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(summary) => {
            info!(
                "submission written to {}",
                summary.outputs.submission_csv.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            let mut source = err.source();
            while let Some(cause) = source {
                error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
