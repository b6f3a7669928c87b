//! The prediction pass: load → score → aggregate → write.

use super::config::TtaConfig;
use super::loader::{PrefetchLoader, list_images};
use super::naming::{OutputNames, run_name};
use super::stats::PipelineStats;
use super::writer::PredictionWriter;
use crate::core::batch::AugmentedBatch;
use crate::core::config::ConfigValidatorExt;
use crate::core::errors::{SimpleError, TtaError};
use crate::core::traits::ProbabilityPredictor;
use crate::domain::{ClassDistribution, ClassLabels, PredictionRecord};
use crate::processors::{TtaAugmenter, aggregate, argmax};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Paths of the written files.
    pub outputs: OutputNames,
    /// Predicted-class counts in label order.
    pub distribution: ClassDistribution,
    /// Timing and volume metrics.
    pub stats: PipelineStats,
}

/// Runs a [`ProbabilityPredictor`] over a directory of test images.
pub struct TtaRunner<P> {
    predictor: P,
    config: TtaConfig,
    labels: ClassLabels,
    augmenter: TtaAugmenter,
}

impl<P: ProbabilityPredictor> TtaRunner<P> {
    /// Validates the configuration and loads the class labels.
    pub fn new(predictor: P, config: TtaConfig) -> Result<Self, TtaError> {
        let config = config.validate_and_wrap()?;
        let labels = config.labels()?;
        let augmenter = config.augmenter()?;
        Ok(Self {
            predictor,
            config,
            labels,
            augmenter,
        })
    }

    /// Replaces the class labels loaded from the configuration.
    pub fn with_labels(mut self, labels: ClassLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn config(&self) -> &TtaConfig {
        &self.config
    }

    pub fn labels(&self) -> &ClassLabels {
        &self.labels
    }

    /// Name labelling this run's outputs.
    pub fn run_name(&self) -> String {
        run_name(
            self.predictor.model_name(),
            self.config.use_tta,
            self.config.ensembling,
        )
    }

    /// Scores one augmented image and reduces it to a decision.
    pub fn predict_batch(&self, batch: &AugmentedBatch) -> Result<PredictionRecord, TtaError> {
        let images = batch.images_tensor()?;
        let manipulated = batch.manipulated_tensor();
        let probabilities = self.predictor.predict_probabilities(&images, &manipulated)?;

        let expected = [batch.len(), self.labels.len()];
        if probabilities.shape() != expected {
            return Err(TtaError::inference_error(
                self.predictor.model_name(),
                &format!("scoring '{}'", batch.file_name),
                SimpleError::new(format!(
                    "expected probabilities of shape {:?}, got {:?}",
                    expected,
                    probabilities.shape()
                )),
            ));
        }

        let aggregated = aggregate(&probabilities, self.config.ensembling)?;
        let class_index = argmax(&aggregated).ok_or_else(|| {
            TtaError::aggregation(&format!("no finite probability for '{}'", batch.file_name))
        })?;
        let class_label = self
            .labels
            .name(class_index)
            .ok_or_else(|| TtaError::aggregation(&format!("class index {class_index} has no label")))?
            .to_string();

        Ok(PredictionRecord {
            file_name: batch.file_name.clone(),
            class_index,
            class_label,
            probabilities: aggregated,
            view_probabilities: probabilities,
        })
    }

    /// Predicts every matching image in `test_dir` and writes the outputs.
    ///
    /// # Errors
    ///
    /// Any failure aborts the run. An empty directory is `TtaError::InvalidInput`.
    pub fn run(&self, test_dir: &Path) -> Result<RunSummary, TtaError> {
        if self.augmenter.use_tta() {
            info!(
                "Predicting with TTA: five crops x D4 ({} views per image, {} ensembling)",
                self.augmenter.views_per_image(),
                self.config.ensembling
            );
        } else {
            info!("Predicting without TTA");
        }

        let paths = list_images(test_dir, &self.config.image_extension)?;
        if paths.is_empty() {
            return Err(TtaError::invalid_input(format!(
                "no '.{}' images found in '{}'",
                self.config.image_extension,
                test_dir.display()
            )));
        }
        info!("found {} test images in {}", paths.len(), test_dir.display());

        let names = OutputNames::new(&self.config.output_dir, self.run_name());
        let mut writer =
            PredictionWriter::create(&self.config.output_dir, names, self.labels.clone())?;
        let mut distribution = ClassDistribution::new(self.labels.clone());
        let mut stats = PipelineStats::new();

        let mut loader = PrefetchLoader::spawn(paths, self.augmenter, &self.config.parallel)?;
        loop {
            let waited = Instant::now();
            let Some(batch) = loader.next() else { break };
            stats.record_wait(waited.elapsed());
            let batch = batch?;

            let started = Instant::now();
            let record = self.predict_batch(&batch)?;
            stats.record_image(batch.len(), started.elapsed());
            debug!("{} -> {}", record.file_name, record.class_label);

            distribution.record(record.class_index);
            writer.append(&record)?;
        }

        let outputs = writer.finish()?;
        info!("Test set predictions distribution:\n{}", distribution);
        info!("{}", stats);

        Ok(RunSummary {
            outputs,
            distribution,
            stats,
        })
    }
}
