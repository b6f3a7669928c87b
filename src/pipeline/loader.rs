//! Directory listing and the prefetching decode/augment stage.

use crate::core::batch::AugmentedBatch;
use crate::core::config::ParallelPolicy;
use crate::core::errors::TtaError;
use crate::domain::SourceImage;
use crate::processors::TtaAugmenter;
use crossbeam_channel::{Receiver, bounded};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Lists the files in `dir` whose extension matches `extension` (case-insensitive),
/// sorted by path.
///
/// # Errors
///
/// `TtaError::InvalidInput` if `dir` is not a readable directory.
pub fn list_images(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, TtaError> {
    if !dir.is_dir() {
        return Err(TtaError::invalid_input(format!(
            "test directory '{}' does not exist or is not a directory",
            dir.display()
        )));
    }
    let extension = extension.trim_start_matches('.');

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn load_and_augment(path: &Path, augmenter: &TtaAugmenter) -> Result<AugmentedBatch, TtaError> {
    let source = SourceImage::load(path)?;
    augmenter.augment(&source)
}

/// Decodes and augments images on a worker pool ahead of the consumer.
///
/// Batches come out in the order of the input paths. The first failure is
/// yielded as an error and ends the stream.
pub struct PrefetchLoader {
    receiver: Option<Receiver<Result<AugmentedBatch, TtaError>>>,
    handle: Option<JoinHandle<()>>,
    remaining: usize,
}

impl PrefetchLoader {
    /// Starts the producer thread.
    ///
    /// # Errors
    ///
    /// `TtaError::ConfigError` if the worker pool cannot be built.
    pub fn spawn(
        paths: Vec<PathBuf>,
        augmenter: TtaAugmenter,
        policy: &ParallelPolicy,
    ) -> Result<Self, TtaError> {
        let workers = policy.num_workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("tta-loader-{i}"))
            .build()
            .map_err(|e| TtaError::config_error(format!("failed to build loader pool: {e}")))?;

        let (tx, rx) = bounded(policy.prefetch.max(1));
        let remaining = paths.len();

        let handle = thread::spawn(move || {
            for window in paths.chunks(workers) {
                let results: Vec<Result<AugmentedBatch, TtaError>> = pool.install(|| {
                    window
                        .par_iter()
                        .map(|path| load_and_augment(path, &augmenter))
                        .collect()
                });
                for result in results {
                    let failed = result.is_err();
                    if tx.send(result).is_err() {
                        debug!("loader receiver dropped, stopping producer");
                        return;
                    }
                    if failed {
                        return;
                    }
                }
            }
        });

        Ok(Self {
            receiver: Some(rx),
            handle: Some(handle),
            remaining,
        })
    }

    /// Number of images not yet yielded.
    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl Iterator for PrefetchLoader {
    type Item = Result<AugmentedBatch, TtaError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.receiver.as_ref()?.recv().ok();
        match &item {
            Some(Ok(_)) => self.remaining = self.remaining.saturating_sub(1),
            Some(Err(_)) | None => {
                self.receiver = None;
                self.remaining = 0;
            }
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl Drop for PrefetchLoader {
    fn drop(&mut self) {
        // The producer exits once its next send fails.
        self.receiver.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
