//! Parallel data loading configuration.

use super::errors::{ConfigError, ConfigValidator};
use crate::core::constants::{DEFAULT_NUM_WORKERS, DEFAULT_PREFETCH};
use serde::{Deserialize, Serialize};

/// Controls the decoding/augmentation worker pool that runs ahead of inference.
///
/// Model inference itself is never parallelized; only image decoding and view
/// generation use these threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallelPolicy {
    /// Number of worker threads decoding and augmenting images.
    /// Default: 7
    #[serde(default = "ParallelPolicy::default_num_workers")]
    pub num_workers: usize,

    /// Number of finished batches buffered ahead of the consumer.
    /// Default: 2
    #[serde(default = "ParallelPolicy::default_prefetch")]
    pub prefetch: usize,

    /// ONNX Runtime threading configuration
    #[serde(default)]
    pub onnx_threading: OnnxThreadingConfig,
}

/// ONNX Runtime threading configuration that's part of the parallel policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnnxThreadingConfig {
    /// Number of threads used to parallelize execution within nodes.
    /// If None, uses ONNX Runtime default.
    #[serde(default)]
    pub intra_threads: Option<usize>,

    /// Number of threads used to parallelize execution across nodes.
    /// If None, uses ONNX Runtime default.
    #[serde(default)]
    pub inter_threads: Option<usize>,
}

impl OnnxThreadingConfig {
    /// Applies the thread counts on top of an existing session configuration.
    pub fn apply_to(
        &self,
        mut config: crate::core::config::OrtSessionConfig,
    ) -> crate::core::config::OrtSessionConfig {
        if let Some(intra) = self.intra_threads {
            config = config.with_intra_threads(intra);
        }
        if let Some(inter) = self.inter_threads {
            config = config.with_inter_threads(inter);
        }
        config
    }
}

impl ParallelPolicy {
    /// Create a new ParallelPolicy with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of worker threads.
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// Set the prefetch depth.
    pub fn with_prefetch(mut self, prefetch: usize) -> Self {
        self.prefetch = prefetch;
        self
    }

    /// Set the ONNX threading configuration.
    pub fn with_onnx_threading(mut self, config: OnnxThreadingConfig) -> Self {
        self.onnx_threading = config;
        self
    }

    fn default_num_workers() -> usize {
        DEFAULT_NUM_WORKERS
    }

    fn default_prefetch() -> usize {
        DEFAULT_PREFETCH
    }
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            num_workers: Self::default_num_workers(),
            prefetch: Self::default_prefetch(),
            onnx_threading: OnnxThreadingConfig::default(),
        }
    }
}

impl ConfigValidator for ParallelPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_thread_count(self.num_workers)?;
        self.validate_positive_usize(self.prefetch, "prefetch")?;
        if let Some(intra) = self.onnx_threading.intra_threads {
            self.validate_thread_count(intra)?;
        }
        if let Some(inter) = self.onnx_threading.inter_threads {
            self.validate_thread_count(inter)?;
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::OrtSessionConfig;

    #[test]
    fn defaults_match_constants() {
        let policy = ParallelPolicy::default();
        assert_eq!(policy.num_workers, 7);
        assert_eq!(policy.prefetch, 2);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn zero_workers_rejected() {
        let policy = ParallelPolicy::new().with_num_workers(0);
        assert!(policy.validate().is_err());
        let policy = ParallelPolicy::new().with_prefetch(0);
        assert!(policy.validate().is_err());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let policy: ParallelPolicy = serde_json::from_str(r#"{"num_workers": 3}"#).unwrap();
        assert_eq!(policy.num_workers, 3);
        assert_eq!(policy.prefetch, 2);
    }

    #[test]
    fn onnx_threading_applies() {
        let threading = OnnxThreadingConfig {
            intra_threads: Some(4),
            inter_threads: None,
        };
        let config = threading.apply_to(OrtSessionConfig::new().with_inter_threads(2));
        assert_eq!(config.intra_threads, Some(4));
        assert_eq!(config.inter_threads, Some(2));
    }
}
