//! ONNX Runtime configuration types.

use serde::{Deserialize, Serialize};

/// Graph optimization levels for ONNX Runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrtGraphOptimizationLevel {
    /// Disable all optimizations.
    DisableAll,
    /// Enable basic optimizations.
    #[default]
    Level1,
    /// Enable extended optimizations.
    Level2,
    /// Enable all optimizations.
    Level3,
}

/// Execution providers for ONNX Runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum OrtExecutionProvider {
    /// CPU execution provider (always available)
    #[default]
    CPU,
    /// NVIDIA CUDA execution provider
    CUDA {
        /// CUDA device ID (default: 0)
        device_id: Option<i32>,
        /// Memory limit in bytes (optional)
        gpu_mem_limit: Option<usize>,
    },
}

impl OrtExecutionProvider {
    /// Parses a device string such as `cpu`, `cuda` or `cuda:1`.
    ///
    /// CUDA devices are followed by a CPU fallback.
    pub fn parse_device(device: &str) -> Option<Vec<Self>> {
        let device = device.trim().to_lowercase();
        if device == "cpu" {
            return Some(vec![Self::CPU]);
        }
        let device_id = if device == "cuda" {
            0
        } else {
            device.strip_prefix("cuda:")?.parse().ok()?
        };
        Some(vec![
            Self::CUDA {
                device_id: Some(device_id),
                gpu_mem_limit: None,
            },
            Self::CPU,
        ])
    }
}

/// Configuration for ONNX Runtime sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrtSessionConfig {
    /// Number of threads used to parallelize execution within nodes
    #[serde(default)]
    pub intra_threads: Option<usize>,
    /// Number of threads used to parallelize execution across nodes
    #[serde(default)]
    pub inter_threads: Option<usize>,
    /// Enable parallel execution mode
    #[serde(default)]
    pub parallel_execution: Option<bool>,
    /// Graph optimization level
    #[serde(default)]
    pub optimization_level: Option<OrtGraphOptimizationLevel>,
    /// Execution providers in order of preference
    #[serde(default)]
    pub execution_providers: Option<Vec<OrtExecutionProvider>>,
    /// Enable memory pattern optimization
    #[serde(default)]
    pub enable_mem_pattern: Option<bool>,
}

impl OrtSessionConfig {
    /// Creates a new OrtSessionConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of intra-op threads.
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = Some(threads);
        self
    }

    /// Sets the number of inter-op threads.
    pub fn with_inter_threads(mut self, threads: usize) -> Self {
        self.inter_threads = Some(threads);
        self
    }

    /// Enables or disables parallel execution.
    pub fn with_parallel_execution(mut self, enabled: bool) -> Self {
        self.parallel_execution = Some(enabled);
        self
    }

    /// Sets the graph optimization level.
    pub fn with_optimization_level(mut self, level: OrtGraphOptimizationLevel) -> Self {
        self.optimization_level = Some(level);
        self
    }

    /// Sets the execution providers.
    ///
    /// # Arguments
    ///
    /// * `providers` - Vector of execution providers in order of preference.
    pub fn with_execution_providers(mut self, providers: Vec<OrtExecutionProvider>) -> Self {
        self.execution_providers = Some(providers);
        self
    }

    /// Enables or disables memory pattern optimization.
    pub fn with_memory_pattern(mut self, enable: bool) -> Self {
        self.enable_mem_pattern = Some(enable);
        self
    }

    /// Gets the effective graph optimization level.
    pub fn get_optimization_level(&self) -> OrtGraphOptimizationLevel {
        self.optimization_level.unwrap_or_default()
    }

    /// Gets the execution providers, defaulting to CPU.
    pub fn get_execution_providers(&self) -> Vec<OrtExecutionProvider> {
        self.execution_providers
            .clone()
            .unwrap_or_else(|| vec![OrtExecutionProvider::CPU])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ort_session_config_builder() {
        let config = OrtSessionConfig::new()
            .with_intra_threads(4)
            .with_inter_threads(2)
            .with_optimization_level(OrtGraphOptimizationLevel::Level2)
            .with_memory_pattern(true);

        assert_eq!(config.intra_threads, Some(4));
        assert_eq!(config.inter_threads, Some(2));
        assert_eq!(
            config.get_optimization_level(),
            OrtGraphOptimizationLevel::Level2
        );
        assert_eq!(config.enable_mem_pattern, Some(true));
    }

    #[test]
    fn test_defaults() {
        let config = OrtSessionConfig::new();
        assert_eq!(
            config.get_optimization_level(),
            OrtGraphOptimizationLevel::Level1
        );
        assert_eq!(
            config.get_execution_providers(),
            vec![OrtExecutionProvider::CPU]
        );
    }

    #[test]
    fn test_parse_device() {
        assert_eq!(
            OrtExecutionProvider::parse_device("CPU"),
            Some(vec![OrtExecutionProvider::CPU])
        );
        assert_eq!(
            OrtExecutionProvider::parse_device("cuda:1"),
            Some(vec![
                OrtExecutionProvider::CUDA {
                    device_id: Some(1),
                    gpu_mem_limit: None
                },
                OrtExecutionProvider::CPU
            ])
        );
        assert!(OrtExecutionProvider::parse_device("tpu").is_none());
        assert!(OrtExecutionProvider::parse_device("cuda:x").is_none());
    }

    #[test]
    fn test_session_config_from_json() {
        let config: OrtSessionConfig = serde_json::from_str(
            r#"{"intra_threads": 2, "execution_providers": ["CPU"]}"#,
        )
        .unwrap();
        assert_eq!(config.intra_threads, Some(2));
        assert_eq!(
            config.execution_providers,
            Some(vec![OrtExecutionProvider::CPU])
        );
    }
}
