//! Run configuration and configuration file loading.
//!
//! [`TtaConfig`] is read from TOML or JSON through [`ConfigLoader`]; every
//! field is optional in the file and falls back to its default.

use crate::core::config::{ConfigError, ConfigValidator, ParallelPolicy};
use crate::core::constants::{
    DEFAULT_CROP_SIZE, DEFAULT_IMAGE_EXTENSION, DEFAULT_IMAGE_SIZE, DEFAULT_OUTPUT_DIR,
};
use crate::core::TtaError;
use crate::domain::ClassLabels;
use crate::predictor::CameraClassifierConfig;
use crate::processors::{Ensembling, TtaAugmenter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for one prediction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtaConfig {
    /// Expand each image into five crops × eight symmetries.
    pub use_tta: bool,
    /// How per-view probabilities are combined.
    pub ensembling: Ensembling,
    /// Side of the square crops fed to the model.
    pub crop_size: u32,
    /// Side every test image must have.
    pub image_size: u32,
    /// Extension of the files picked up from the test directory, without the dot.
    pub image_extension: String,
    /// Directory receiving the CSV and the probability tables.
    pub output_dir: PathBuf,
    /// Decoding workers and prefetch depth.
    #[serde(flatten)]
    pub parallel: ParallelPolicy,
    /// Newline-delimited class names; the ten camera models when unset.
    pub labels_path: Option<PathBuf>,
    /// Options for the ONNX classifier.
    pub classifier: CameraClassifierConfig,
}

impl Default for TtaConfig {
    fn default() -> Self {
        Self {
            use_tta: true,
            ensembling: Ensembling::Geometric,
            crop_size: DEFAULT_CROP_SIZE,
            image_size: DEFAULT_IMAGE_SIZE,
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            parallel: ParallelPolicy::default(),
            labels_path: None,
            classifier: CameraClassifierConfig::default(),
        }
    }
}

impl TtaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tta(mut self, use_tta: bool) -> Self {
        self.use_tta = use_tta;
        self
    }

    pub fn with_ensembling(mut self, ensembling: Ensembling) -> Self {
        self.ensembling = ensembling;
        self
    }

    pub fn with_crop_size(mut self, crop_size: u32) -> Self {
        self.crop_size = crop_size;
        self
    }

    pub fn with_image_size(mut self, image_size: u32) -> Self {
        self.image_size = image_size;
        self
    }

    pub fn with_image_extension(mut self, extension: impl Into<String>) -> Self {
        self.image_extension = extension.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_parallel(mut self, parallel: ParallelPolicy) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_labels_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.labels_path = Some(path.into());
        self
    }

    pub fn with_classifier(mut self, classifier: CameraClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// Loads the configured class labels.
    pub fn labels(&self) -> Result<ClassLabels, TtaError> {
        match &self.labels_path {
            Some(path) => ClassLabels::from_file(path),
            None => Ok(ClassLabels::default()),
        }
    }

    /// Builds the augmenter described by this configuration.
    pub fn augmenter(&self) -> Result<TtaAugmenter, TtaError> {
        TtaAugmenter::new(self.image_size, self.crop_size, self.use_tta)
    }
}

impl ConfigValidator for TtaConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_image_dimensions(self.image_size, self.image_size)?;
        self.validate_image_dimensions(self.crop_size, self.crop_size)?;
        if self.crop_size > self.image_size {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "crop size {} is bigger than image size {}",
                    self.crop_size, self.image_size
                ),
            });
        }
        self.validate_non_empty(&self.image_extension, "image_extension")?;
        self.parallel.validate()?;
        self.classifier.validate()?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Configuration file format
#[derive(Debug, Clone, Copy)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Reads and writes [`TtaConfig`] files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a file, auto-detecting the format from the extension
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use d4_tta::pipeline::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load_from_file(Path::new("tta.toml"))?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_from_file(path: &Path) -> Result<TtaConfig, TtaError> {
        let format = ConfigFormat::from_extension(path).ok_or_else(|| {
            TtaError::config_error(format!(
                "Unsupported config file extension: {:?}",
                path.extension()
            ))
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| {
            TtaError::config_error(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::load_from_string(&content, format)
    }

    /// Load configuration from a string with specified format
    pub fn load_from_string(content: &str, format: ConfigFormat) -> Result<TtaConfig, TtaError> {
        match format {
            ConfigFormat::Toml => Self::load_from_toml(content),
            ConfigFormat::Json => Self::load_from_json(content),
        }
    }

    /// Load configuration from TOML string
    pub fn load_from_toml(content: &str) -> Result<TtaConfig, TtaError> {
        toml::from_str(content)
            .map_err(|e| TtaError::config_error(format!("Failed to parse TOML config: {e}")))
    }

    /// Load configuration from JSON string
    pub fn load_from_json(content: &str) -> Result<TtaConfig, TtaError> {
        serde_json::from_str(content)
            .map_err(|e| TtaError::config_error(format!("Failed to parse JSON config: {e}")))
    }

    /// Save configuration to TOML string
    pub fn save_to_toml(config: &TtaConfig) -> Result<String, TtaError> {
        toml::to_string_pretty(config).map_err(|e| {
            TtaError::config_error(format!("Failed to serialize config to TOML: {e}"))
        })
    }

    /// Save configuration to JSON string
    pub fn save_to_json(config: &TtaConfig) -> Result<String, TtaError> {
        serde_json::to_string_pretty(config).map_err(|e| {
            TtaError::config_error(format!("Failed to serialize config to JSON: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_format_detection() {
        assert!(matches!(
            ConfigFormat::from_extension(Path::new("tta.toml")),
            Some(ConfigFormat::Toml)
        ));
        assert!(matches!(
            ConfigFormat::from_extension(Path::new("tta.json")),
            Some(ConfigFormat::Json)
        ));
        assert!(ConfigFormat::from_extension(Path::new("tta.txt")).is_none());
    }

    #[test]
    fn test_defaults() {
        let config = TtaConfig::default();
        assert!(config.use_tta);
        assert_eq!(config.crop_size, 480);
        assert_eq!(config.image_size, 512);
        assert_eq!(config.image_extension, "tif");
        assert_eq!(config.output_dir, PathBuf::from("submit"));
        assert_eq!(config.parallel.num_workers, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_flat_worker_keys() {
        let config = ConfigLoader::load_from_json(
            r#"{"use_tta": false, "num_workers": 2, "prefetch": 4, "crop_size": 256}"#,
        )
        .unwrap();
        assert!(!config.use_tta);
        assert_eq!(config.parallel.num_workers, 2);
        assert_eq!(config.parallel.prefetch, 4);
        assert_eq!(config.crop_size, 256);
        assert_eq!(config.image_size, 512);
    }

    #[test]
    fn test_unknown_ensembling_rejected_at_parse_time() {
        let err = ConfigLoader::load_from_json(r#"{"ensembling": "arithmetic"}"#).unwrap_err();
        assert!(err.to_string().contains("arithmetic"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = TtaConfig::new()
            .with_tta(false)
            .with_crop_size(224)
            .with_labels_path("labels.txt");
        let toml_str = ConfigLoader::save_to_toml(&config).unwrap();
        let loaded = ConfigLoader::load_from_toml(&toml_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = TtaConfig::new().with_output_dir("out").with_image_extension("png");
        let json_str = ConfigLoader::save_to_json(&config).unwrap();
        let loaded = ConfigLoader::load_from_json(&json_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_crop_larger_than_image_invalid() {
        let config = TtaConfig::new().with_crop_size(600);
        assert!(config.validate().is_err());
        assert!(config.augmenter().is_err());
    }
}
