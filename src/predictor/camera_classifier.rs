//! Camera Model Classifier
//!
//! This module wraps an ONNX classification graph that takes a batch of crops
//! together with a per-crop manipulated flag and scores the camera model that
//! took each crop.
//!
//! The graph is fed raw `0..=255` pixel values. It may emit either logits, in
//! which case a row-wise softmax is applied, or probabilities directly.

use crate::core::config::{ConfigError, ConfigValidator, ConfigValidatorExt, OrtSessionConfig};
use crate::core::constants::{DEFAULT_AUX_INPUT_NAME, DEFAULT_IMAGE_INPUT_NAME};
use crate::core::errors::SimpleError;
use crate::core::{OrtInfer, ProbabilityPredictor, Tensor2D, Tensor4D, TtaError};
use crate::processors::{ChannelOrder, softmax_rows};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration for the camera model classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraClassifierConfig {
    /// Name used to label outputs; defaults to the model file stem.
    pub model_name: Option<String>,
    /// Graph input receiving the `[N, H, W, 3]` (or `[N, 3, H, W]`) image batch.
    pub image_input_name: String,
    /// Graph input receiving the `[N, 1]` manipulated flag; `None` if the graph has no such input.
    pub aux_input_name: Option<String>,
    /// Graph output to read; the first declared output when `None`.
    pub output_name: Option<String>,
    /// Whether the graph emits logits that still need a softmax.
    pub apply_softmax: bool,
    /// Layout the graph expects for the image batch.
    pub channel_order: ChannelOrder,
    /// ONNX Runtime session options.
    pub session: OrtSessionConfig,
}

impl CameraClassifierConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for CameraClassifierConfig {
    fn default() -> Self {
        Self {
            model_name: None,
            image_input_name: DEFAULT_IMAGE_INPUT_NAME.to_string(),
            aux_input_name: Some(DEFAULT_AUX_INPUT_NAME.to_string()),
            output_name: None,
            apply_softmax: true,
            channel_order: ChannelOrder::HWC,
            session: OrtSessionConfig::default(),
        }
    }
}

impl ConfigValidator for CameraClassifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_non_empty(&self.image_input_name, "image_input_name")?;
        if let Some(name) = &self.aux_input_name {
            self.validate_non_empty(name, "aux_input_name")?;
            if name == &self.image_input_name {
                return Err(ConfigError::InvalidConfig {
                    message: format!("image and auxiliary inputs share the name '{name}'"),
                });
            }
        }
        if let Some(name) = &self.output_name {
            self.validate_non_empty(name, "output_name")?;
        }
        if let Some(threads) = self.session.intra_threads {
            self.validate_thread_count(threads)?;
        }
        if let Some(threads) = self.session.inter_threads {
            self.validate_thread_count(threads)?;
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Camera model classifier backed by an ONNX Runtime session.
#[derive(Debug)]
pub struct CameraClassifier {
    config: CameraClassifierConfig,
    model_name: String,
    infer: OrtInfer,
}

impl CameraClassifier {
    /// Loads the model at `model_path`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid config or missing file, and
    /// `TtaError::ModelLoad` if ONNX Runtime rejects the model.
    pub fn new(config: CameraClassifierConfig, model_path: &Path) -> Result<Self, TtaError> {
        let config = config.validate_and_wrap()?;
        config.validate_model_path(model_path)?;

        let mut infer = OrtInfer::with_session_config(
            model_path,
            &config.session,
            Some(&config.image_input_name),
        )?;
        if let Some(aux) = &config.aux_input_name {
            infer = infer.with_aux_input(aux.clone());
        }
        if let Some(output) = &config.output_name {
            infer = infer.with_output(output.clone());
        }

        if let Some(shape) = infer.primary_input_shape()
            && shape.len() == 4
        {
            let channels_first = shape[1] == 3 && shape[3] != 3;
            if channels_first != (config.channel_order == ChannelOrder::CHW) {
                warn!(
                    "model input shape {:?} does not look like the configured {:?} layout",
                    shape, config.channel_order
                );
            }
        }

        let model_name = config
            .model_name
            .clone()
            .unwrap_or_else(|| infer.model_name().to_string());
        debug!(
            "camera classifier '{}' ready (softmax: {}, layout: {:?})",
            model_name, config.apply_softmax, config.channel_order
        );

        Ok(Self {
            config,
            model_name,
            infer,
        })
    }

    /// Returns the configuration the classifier was built with.
    pub fn config(&self) -> &CameraClassifierConfig {
        &self.config
    }

    /// Rearranges an NHWC batch into the layout the graph expects.
    pub fn prepare_images(images: &Tensor4D, order: ChannelOrder) -> Tensor4D {
        match order {
            ChannelOrder::HWC => images.clone(),
            ChannelOrder::CHW => images
                .view()
                .permuted_axes([0, 3, 1, 2])
                .as_standard_layout()
                .into_owned(),
        }
    }
}

impl CameraClassifier {
    /// Rejects non-finite graph output, then applies the softmax if requested.
    fn finish_output(
        model_name: &str,
        mut output: Tensor2D,
        apply_softmax: bool,
    ) -> Result<Tensor2D, TtaError> {
        if let Some(((view, class), value)) = output.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(TtaError::inference_error(
                model_name,
                "validating model output",
                SimpleError::new(format!(
                    "non-finite value {value} for view {view}, class {class}"
                )),
            ));
        }
        if apply_softmax {
            softmax_rows(&mut output)?;
        }
        Ok(output)
    }
}

impl ProbabilityPredictor for CameraClassifier {
    fn predict_probabilities(
        &self,
        images: &Tensor4D,
        manipulated: &Tensor2D,
    ) -> Result<Tensor2D, TtaError> {
        let permuted;
        let input = match self.config.channel_order {
            ChannelOrder::HWC => images,
            ChannelOrder::CHW => {
                permuted = Self::prepare_images(images, ChannelOrder::CHW);
                &permuted
            }
        };
        let output = if self.config.aux_input_name.is_some() {
            self.infer.infer_2d_with_aux(input, manipulated)?
        } else {
            self.infer.infer_2d(input)?
        };
        Self::finish_output(&self.model_name, output, self.config.apply_softmax)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Builder for the camera model classifier
pub struct CameraClassifierBuilder {
    config: CameraClassifierConfig,
    model_path: Option<PathBuf>,
}

impl CameraClassifierBuilder {
    pub fn new() -> Self {
        Self {
            config: CameraClassifierConfig::default(),
            model_path: None,
        }
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: CameraClassifierConfig) -> Self {
        Self {
            config,
            model_path: None,
        }
    }

    /// Sets the path to the ONNX model file.
    pub fn model_path(mut self, model_path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(model_path.into());
        self
    }

    /// Sets the name used to label outputs.
    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.config.model_name = Some(model_name.into());
        self
    }

    pub fn image_input_name(mut self, name: impl Into<String>) -> Self {
        self.config.image_input_name = name.into();
        self
    }

    /// Sets the auxiliary input name, or `None` for graphs without one.
    pub fn aux_input_name(mut self, name: Option<String>) -> Self {
        self.config.aux_input_name = name;
        self
    }

    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.config.output_name = Some(name.into());
        self
    }

    /// Whether to apply a softmax to the graph output.
    pub fn apply_softmax(mut self, enable: bool) -> Self {
        self.config.apply_softmax = enable;
        self
    }

    pub fn channel_order(mut self, order: ChannelOrder) -> Self {
        self.config.channel_order = order;
        self
    }

    /// Sets the ONNX Runtime session configuration.
    pub fn session_config(mut self, config: OrtSessionConfig) -> Self {
        self.config.session = config;
        self
    }

    /// Builds the classifier.
    ///
    /// # Errors
    ///
    /// `TtaError::ConfigError` if no model path was set, plus everything
    /// [`CameraClassifier::new`] can return.
    pub fn build(self) -> Result<CameraClassifier, TtaError> {
        let model_path = self
            .model_path
            .ok_or_else(|| TtaError::config_error("camera classifier requires a model path"))?;
        CameraClassifier::new(self.config, &model_path)
    }
}

impl Default for CameraClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn default_config_uses_named_inputs() {
        let config = CameraClassifierConfig::default();
        assert_eq!(config.image_input_name, "image");
        assert_eq!(config.aux_input_name.as_deref(), Some("manipulated"));
        assert!(config.apply_softmax);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_clashing_or_blank_names() {
        let clash = CameraClassifierConfig {
            aux_input_name: Some("image".to_string()),
            ..Default::default()
        };
        assert!(clash.validate().is_err());

        let blank = CameraClassifierConfig {
            image_input_name: "  ".to_string(),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn config_deserializes_partially() {
        let config: CameraClassifierConfig =
            serde_json::from_str(r#"{"apply_softmax": false, "channel_order": "CHW"}"#).unwrap();
        assert!(!config.apply_softmax);
        assert_eq!(config.channel_order, ChannelOrder::CHW);
        assert_eq!(config.image_input_name, "image");
    }

    #[test]
    fn chw_layout_permutes_channels_first() {
        let images = Array4::from_shape_fn((2, 3, 4, 3), |(n, y, x, c)| {
            (n * 1000 + y * 100 + x * 10 + c) as f32
        });
        let chw = CameraClassifier::prepare_images(&images, ChannelOrder::CHW);
        assert_eq!(chw.shape(), &[2, 3, 3, 4]);
        assert_eq!(chw[[1, 2, 3, 1]], images[[1, 3, 1, 2]]);
        assert!(chw.is_standard_layout());

        let hwc = CameraClassifier::prepare_images(&images, ChannelOrder::HWC);
        assert_eq!(hwc, images);
    }

    #[test]
    fn non_finite_output_is_an_inference_error() {
        let mut logits = Tensor2D::from_elem((40, 3), 0.5);
        logits[[7, 1]] = f32::NAN;
        for apply_softmax in [true, false] {
            let err = CameraClassifier::finish_output("cam", logits.clone(), apply_softmax)
                .unwrap_err();
            assert!(matches!(err, TtaError::Inference { ref model_name, .. } if model_name == "cam"));
        }

        let nan_row = Tensor2D::from_elem((1, 3), f32::NAN);
        assert!(CameraClassifier::finish_output("cam", nan_row, true).is_err());
    }

    #[test]
    fn finite_logits_become_probabilities() {
        let logits = ndarray::array![[0.0f32, 0.0], [2.0, 2.0]];
        let probs = CameraClassifier::finish_output("cam", logits, true).unwrap();
        assert_eq!(probs, ndarray::array![[0.5f32, 0.5], [0.5, 0.5]]);
    }

    #[test]
    fn builder_requires_model_path() {
        let err = CameraClassifierBuilder::new().build().unwrap_err();
        assert!(matches!(err, TtaError::ConfigError { .. }));
    }

    #[test]
    fn missing_model_file_is_reported() {
        let err = CameraClassifierBuilder::new()
            .model_path("/nonexistent/model.onnx")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/model.onnx"));
    }
}
