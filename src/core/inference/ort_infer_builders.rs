use super::*;
use crate::core::config::{OrtExecutionProvider, OrtGraphOptimizationLevel, OrtSessionConfig};
use ort::execution_providers::{CPUExecutionProvider, ExecutionProviderDispatch};
use ort::logging::LogLevel;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use std::path::Path;
use tracing::{debug, warn};

impl OrtInfer {
    /// Creates a new OrtInfer instance applying the given session configuration.
    pub fn with_session_config(
        model_path: impl AsRef<Path>,
        config: &OrtSessionConfig,
        input_name: Option<&str>,
    ) -> Result<Self, TtaError> {
        let path = model_path.as_ref();
        let builder = Self::apply_ort_config(Session::builder()?, config)?;
        let session = builder.commit_from_file(path).map_err(|e| {
            TtaError::model_load_error(
                path,
                "failed to create ONNX session",
                Some("check device/EP configuration and model file"),
                Some(e),
            )
        })?;
        Ok(Self::from_session(session, path, input_name))
    }

    /// Names the auxiliary `[N, 1]` input fed alongside the image batch.
    pub fn with_aux_input(mut self, name: impl Into<String>) -> Self {
        self.aux_input_name = Some(name.into());
        self
    }

    /// Names the output tensor to read instead of the first declared output.
    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    fn from_session(session: Session, path: &Path, input_name: Option<&str>) -> Self {
        let model_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown_model")
            .to_string();
        debug!(
            "loaded ONNX model '{}' with inputs {:?}",
            model_name,
            session.inputs.iter().map(|i| i.name.as_str()).collect::<Vec<_>>()
        );

        OrtInfer {
            session: Mutex::new(session),
            input_name: input_name.unwrap_or("x").to_string(),
            aux_input_name: None,
            output_name: None,
            model_path: path.to_path_buf(),
            model_name,
        }
    }

    fn apply_ort_config(
        builder: SessionBuilder,
        config: &OrtSessionConfig,
    ) -> Result<SessionBuilder, TtaError> {
        let mut builder = builder.with_log_level(LogLevel::Error)?;

        let level = match config.get_optimization_level() {
            OrtGraphOptimizationLevel::DisableAll => GraphOptimizationLevel::Disable,
            OrtGraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
            OrtGraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
            OrtGraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
        };
        builder = builder.with_optimization_level(level)?;

        if let Some(threads) = config.intra_threads {
            builder = builder.with_intra_threads(threads)?;
        }
        if let Some(threads) = config.inter_threads {
            builder = builder.with_inter_threads(threads)?;
        }
        if let Some(parallel) = config.parallel_execution {
            builder = builder.with_parallel_execution(parallel)?;
        }
        if let Some(enable) = config.enable_mem_pattern {
            builder = builder.with_memory_pattern(enable)?;
        }

        let providers: Vec<ExecutionProviderDispatch> = config
            .get_execution_providers()
            .iter()
            .filter_map(Self::execution_provider)
            .collect();
        builder = builder.with_execution_providers(providers)?;

        Ok(builder)
    }

    fn execution_provider(provider: &OrtExecutionProvider) -> Option<ExecutionProviderDispatch> {
        match provider {
            OrtExecutionProvider::CPU => Some(CPUExecutionProvider::default().build()),
            #[cfg(feature = "cuda")]
            OrtExecutionProvider::CUDA {
                device_id,
                gpu_mem_limit,
            } => {
                let mut cuda = ort::execution_providers::CUDAExecutionProvider::default()
                    .with_device_id(device_id.unwrap_or(0));
                if let Some(limit) = gpu_mem_limit {
                    cuda = cuda.with_memory_limit(*limit);
                }
                Some(cuda.build())
            }
            #[cfg(not(feature = "cuda"))]
            OrtExecutionProvider::CUDA { .. } => {
                warn!("CUDA requested but cuda feature not enabled. Falling back to CPU.");
                None
            }
        }
    }
}
