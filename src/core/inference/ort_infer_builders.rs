use super::*;
use crate::core::config::{
    ModelConfig, OrtExecutionProvider, OrtGraphOptimizationLevel, OrtSessionConfig,
};
use ort::execution_providers::ExecutionProviderDispatch;
use ort::logging::LogLevel;
use ort::session::builder::SessionBuilder;
use std::path::Path;

impl OrtInfer {
    /// Creates a new OrtInfer instance with default ONNX Runtime settings and a single session.
    ///
    /// Input and output tensor names are taken from the model itself.
    pub fn new(model_path: impl AsRef<Path>) -> Result<Self, DigitError> {
        Self::from_config(&ModelConfig::new(model_path.as_ref()))
    }

    /// Creates a new OrtInfer instance from a [`ModelConfig`], applying ORT session
    /// configuration and constructing a session pool for concurrent predictions.
    pub fn from_config(config: &ModelConfig) -> Result<Self, DigitError> {
        let path = config.model_path.as_path();
        if !path.is_file() {
            return Err(DigitError::model_load_error(
                path,
                "model file not found",
                Some("export the trained classifier to ONNX and place it at this path"),
                None::<std::io::Error>,
            ));
        }

        let pool_size = config.session_pool_size.max(1);
        let mut sessions = Vec::with_capacity(pool_size);
        for _ in 0..pool_size {
            let session = Session::builder()
                .and_then(|builder| match &config.ort_session {
                    Some(cfg) => Self::apply_ort_config(builder, cfg),
                    None => builder.with_log_level(LogLevel::Error),
                })
                .and_then(|builder| builder.commit_from_file(path))
                .map_err(|e| {
                    DigitError::model_load_error(
                        path,
                        "failed to create ONNX session",
                        Some("verify the file is a valid ONNX model and the execution providers are available"),
                        Some(e),
                    )
                })?;
            sessions.push(Mutex::new(session));
        }

        let (input_name, output_name) = {
            let first = sessions[0].lock().map_err(|_| {
                DigitError::model_load_error(
                    path,
                    "session lock poisoned during initialization",
                    None,
                    None::<std::io::Error>,
                )
            })?;
            let declared_inputs: Vec<&str> =
                first.inputs.iter().map(|input| input.name.as_str()).collect();
            let declared_outputs: Vec<&str> =
                first.outputs.iter().map(|output| output.name.as_str()).collect();
            let input_name =
                resolve_tensor_name(path, "input", config.input_name.as_deref(), &declared_inputs)?;
            let output_name = resolve_tensor_name(
                path,
                "output",
                config.output_name.as_deref(),
                &declared_outputs,
            )?;
            (input_name, output_name)
        };

        tracing::debug!(
            "Loaded model '{}' with {} session(s): input '{}', output '{}'",
            path.display(),
            pool_size,
            input_name,
            output_name
        );

        Ok(OrtInfer {
            sessions,
            next_idx: std::sync::atomic::AtomicUsize::new(0),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
            model_name: config.resolved_model_name(),
        })
    }

    fn apply_ort_config(
        mut builder: SessionBuilder,
        cfg: &OrtSessionConfig,
    ) -> Result<SessionBuilder, ort::Error> {
        builder = builder.with_log_level(cfg.get_log_level().into())?;
        if let Some(intra) = cfg.intra_threads {
            builder = builder.with_intra_threads(intra)?;
        }
        if let Some(inter) = cfg.inter_threads {
            builder = builder.with_inter_threads(inter)?;
        }
        if let Some(level) = cfg.optimization_level {
            use ort::session::builder::GraphOptimizationLevel as GOL;
            let mapped = match level {
                OrtGraphOptimizationLevel::DisableAll => GOL::Disable,
                OrtGraphOptimizationLevel::Level1 => GOL::Level1,
                OrtGraphOptimizationLevel::Level2 => GOL::Level2,
                OrtGraphOptimizationLevel::Level3 => GOL::Level3,
            };
            builder = builder.with_optimization_level(mapped)?;
        }
        if cfg.execution_providers.is_some() {
            let providers = Self::build_execution_providers(&cfg.get_execution_providers())?;
            if !providers.is_empty() {
                builder = builder.with_execution_providers(providers)?;
            }
        }
        Ok(builder)
    }

    fn build_execution_providers(
        eps: &[OrtExecutionProvider],
    ) -> Result<Vec<ExecutionProviderDispatch>, ort::Error> {
        let mut providers = Vec::new();
        for ep in eps {
            match ep {
                OrtExecutionProvider::CPU => {
                    providers
                        .push(ort::execution_providers::CPUExecutionProvider::default().build());
                }
                #[cfg(feature = "cuda")]
                OrtExecutionProvider::CUDA { device_id } => {
                    let mut cuda_provider =
                        ort::execution_providers::CUDAExecutionProvider::default();
                    if let Some(id) = device_id {
                        cuda_provider = cuda_provider.with_device_id(*id);
                    }
                    providers.push(cuda_provider.build());
                }
                #[cfg(not(feature = "cuda"))]
                OrtExecutionProvider::CUDA { .. } => {
                    tracing::warn!(
                        "CUDA execution provider requested but the cuda feature is disabled, using CPU"
                    );
                    providers
                        .push(ort::execution_providers::CPUExecutionProvider::default().build());
                }
            }
        }
        Ok(providers)
    }
}

/// Picks the tensor name to bind, checking a configured name against the
/// names the model declares. Without a configured name the first declared one
/// is used.
pub(super) fn resolve_tensor_name(
    path: &Path,
    role: &str,
    configured: Option<&str>,
    declared: &[&str],
) -> Result<String, DigitError> {
    match configured {
        Some(name) if declared.contains(&name) => Ok(name.to_string()),
        Some(name) => Err(DigitError::model_load_error(
            path,
            format!(
                "configured {role} '{name}' is not declared by the model (declared: {})",
                declared.join(", ")
            ),
            Some("fix the tensor name in the model configuration or leave it unset"),
            None::<std::io::Error>,
        )),
        None => declared
            .first()
            .map(|name| name.to_string())
            .ok_or_else(|| {
                DigitError::model_load_error(
                    path,
                    format!("model declares no {role}s"),
                    None,
                    None::<std::io::Error>,
                )
            }),
    }
}
