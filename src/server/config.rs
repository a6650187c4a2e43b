//! Command-line and file configuration for the HTTP front-end.

use crate::core::config::{AppConfig, ConfigError, ConfigValidator};
use crate::core::constants::{DEFAULT_MAX_PAYLOAD_SIZE, DEFAULT_PORT};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for `digit-server`.
///
/// `--config` points at a JSON [`AppConfig`]; `--model-path` and
/// `--debug-dump-dir` override the matching fields of that file.
#[derive(Debug, Clone, PartialEq, Parser, Serialize, Deserialize)]
#[command(name = "digit-server")]
#[command(version, about = "Handwritten digit recognition over HTTP")]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path to the ONNX classifier
    #[arg(short, long)]
    pub model_path: Option<PathBuf>,

    /// JSON file with `model` and `pipeline` sections
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Largest accepted request body in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD_SIZE)]
    pub max_payload_size: usize,

    /// Tracing filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Write each request's decoded and normalized images here
    #[arg(long)]
    pub debug_dump_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            model_path: None,
            config: None,
            max_payload_size: DEFAULT_MAX_PAYLOAD_SIZE,
            log_level: "info".to_string(),
            debug_dump_dir: None,
        }
    }
}

impl ServerConfig {
    /// `host:port`, as passed to the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolves the model and pipeline settings: the `--config` file (or
    /// defaults), then command-line overrides.
    pub fn app_config(&self) -> Result<AppConfig, ConfigError> {
        let mut app = match &self.config {
            Some(path) => AppConfig::from_json_file(path)?,
            None => AppConfig::default(),
        };
        if let Some(model_path) = &self.model_path {
            app.model.model_path = model_path.clone();
        }
        if let Some(dir) = &self.debug_dump_dir {
            app.pipeline.debug_dump_dir = Some(dir.clone());
        }
        app.pipeline.validate()?;
        Ok(app)
    }
}

impl ConfigValidator for ServerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "host must not be empty".to_string(),
            });
        }
        self.validate_positive_usize(self.max_payload_size, "max_payload_size")
    }
}
