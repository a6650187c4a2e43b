//! HTTP front-end for handwritten digit recognition.
//!
//! Usage:
//! ```
//! digit-server --model-path models/mnist_model.onnx --port 8000
//! ```
//!
//! The process exits with a failure status if the model cannot be loaded.

use clap::Parser;
use digit_recognizer::server::{ServerConfig, startup};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::parse();
    match startup(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("digit-server: {}", e.full_message());
            ExitCode::FAILURE
        }
    }
}
