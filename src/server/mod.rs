//! The HTTP front-end.
//!
//! * `POST /predict` takes `{"image": "<data URL>"}` and answers
//!   `{"class", "confidence", "predictions"}` or `{"error"}`, always with
//!   status 200.
//! * `GET /health` reports the loaded model.
//!
//! The classifier is loaded before the listener is bound. If loading fails
//! the server does not start.

mod config;
mod handlers;

pub use config::ServerConfig;
pub use handlers::{PredictRequest, PredictResponse};

use crate::core::config::ConfigValidator;
use crate::core::errors::DigitResult;
use crate::core::init_tracing;
use crate::core::traits::Classifier;
use crate::models::OnnxDigitClassifier;
use crate::pipeline::{DigitPipeline, EntryPoint};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

/// Shared, read-only state of the server.
#[derive(Debug)]
pub struct AppState {
    pub pipeline: DigitPipeline,
}

impl AppState {
    pub fn new(pipeline: DigitPipeline) -> Self {
        Self { pipeline }
    }
}

/// Builds the router with permissive CORS, a body size limit and request tracing.
pub fn build_app(app_state: Arc<AppState>, max_payload_size: usize) -> Router {
    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(max_payload_size))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(app_state)
}

/// Loads the classifier, binds the listener and serves until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns a startup-kind error, after logging it, when the configuration is
/// invalid, the classifier cannot be loaded or the address cannot be bound.
pub async fn startup(config: ServerConfig) -> DigitResult<()> {
    init_tracing(&config.log_level);

    let app_config = config
        .validate()
        .and_then(|()| config.app_config())
        .map_err(|e| {
            error!("Invalid configuration: {}", e);
            e
        })?;

    let classifier = OnnxDigitClassifier::load(&app_config.model).map_err(|e| {
        error!("Failed to load classifier, refusing to serve: {}", e.full_message());
        e
    })?;
    let classifier: Arc<dyn Classifier> = Arc::new(classifier);

    let pipeline = DigitPipeline::new(classifier, &app_config.pipeline, EntryPoint::Http)?;
    let app = build_app(Arc::new(AppState::new(pipeline)), config.max_payload_size);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| {
            error!("Failed to bind {}: {}", bind_addr, e);
            e
        })?;
    info!("Starting server on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}

fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
