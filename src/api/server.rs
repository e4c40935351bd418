//! xlsx2json API Server implementation
//!
//! HTTP server using Axum. Routes uploads to the importer or exporter.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use super::handlers;
use crate::excel::{ExcelExporter, ExcelImporter};

/// API Server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Serves the upload form on `GET /` and logs at debug level
    pub debug: bool,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            debug: false,
            max_body_bytes: 32 * 1024 * 1024,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ApiConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub importer: ExcelImporter,
    pub exporter: ExcelExporter,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            importer: ExcelImporter::new(),
            exporter: ExcelExporter::new(),
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `debug` picks the level. Calling this
/// twice is harmless.
pub fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "xlsx2json=debug,tower_http=debug"
    } else {
        "xlsx2json=info,tower_http=info"
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .try_init();
}

/// Build the router for `config`
pub fn build_router(config: &ApiConfig) -> Router {
    let state = Arc::new(AppState::new());

    // Every response carries `Access-Control-Allow-Origin: *`
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new();
    if config.debug {
        router = router.route("/", get(handlers::welcome));
    }

    router
        .route("/", post(handlers::receive_file))
        .route("/json2xlsx", post(handlers::receive_json))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handlers::handle_service_error))
                .timeout(config.request_timeout),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    init_tracing(config.debug);

    debug!(
        host = %config.host,
        port = config.port,
        debug = config.debug,
        max_body_bytes = config.max_body_bytes,
        request_timeout = ?config.request_timeout,
        "Environment config"
    );

    let app = build_router(&config);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("xlsx2json API Server starting on http://{}", config.address());
    info!("   Endpoints: POST /, POST /json2xlsx");
    if config.debug {
        info!("   Upload form: GET /");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("xlsx2json API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Unable to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
