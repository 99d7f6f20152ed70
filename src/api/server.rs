//! Dashboard API server implementation
//!
//! HTTP API server using Axum. Every dashboard request re-reads the workbook,
//! so edits to the spreadsheet show up on the next call.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use super::session::SessionStore;
use crate::auth::CredentialVerifier;
use crate::config::DashboardConfig;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub workbook: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let config = DashboardConfig::default();
        Self {
            host: config.server.host,
            port: config.server.port,
            workbook: config.workbook,
        }
    }
}

impl From<&DashboardConfig> for ApiConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            workbook: config.workbook.clone(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub version: String,
    pub workbook: PathBuf,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(workbook: PathBuf, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            workbook,
            verifier,
            sessions: Arc::new(SessionStore::new()),
        }
    }
}

/// Build the router with all routes and middleware
pub fn router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Session endpoints
        .route("/api/v1/login", post(handlers::login))
        .route("/api/v1/logout", post(handlers::logout))
        .route("/api/v1/session", get(handlers::session))
        // Dashboard endpoints
        .route("/api/v1/dashboard", post(handlers::dashboard))
        .route("/api/v1/options", get(handlers::options))
        .route("/api/v1/refresh", post(handlers::refresh))
        .route("/api/v1/export", post(handlers::export_csv))
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig, verifier: Arc<dyn CredentialVerifier>) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.workbook.clone(), verifier));
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Dashboard API server starting on http://{}", addr);
    info!("   Workbook: {}", config.workbook.display());
    info!("   Endpoints: /api/v1/login, /api/v1/dashboard, /api/v1/options, /api/v1/refresh, /api/v1/export");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard API server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
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
