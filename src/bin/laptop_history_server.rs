//! Laptop History API Server binary
//!
//! HTTP REST API over the asset workbook.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use laptop_history::api::{run_api_server, ApiConfig};
use laptop_history::auth::CredentialVerifier;
use laptop_history::config::DashboardConfig;
use laptop_history::logging::{init_logging, SERVER_DEFAULT};

#[derive(Parser, Debug)]
#[command(name = "laptop-history-server")]
#[command(version)]
#[command(about = "Laptop History API Server - part-replacement dashboard over HTTP")]
#[command(long_about = r#"
Laptop History API Server

Endpoints:
  - POST /api/v1/login      - Open a session, returns a bearer token
  - POST /api/v1/logout     - End the session
  - GET  /api/v1/session    - Who am I
  - POST /api/v1/dashboard  - Dashboard for a filter selection
  - GET  /api/v1/options    - Values accepted by each filter
  - POST /api/v1/refresh    - Re-read the workbook
  - POST /api/v1/export     - Filtered history as CSV

Additional endpoints:
  - GET  /health            - Health check
  - GET  /version           - Server version info
  - GET  /                  - API documentation

Example usage:
  laptop-history-server --workbook data/Laptop_Riwayat.xlsx
  laptop-history-server --config dashboard.yaml --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/login \
    -H "Content-Type: application/json" \
    -d '{"username": "admin", "password": "admin123"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, env = "LAPTOP_HISTORY_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "LAPTOP_HISTORY_PORT")]
    port: Option<u16>,

    /// Asset workbook
    #[arg(short, long, env = "LAPTOP_HISTORY_WORKBOOK")]
    workbook: Option<PathBuf>,

    /// YAML config file
    #[arg(short, long, env = "LAPTOP_HISTORY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(SERVER_DEFAULT);
    let args = Args::parse();

    let mut config = DashboardConfig::load_or_default(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(workbook) = args.workbook {
        config.workbook = workbook;
    }

    let verifier: Arc<dyn CredentialVerifier> = Arc::new(config.credentials());
    run_api_server(ApiConfig::from(&config), verifier).await
}
