//! Dashboard HTTP API
//!
//! Session-gated REST endpoints over the reporting pipeline.
//! Run with `laptop-history serve` or `laptop-history-server`.

pub mod handlers;
pub mod server;
pub mod session;

pub use server::{router, run_api_server, ApiConfig, AppState};
pub use session::SessionStore;
