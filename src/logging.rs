//! Tracing subscriber setup shared by both binaries.
//!
//! `RUST_LOG` overrides the defaults passed in by the caller. Logs go to
//! stderr so CLI output on stdout stays clean.

use tracing_subscriber::EnvFilter;

/// Default directives for the CLI
pub const CLI_DEFAULT: &str = "laptop_history=warn";
/// Default directives under `--verbose`
pub const CLI_VERBOSE: &str = "laptop_history=debug";
/// Default directives for the API server
pub const SERVER_DEFAULT: &str = "laptop_history=info,tower_http=info";

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logging(default_directives: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
