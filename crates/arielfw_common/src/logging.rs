//! tracing setup shared by arielfw binaries.
//!
//! Output goes to stderr so stdout stays clean for replies and JSON.
//! `ARIELFW_LOG` overrides the configured level with a full filter directive.

use crate::config::LogConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive, e.g. `arielfw_common=debug`
pub const LOG_ENV: &str = "ARIELFW_LOG";

/// Filter from `ARIELFW_LOG`, else from the configured level.
/// An unparsable level falls back to `info`.
pub fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(config: &LogConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(build_filter(config))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
