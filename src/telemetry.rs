//! Structured logging for the server process.
//!
//! Events are written as JSON lines to stderr because stdout carries the MCP
//! transport. The configured [`LogLevel`] sets the default filter; an
//! explicit `RUST_LOG` directive takes precedence for debugging sessions.

use std::io;

use tracing_subscriber::EnvFilter;

use crate::config::{ClientSettings, LogLevel};
use crate::gitlab::error::GitLabError;

const FILTER_ENV: &str = "RUST_LOG";

/// Builds the event filter for `level`, honouring `RUST_LOG` when set.
#[must_use]
pub fn event_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_filter()))
}

/// Installs the global JSON subscriber on stderr.
///
/// # Errors
///
/// Returns [`GitLabError::Configuration`] if a global subscriber has already
/// been installed.
pub fn init_tracing(level: LogLevel) -> Result<(), GitLabError> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(event_filter(level))
        .with_writer(io::stderr)
        .with_current_span(false)
        .try_init()
        .map_err(|error| GitLabError::Configuration {
            message: format!("failed to initialize tracing subscriber: {error}"),
        })
}

/// Records the startup line. The token is never part of it.
pub fn log_startup(settings: &ClientSettings) {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = settings.base_url().as_str(),
        request_timeout_ms = u64::try_from(settings.request_timeout().as_millis()).unwrap_or(u64::MAX),
        max_attempts = settings.max_attempts(),
        log_level = %settings.log_level(),
        "mr-comments starting"
    );
}
