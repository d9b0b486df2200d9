//! Server configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach and then validated
//! once into an immutable [`ClientSettings`] that is passed explicitly to the
//! GitLab client and the comment pipeline.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.mr-comments.toml` in the current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `GITLAB_BASE_URL`, `GITLAB_TOKEN`,
//!    `GITLAB_REQUEST_TIMEOUT_MS`, `GITLAB_MAX_RETRIES`, `GITLAB_LOG_LEVEL`
//!    (or legacy `REQUEST_TIMEOUT`, `MAX_RETRIES`, `LOG_LEVEL`)
//! 4. **Command-line arguments** – `--base-url`, `--token`, and friends
//!
//! # Configuration File
//!
//! ```toml
//! base_url = "https://gitlab.example.com"
//! token = "glpat-example"
//! request_timeout_ms = 20000
//! max_retries = 3
//! log_level = "info"
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::gitlab::error::GitLabError;
use crate::gitlab::locator::PersonalAccessToken;

const DEFAULT_BASE_URL: &str = "https://gitlab.com";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 20_000;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Server configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `GITLAB_BASE_URL` or `--base-url`: GitLab instance root
/// - `GITLAB_TOKEN` or `--token`: Personal access token with `read_api` scope
/// - `GITLAB_REQUEST_TIMEOUT_MS`, `REQUEST_TIMEOUT`, or `--request-timeout-ms`:
///   Per-request deadline
/// - `GITLAB_MAX_RETRIES`, `MAX_RETRIES`, or `--max-retries`: Attempts per
///   collection fetch
/// - `GITLAB_LOG_LEVEL`, `LOG_LEVEL`, or `--log-level`: Log verbosity
///
/// # Example
///
/// ```no_run
/// use mr_comments::MrCommentsConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = MrCommentsConfig::load().expect("failed to load configuration");
/// let settings = config.settings().expect("configuration should be valid");
/// assert!(settings.max_attempts() >= 1);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "GITLAB",
    discovery(
        dotfile_name = ".mr-comments.toml",
        config_file_name = "mr-comments.toml",
        app_name = "mr-comments"
    )
)]
pub struct MrCommentsConfig {
    /// Root URL of the GitLab instance, without the `/api/v4` suffix.
    ///
    /// Can be provided via:
    /// - CLI: `--base-url <URL>`
    /// - Environment: `GITLAB_BASE_URL`
    /// - Config file: `base_url = "..."`
    #[ortho_config()]
    pub base_url: Option<String>,

    /// Personal access token for GitLab API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `GITLAB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Deadline for each HTTP request, in milliseconds.
    ///
    /// Defaults to 20 seconds. The legacy `REQUEST_TIMEOUT` variable applies
    /// while this holds the default.
    #[ortho_config()]
    pub request_timeout_ms: u64,

    /// Maximum attempts for each collection fetch, including the first.
    ///
    /// Defaults to 3. The legacy `MAX_RETRIES` variable applies while this
    /// holds the default.
    #[ortho_config()]
    pub max_retries: u32,

    /// Log verbosity: `debug`, `info`, `warn`, or `error`.
    ///
    /// Can be provided via:
    /// - CLI: `--log-level <LEVEL>`
    /// - Environment: `GITLAB_LOG_LEVEL` or `LOG_LEVEL` (legacy)
    /// - Config file: `log_level = "..."`
    #[ortho_config()]
    pub log_level: Option<String>,
}

impl Default for MrCommentsConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            log_level: None,
        }
    }
}

impl MrCommentsConfig {
    /// Resolves the log level from configuration or the legacy `LOG_LEVEL`
    /// environment variable, defaulting to `info`.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Configuration`] when the level is not one of
    /// `debug`, `info`, `warn`, or `error`.
    pub fn resolve_log_level(&self) -> Result<LogLevel, GitLabError> {
        self.log_level
            .clone()
            .or_else(|| env::var("LOG_LEVEL").ok())
            .map_or(Ok(LogLevel::Info), |raw| raw.parse())
    }

    /// Resolves the request deadline in milliseconds, falling back to the
    /// legacy `REQUEST_TIMEOUT` variable when no source overrode the default.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Configuration`] when `REQUEST_TIMEOUT` is not a
    /// whole number.
    pub fn resolve_request_timeout_ms(&self) -> Result<u64, GitLabError> {
        legacy_fallback(
            self.request_timeout_ms,
            DEFAULT_REQUEST_TIMEOUT_MS,
            "REQUEST_TIMEOUT",
        )
    }

    /// Resolves the attempt budget, falling back to the legacy `MAX_RETRIES`
    /// variable when no source overrode the default.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Configuration`] when `MAX_RETRIES` is not a
    /// whole number.
    pub fn resolve_max_retries(&self) -> Result<u32, GitLabError> {
        legacy_fallback(self.max_retries, DEFAULT_MAX_RETRIES, "MAX_RETRIES")
    }

    /// Validates the merged configuration into immutable client settings.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Configuration`] when the token is missing or
    /// blank, the base URL is not an absolute http(s) URL, the timeout is
    /// zero, no attempts are allowed, or the log level is unknown.
    pub fn settings(&self) -> Result<ClientSettings, GitLabError> {
        let raw_token = self.token.as_deref().ok_or_else(|| GitLabError::Configuration {
            message: concat!(
                "GitLab token is required (use --token, GITLAB_TOKEN, or token in ",
                ".mr-comments.toml); create a personal access token with read_api scope"
            )
            .to_owned(),
        })?;
        let token = PersonalAccessToken::new(raw_token)?;
        let base_url = parse_base_url(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        let request_timeout_ms = self.resolve_request_timeout_ms()?;
        let max_attempts = self.resolve_max_retries()?;

        if request_timeout_ms == 0 {
            return Err(GitLabError::Configuration {
                message: "request_timeout_ms must be greater than zero".to_owned(),
            });
        }

        if max_attempts == 0 {
            return Err(GitLabError::Configuration {
                message: "max_retries must allow at least one attempt".to_owned(),
            });
        }

        Ok(ClientSettings {
            base_url,
            token,
            request_timeout: Duration::from_millis(request_timeout_ms),
            max_attempts,
            log_level: self.resolve_log_level()?,
        })
    }
}

fn legacy_fallback<T>(configured: T, default: T, legacy_var: &str) -> Result<T, GitLabError>
where
    T: Copy + PartialEq + FromStr,
    T::Err: fmt::Display,
{
    if configured != default {
        return Ok(configured);
    }

    env::var(legacy_var).ok().map_or(Ok(configured), |raw| {
        raw.trim().parse().map_err(|error| GitLabError::Configuration {
            message: format!("invalid {legacy_var} '{raw}': {error}"),
        })
    })
}

fn parse_base_url(raw: &str) -> Result<Url, GitLabError> {
    let url = Url::parse(raw.trim()).map_err(|error| GitLabError::Configuration {
        message: format!("invalid GitLab base URL '{raw}': {error}"),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(GitLabError::Configuration {
            message: format!("GitLab base URL must be an http(s) URL with a host, got '{raw}'"),
        });
    }

    Ok(url)
}

/// Log verbosity accepted by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Requests, pages, and everything below.
    Debug,
    /// Fetch summaries and tool completion.
    Info,
    /// Retries.
    Warn,
    /// Tool failures only.
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = GitLabError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(GitLabError::Configuration {
                message: format!("invalid log level '{other}': use debug, info, warn, or error"),
            }),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Validated, immutable settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    base_url: Url,
    token: PersonalAccessToken,
    request_timeout: Duration,
    max_attempts: u32,
    log_level: LogLevel,
}

impl ClientSettings {
    /// Creates settings directly, bypassing layered loading, with the
    /// default attempt budget and `info` logging.
    #[must_use]
    pub fn new(base_url: Url, token: PersonalAccessToken, request_timeout: Duration) -> Self {
        Self {
            base_url,
            token,
            request_timeout,
            max_attempts: DEFAULT_MAX_RETRIES,
            log_level: LogLevel::Info,
        }
    }

    /// GitLab instance root.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Access token.
    #[must_use]
    pub const fn token(&self) -> &PersonalAccessToken {
        &self.token
    }

    /// Per-request deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Attempts per collection fetch.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Configured log verbosity.
    #[must_use]
    pub const fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Joins an absolute API path onto the base URL, keeping any path prefix
    /// the instance is served under.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests;
