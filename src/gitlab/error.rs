//! Error types exposed by the GitLab access layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Coarse classification used for retry decisions and user-facing codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or contradictory input.
    Validation,
    /// Credential rejected (401/403).
    Auth,
    /// Target resource absent (404).
    NotFound,
    /// Too many requests (429).
    RateLimit,
    /// Upstream server failure (5xx).
    Server,
    /// A single request exceeded its deadline.
    Timeout,
    /// Anything else.
    Unclassified,
}

impl ErrorKind {
    /// Machine-readable code preserved for the invoking agent.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Auth => "AUTH_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::RateLimit => "RATE_LIMITED",
            Self::Server => "SERVER_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Unclassified => "UNCLASSIFIED",
        }
    }
}

/// Errors surfaced while validating input or communicating with GitLab.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitLabError {
    /// Tool arguments failed validation before any request was made.
    #[error("invalid arguments: {message}")]
    Validation {
        /// Description of the offending argument.
        message: String,
    },

    /// GitLab rejected the credential.
    #[error("GitLab rejected the token ({status}): {message}")]
    Authentication {
        /// HTTP status returned (401 or 403).
        status: u16,
        /// Message from the response body.
        message: String,
    },

    /// The project or merge request does not exist or is not visible.
    #[error("GitLab resource not found: {message}")]
    NotFound {
        /// Message from the response body.
        message: String,
    },

    /// The API rate limit was exceeded.
    #[error("GitLab API rate limit exceeded: {message}")]
    RateLimited {
        /// Rate limit headers captured from the 429 response.
        rate_limit: Option<RateLimitInfo>,
        /// Message from the response body.
        message: String,
    },

    /// GitLab answered with a 5xx status.
    #[error("GitLab server error ({status}): {message}")]
    Server {
        /// HTTP status returned.
        status: u16,
        /// Message from the response body.
        message: String,
    },

    /// Any other non-success status.
    #[error("GitLab API error ({status}): {message}")]
    Api {
        /// HTTP status returned.
        status: u16,
        /// Message from the response body.
        message: String,
    },

    /// The request did not complete within the configured deadline.
    #[error("request timed out after {timeout_ms} ms: {operation}")]
    Timeout {
        /// Name of the operation that timed out.
        operation: String,
        /// Configured deadline in milliseconds.
        timeout_ms: u64,
    },

    /// Transport-level failure (DNS, connection refused, TLS).
    #[error("network error talking to GitLab: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("unexpected GitLab response: {message}")]
    Decode {
        /// Decoder error detail.
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl GitLabError {
    /// HTTP status carried by the error, if it came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. }
            | Self::Server { status, .. }
            | Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::RateLimited { .. } => Some(429),
            Self::Validation { .. }
            | Self::Timeout { .. }
            | Self::Network { .. }
            | Self::Decode { .. }
            | Self::Configuration { .. }
            | Self::Io { .. } => None,
        }
    }

    /// Classifies the error into one of the user-facing kinds.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Authentication { .. } => ErrorKind::Auth,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimited { .. } => ErrorKind::RateLimit,
            Self::Server { .. } => ErrorKind::Server,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Api { .. }
            | Self::Network { .. }
            | Self::Decode { .. }
            | Self::Configuration { .. }
            | Self::Io { .. } => ErrorKind::Unclassified,
        }
    }

    /// Shorthand for a validation failure.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
