//! Maps HTTP responses and transport failures onto [`GitLabError`].

use http::{HeaderMap, StatusCode};

use super::error::GitLabError;
use super::rate_limit::RateLimitInfo;

/// Checks if a GitLab status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Converts a non-success response into a classified error.
pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
) -> GitLabError {
    let detail = extract_gitlab_message(body)
        .or_else(|| status.canonical_reason().map(ToOwned::to_owned))
        .unwrap_or_else(|| "unknown error".to_owned());
    let message = format!("{operation} failed: {detail}");

    if is_auth_failure(status) {
        GitLabError::Authentication {
            status: status.as_u16(),
            message,
        }
    } else if status == StatusCode::NOT_FOUND {
        GitLabError::NotFound { message }
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        GitLabError::RateLimited {
            rate_limit: RateLimitInfo::from_headers(headers),
            message,
        }
    } else if status.is_server_error() {
        GitLabError::Server {
            status: status.as_u16(),
            message,
        }
    } else {
        GitLabError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Converts a reqwest failure into a classified error.
pub(super) fn map_transport_error(
    operation: &str,
    error: &reqwest::Error,
    timeout_ms: u64,
) -> GitLabError {
    if error.is_timeout() {
        GitLabError::Timeout {
            operation: operation.to_owned(),
            timeout_ms,
        }
    } else if error.is_decode() {
        GitLabError::Decode {
            message: format!("{operation}: {error}"),
        }
    } else {
        GitLabError::Network {
            message: format!("{operation} failed: {error}"),
        }
    }
}

/// Pulls the human-readable message out of a GitLab error body.
///
/// GitLab uses either `{"message": ...}` or `{"error": ...}`, and the
/// message may itself be an object of field errors.
pub(super) fn extract_gitlab_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    let field = value.get("message").or_else(|| value.get("error"))?;
    match field {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
