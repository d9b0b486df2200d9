//! Classified, user-facing tool errors with remediation hints.

use thiserror::Error;

use crate::gitlab::error::{ErrorKind, GitLabError};
use crate::gitlab::rate_limit::RateLimitInfo;

/// A failure reported back to the invoking agent.
///
/// The rendered text is the message followed, when a hint exists, by a
/// blank line and `Suggestion: <hint>`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}{}", suggestion_suffix(.remediation))]
pub struct ToolError {
    kind: ErrorKind,
    message: String,
    remediation: Option<String>,
}

impl ToolError {
    /// Classification of the failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Machine-readable code such as `NOT_FOUND`.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Original error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Remediation hint, if any.
    #[must_use]
    pub fn remediation(&self) -> Option<&str> {
        self.remediation.as_deref()
    }

    /// Text for protocol error responses, prefixed with the bracketed code.
    #[must_use]
    pub fn to_protocol_message(&self) -> String {
        format!("[{}] {self}", self.code())
    }
}

impl From<GitLabError> for ToolError {
    fn from(error: GitLabError) -> Self {
        let kind = error.kind();
        let remediation = remediation_for(&error);
        Self {
            kind,
            message: error.to_string(),
            remediation,
        }
    }
}

#[expect(
    clippy::ref_option,
    reason = "thiserror passes fields to format helpers by reference"
)]
fn suggestion_suffix(remediation: &Option<String>) -> String {
    remediation
        .as_deref()
        .map_or_else(String::new, |hint| format!("\n\nSuggestion: {hint}"))
}

fn remediation_for(error: &GitLabError) -> Option<String> {
    match error {
        GitLabError::Validation { .. } => Some(
            concat!(
                "Check the tool arguments: project must be a path such as 'group/project', ",
                "mr must be the merge request IID, perPage must be 1-100, and only one of ",
                "onlyResolved or onlyUnresolved may be set."
            )
            .to_owned(),
        ),
        GitLabError::Authentication { .. } => Some(
            concat!(
                "Ensure GITLAB_TOKEN holds a personal access token with the 'read_api' ",
                "scope and that its owner can access the project."
            )
            .to_owned(),
        ),
        GitLabError::NotFound { .. } => Some(
            concat!(
                "Verify the project path (e.g. 'group/project') and that mr is the !IID ",
                "shown in GitLab rather than the internal id; the token must also be able ",
                "to see the project."
            )
            .to_owned(),
        ),
        GitLabError::RateLimited { rate_limit, .. } => Some(rate_limit_hint(rate_limit.as_ref())),
        GitLabError::Server { .. } => Some(
            "GitLab is experiencing issues; try again later or check https://status.gitlab.com."
                .to_owned(),
        ),
        GitLabError::Timeout { .. } => Some(
            concat!(
                "Increase GITLAB_REQUEST_TIMEOUT_MS or narrow the request with filters ",
                "such as includeOverviewNotes=false."
            )
            .to_owned(),
        ),
        GitLabError::Api { .. }
        | GitLabError::Network { .. }
        | GitLabError::Decode { .. }
        | GitLabError::Configuration { .. }
        | GitLabError::Io { .. } => None,
    }
}

fn rate_limit_hint(rate_limit: Option<&RateLimitInfo>) -> String {
    let base = concat!(
        "GitLab is throttling requests. Wait before retrying, or reduce request volume ",
        "with onlyUnresolved or includeOverviewNotes=false."
    );
    match rate_limit {
        Some(info) => format!(
            "{base} {} of {} requests remain; the window resets in {} seconds.",
            info.remaining(),
            info.limit(),
            info.seconds_until_reset()
        ),
        None => base.to_owned(),
    }
}
