//! Identity wrappers for addressing a merge request.

use std::fmt;

use super::error::GitLabError;

/// Project path or numeric id, for example `group/subgroup/project`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPath(String);

impl ProjectPath {
    /// Validates that the path is non-blank and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Validation`] when the supplied string is blank.
    pub fn new(value: impl AsRef<str>) -> Result<Self, GitLabError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(GitLabError::validation("project must be a non-empty string"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the project path.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Path encoded as a single URL segment (`group/project` becomes
    /// `group%2Fproject`).
    #[must_use]
    pub fn encoded(&self) -> String {
        urlencoding::encode(&self.0).into_owned()
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Project-scoped merge request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRequestIid(u64);

impl MergeRequestIid {
    /// Validates that the IID is positive.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Validation`] when the value is zero.
    pub fn new(value: u64) -> Result<Self, GitLabError> {
        if value == 0 {
            return Err(GitLabError::validation("mr must be a positive integer"));
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MergeRequestIid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Personal access token wrapper enforcing presence.
///
/// The `Debug` implementation never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Configuration`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, GitLabError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(GitLabError::Configuration {
                message: "GitLab token is blank".to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PersonalAccessToken(<redacted>)")
    }
}

/// A merge request within a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestLocator {
    project: ProjectPath,
    iid: MergeRequestIid,
}

impl MergeRequestLocator {
    /// Creates a locator from validated parts.
    #[must_use]
    pub const fn new(project: ProjectPath, iid: MergeRequestIid) -> Self {
        Self { project, iid }
    }

    /// Project the merge request belongs to.
    #[must_use]
    pub const fn project(&self) -> &ProjectPath {
        &self.project
    }

    /// Merge request IID.
    #[must_use]
    pub const fn iid(&self) -> MergeRequestIid {
        self.iid
    }

    pub(crate) fn merge_request_path(&self) -> String {
        format!(
            "/api/v4/projects/{}/merge_requests/{}",
            self.project.encoded(),
            self.iid.get()
        )
    }

    pub(crate) fn discussions_path(&self) -> String {
        format!("{}/discussions", self.merge_request_path())
    }

    pub(crate) fn notes_path(&self) -> String {
        format!("{}/notes", self.merge_request_path())
    }
}
