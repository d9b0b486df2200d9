//! Tool arguments and their validation.
//!
//! Arguments arrive as camelCase JSON. Unknown fields are ignored, omitted
//! fields take their documented defaults, and every check runs before any
//! request is sent to GitLab.

use serde::Deserialize;
use serde_json::Value;

use crate::comments::filter::FilterOptions;
use crate::gitlab::error::GitLabError;
use crate::gitlab::locator::{MergeRequestIid, MergeRequestLocator, ProjectPath};
use crate::gitlab::pagination::PerPage;

/// How the tool presents its result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON result.
    #[default]
    Structured,
    /// Markdown digest text only.
    Digest,
}

impl OutputFormat {
    fn parse(value: &str) -> Result<Self, GitLabError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "structured" | "json" => Ok(Self::Structured),
            "digest" | "markdown" => Ok(Self::Digest),
            other => Err(GitLabError::validation(format!(
                "format must be \"structured\" or \"digest\", got \"{other}\""
            ))),
        }
    }
}

/// Merge request number as either a JSON integer or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum MrArgument {
    Integer(i64),
    Text(String),
}

impl MrArgument {
    fn into_iid(self) -> Result<MergeRequestIid, GitLabError> {
        let invalid = || GitLabError::validation("mr must be a positive integer");
        let value = match self {
            Self::Integer(number) => u64::try_from(number).map_err(|_| invalid())?,
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                trimmed.parse::<u64>().map_err(|_| invalid())?
            }
        };
        MergeRequestIid::new(value)
    }
}

/// Arguments exactly as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawToolInput {
    project: Option<String>,
    mr: Option<MrArgument>,
    include_system: Option<bool>,
    include_overview_notes: Option<bool>,
    only_resolved: Option<bool>,
    only_unresolved: Option<bool>,
    per_page: Option<i64>,
    format: Option<String>,
}

impl RawToolInput {
    /// Decodes tool arguments from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Validation`] when a field has the wrong JSON
    /// type.
    pub fn from_value(arguments: Value) -> Result<Self, GitLabError> {
        let object = if arguments.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            arguments
        };
        serde_json::from_value(object)
            .map_err(|error| GitLabError::validation(format!("invalid arguments: {error}")))
    }

    /// Applies defaults and checks every constraint.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Validation`] for a blank project, a missing or
    /// non-positive `mr`, a `perPage` outside 1–100, an unknown format, or
    /// when both resolution filters are set.
    pub fn validate(self) -> Result<CommentsRequest, GitLabError> {
        let project = ProjectPath::new(self.project.unwrap_or_default())?;
        let iid = self
            .mr
            .ok_or_else(|| GitLabError::validation("mr is required"))?
            .into_iid()?;
        let per_page = self
            .per_page
            .map_or_else(|| Ok(PerPage::default()), PerPage::new)?;
        let filter = FilterOptions::from_flags(
            self.include_system.unwrap_or(false),
            self.only_resolved.unwrap_or(false),
            self.only_unresolved.unwrap_or(false),
        )?;
        let format = self
            .format
            .as_deref()
            .map_or_else(|| Ok(OutputFormat::default()), OutputFormat::parse)?;

        Ok(CommentsRequest {
            locator: MergeRequestLocator::new(project, iid),
            per_page,
            filter,
            include_overview_notes: self.include_overview_notes.unwrap_or(true),
            format,
        })
    }
}

/// Validated request for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentsRequest {
    /// Target merge request.
    pub locator: MergeRequestLocator,
    /// Page size for both collections.
    pub per_page: PerPage,
    /// Inclusion predicates.
    pub filter: FilterOptions,
    /// Whether to fetch standalone notes at all.
    pub include_overview_notes: bool,
    /// Presentation of the result.
    pub format: OutputFormat,
}

impl CommentsRequest {
    /// Decodes and validates raw tool arguments in one step.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Validation`] on any malformed argument.
    pub fn from_arguments(arguments: Value) -> Result<Self, GitLabError> {
        RawToolInput::from_value(arguments)?.validate()
    }
}
