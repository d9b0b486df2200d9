//! Raw GitLab REST payloads for merge request discussions and notes.
//!
//! These types mirror the subset of the v4 API that the comment pipeline
//! reads. Unknown fields are ignored and optional fields default so that
//! older GitLab releases and partially populated records still decode.

use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// GitLab user reference embedded in notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUser {
    /// Numeric user id.
    pub id: u64,
    /// Login handle without the leading `@`.
    #[serde(default)]
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// Diff anchor attached to a discussion note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPosition {
    /// File path before the change.
    #[serde(default)]
    pub old_path: Option<String>,
    /// File path after the change.
    #[serde(default)]
    pub new_path: Option<String>,
    /// Line in the old file.
    #[serde(default)]
    pub old_line: Option<u32>,
    /// Line in the new file.
    #[serde(default)]
    pub new_line: Option<u32>,
}

/// A single note, either inside a discussion or standalone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNote {
    /// Note identifier.
    pub id: u64,
    /// Markdown body.
    #[serde(default)]
    pub body: String,
    /// Author, absent for deleted accounts.
    #[serde(default)]
    pub author: Option<RawUser>,
    /// Creation timestamp as sent by the server.
    #[serde(default)]
    pub created_at: String,
    /// Last edit timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
    /// True for automated events such as label changes.
    #[serde(default)]
    pub system: bool,
    /// Whether the note can be resolved.
    #[serde(default)]
    pub resolvable: Option<bool>,
    /// Resolution state.
    #[serde(default)]
    pub resolved: Option<bool>,
    /// Who resolved the note.
    #[serde(default)]
    pub resolved_by: Option<RawUser>,
    /// Diff anchor for inline comments.
    #[serde(default)]
    pub position: Option<RawPosition>,
}

/// A discussion thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDiscussion {
    /// Thread identifier (a hex digest).
    pub id: String,
    /// True when GitLab wraps a standalone note as a one-note discussion.
    #[serde(default)]
    pub individual_note: bool,
    /// Notes in thread order.
    #[serde(default)]
    pub notes: Vec<RawNote>,
}
