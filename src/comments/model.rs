//! Unified comment entity shared by discussions and standalone notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gitlab::models::{RawPosition, RawUser};

/// Where a comment was retrieved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentSource {
    /// A note inside a discussion thread.
    Discussion,
    /// A standalone note from the notes endpoint.
    Note,
}

/// Identity of a comment author or resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    /// Numeric user id.
    pub id: u64,
    /// Login handle.
    pub username: String,
    /// Display name.
    pub name: String,
}

impl From<&RawUser> for CommentAuthor {
    fn from(user: &RawUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}

/// Diff anchor of an inline discussion comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffPosition {
    /// Path before the change.
    pub old_path: Option<String>,
    /// Path after the change.
    pub new_path: Option<String>,
    /// Line in the old file.
    pub old_line: Option<u32>,
    /// Line in the new file.
    pub new_line: Option<u32>,
}

impl From<&RawPosition> for DiffPosition {
    fn from(position: &RawPosition) -> Self {
        Self {
            old_path: position.old_path.clone(),
            new_path: position.new_path.clone(),
            old_line: position.old_line,
            new_line: position.new_line,
        }
    }
}

impl DiffPosition {
    /// Line to cite, preferring the new side.
    #[must_use]
    pub const fn line(&self) -> Option<u32> {
        match self.new_line {
            Some(line) => Some(line),
            None => self.old_line,
        }
    }
}

/// A single review comment in the unified model.
///
/// Standalone notes never carry thread, resolution, or position data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Provenance.
    pub source: CommentSource,
    /// Discussion identifier, absent for standalone notes.
    pub thread_id: Option<String>,
    /// Note identifier.
    pub note_id: u64,
    /// Author, absent for deleted accounts.
    pub author: Option<CommentAuthor>,
    /// Markdown body, verbatim.
    pub body: String,
    /// Creation timestamp, verbatim.
    pub created_at: String,
    /// Last edit timestamp, absent when never edited.
    pub updated_at: Option<String>,
    /// Automated event flag.
    pub system: bool,
    /// Whether the comment participates in resolution.
    pub resolvable: bool,
    /// Resolution state when known.
    pub resolved: Option<bool>,
    /// Resolver, only present when resolved.
    pub resolved_by: Option<CommentAuthor>,
    /// File the comment is anchored to.
    pub file_path: Option<String>,
    /// Full diff anchor.
    pub position: Option<DiffPosition>,
}

impl Comment {
    /// Parses `created_at` as an RFC 3339 instant.
    #[must_use]
    pub fn created_instant(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}
