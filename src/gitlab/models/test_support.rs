//! Builders for raw GitLab payload fixtures.
//!
//! # Examples
//!
//! ```
//! use mr_comments::gitlab::models::test_support::{discussion, note, user};
//!
//! let thread = discussion("t1", vec![note(1, "Looks good", "2024-01-01T00:00:00Z")
//!     .by(user(7, "alice"))]);
//! assert_eq!(thread.notes.len(), 1);
//! ```

use super::{RawDiscussion, RawNote, RawPosition, RawUser};

/// Creates a user whose display name is the capitalised handle.
#[must_use]
pub fn user(id: u64, username: &str) -> RawUser {
    let mut chars = username.chars();
    let name = chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default();
    RawUser {
        id,
        username: username.to_owned(),
        name,
    }
}

/// Creates a plain, non-resolvable note with no author.
#[must_use]
pub fn note(id: u64, body: &str, created_at: &str) -> RawNote {
    RawNote {
        id,
        body: body.to_owned(),
        created_at: created_at.to_owned(),
        ..RawNote::default()
    }
}

/// Creates a discussion thread.
#[must_use]
pub fn discussion(id: &str, notes: Vec<RawNote>) -> RawDiscussion {
    RawDiscussion {
        id: id.to_owned(),
        individual_note: false,
        notes,
    }
}

impl RawNote {
    /// Sets the author.
    #[must_use]
    pub fn by(mut self, author: RawUser) -> Self {
        self.author = Some(author);
        self
    }

    /// Marks the note as an automated system event.
    #[must_use]
    pub const fn as_system(mut self) -> Self {
        self.system = true;
        self
    }

    /// Makes the note resolvable with the given state.
    #[must_use]
    pub fn with_resolution(mut self, resolved: bool, resolved_by: Option<RawUser>) -> Self {
        self.resolvable = Some(true);
        self.resolved = Some(resolved);
        self.resolved_by = resolved_by;
        self
    }

    /// Anchors the note to a diff position.
    #[must_use]
    pub fn at(
        mut self,
        old_path: Option<&str>,
        new_path: Option<&str>,
        new_line: Option<u32>,
    ) -> Self {
        self.position = Some(RawPosition {
            old_path: old_path.map(ToOwned::to_owned),
            new_path: new_path.map(ToOwned::to_owned),
            old_line: None,
            new_line,
        });
        self
    }

    /// Sets the edit timestamp.
    #[must_use]
    pub fn edited_at(mut self, updated_at: &str) -> Self {
        self.updated_at = Some(updated_at.to_owned());
        self
    }
}
