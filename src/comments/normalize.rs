//! Maps raw discussions and notes into the unified [`Comment`] model.
//!
//! Normalization is pure: every input record yields exactly one comment and
//! nothing is filtered or reordered. Discussion-derived comments come first
//! (discussion order, then note order within each thread) followed by the
//! standalone notes in input order.

use crate::gitlab::models::{RawDiscussion, RawNote, RawPosition};

use super::model::{Comment, CommentAuthor, CommentSource, DiffPosition};

/// Flattens discussions and standalone notes into one comment list.
#[must_use]
pub fn normalize_comments(discussions: &[RawDiscussion], notes: &[RawNote]) -> Vec<Comment> {
    let thread_comments = discussions.iter().flat_map(|discussion| {
        discussion
            .notes
            .iter()
            .map(|note| normalize_discussion_note(note, &discussion.id))
    });
    let standalone = notes.iter().map(normalize_standalone_note);

    thread_comments.chain(standalone).collect()
}

fn normalize_discussion_note(note: &RawNote, thread_id: &str) -> Comment {
    let resolved_by = if note.resolved == Some(true) {
        note.resolved_by.as_ref().map(CommentAuthor::from)
    } else {
        None
    };

    Comment {
        thread_id: Some(thread_id.to_owned()),
        resolvable: note.resolvable.unwrap_or(false),
        resolved: note.resolved,
        resolved_by,
        file_path: note.position.as_ref().and_then(file_path),
        position: note.position.as_ref().map(DiffPosition::from),
        ..base_comment(note, CommentSource::Discussion)
    }
}

fn normalize_standalone_note(note: &RawNote) -> Comment {
    base_comment(note, CommentSource::Note)
}

/// Fields shared by both sources, with thread-only fields cleared.
fn base_comment(note: &RawNote, source: CommentSource) -> Comment {
    Comment {
        source,
        thread_id: None,
        note_id: note.id,
        author: note.author.as_ref().map(CommentAuthor::from),
        body: note.body.clone(),
        created_at: note.created_at.clone(),
        updated_at: note
            .updated_at
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(ToOwned::to_owned),
        system: note.system,
        resolvable: false,
        resolved: None,
        resolved_by: None,
        file_path: None,
        position: None,
    }
}

fn file_path(position: &RawPosition) -> Option<String> {
    fn non_empty(path: Option<&str>) -> Option<&str> {
        path.filter(|value| !value.is_empty())
    }

    non_empty(position.new_path.as_deref())
        .or_else(|| non_empty(position.old_path.as_deref()))
        .map(ToOwned::to_owned)
}
