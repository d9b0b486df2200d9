//! Markdown digest of merge request comments.
//!
//! The digest groups discussion comments by thread in order of first
//! appearance, then lists standalone notes in one section. Each thread shows
//! the file it is anchored to and its resolution state.

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::gitlab::error::GitLabError;

use super::clock::Clock;
use super::model::{Comment, parse_timestamp};

const THREAD_ID_PREFIX_LEN: usize = 8;
const EMPTY_NOTICE: &str = "*No comments found matching the specified filters.*";

/// Merge request the digest describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigestContext<'a> {
    /// Project path as supplied by the caller.
    pub project: &'a str,
    /// Merge request IID.
    pub mr: u64,
}

/// Renders the digest into a string.
///
/// # Errors
///
/// Returns [`GitLabError::Io`] if the rendered bytes cannot be assembled.
pub fn render_digest(
    comments: &[Comment],
    context: DigestContext<'_>,
    clock: &dyn Clock,
) -> Result<String, GitLabError> {
    let mut buffer = Vec::new();
    write_digest(&mut buffer, comments, context, clock)?;
    String::from_utf8(buffer).map_err(|error| GitLabError::Io {
        message: error.to_string(),
    })
}

/// Writes the digest to the given writer.
///
/// The clock is read once for the header timestamp.
///
/// # Errors
///
/// Returns [`GitLabError::Io`] if writing to the output fails.
pub fn write_digest<W: Write>(
    writer: &mut W,
    comments: &[Comment],
    context: DigestContext<'_>,
    clock: &dyn Clock,
) -> Result<(), GitLabError> {
    write_header(writer, comments.len(), context, clock.now())?;

    if comments.is_empty() {
        writeln!(writer, "{EMPTY_NOTICE}").map_err(|e| io_error(&e))?;
        return Ok(());
    }

    let (threads, standalone) = group_by_thread(comments);

    if !threads.is_empty() {
        writeln!(writer, "## 💬 Discussion Threads").map_err(|e| io_error(&e))?;
        writeln!(writer).map_err(|e| io_error(&e))?;
        for (thread_id, thread_comments) in &threads {
            write_thread(writer, thread_id, thread_comments)?;
        }
    }

    if !standalone.is_empty() {
        writeln!(writer, "## 📝 Overview Notes").map_err(|e| io_error(&e))?;
        writeln!(writer).map_err(|e| io_error(&e))?;
        for comment in standalone {
            write_comment(writer, comment)?;
        }
    }

    Ok(())
}

/// Writes the title block.
fn write_header<W: Write>(
    writer: &mut W,
    total: usize,
    context: DigestContext<'_>,
    generated_at: DateTime<Utc>,
) -> Result<(), GitLabError> {
    writeln!(writer, "# GitLab MR !{} Comments", context.mr).map_err(|e| io_error(&e))?;
    writeln!(writer, "**Project**: {}", context.project).map_err(|e| io_error(&e))?;
    writeln!(writer, "**Fetched**: {}", format_instant(generated_at)).map_err(|e| io_error(&e))?;
    writeln!(writer, "**Total Comments**: {total}").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "---").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

type ThreadGroup<'a> = (&'a str, Vec<&'a Comment>);

/// Splits comments into threads (first-appearance order) and standalone
/// notes.
fn group_by_thread(comments: &[Comment]) -> (Vec<ThreadGroup<'_>>, Vec<&Comment>) {
    let mut threads: Vec<ThreadGroup<'_>> = Vec::new();
    let mut standalone = Vec::new();

    for comment in comments {
        let Some(thread_id) = comment.thread_id.as_deref() else {
            standalone.push(comment);
            continue;
        };
        if let Some((_, members)) = threads.iter_mut().find(|(id, _)| *id == thread_id) {
            members.push(comment);
        } else {
            threads.push((thread_id, vec![comment]));
        }
    }

    (threads, standalone)
}

/// Writes one thread heading followed by its comments.
fn write_thread<W: Write>(
    writer: &mut W,
    thread_id: &str,
    comments: &[&Comment],
) -> Result<(), GitLabError> {
    let short_id: String = thread_id.chars().take(THREAD_ID_PREFIX_LEN).collect();
    writeln!(writer, "### Thread: {short_id}...").map_err(|e| io_error(&e))?;

    if let Some(first) = comments.first() {
        writeln!(writer, "**File**: `{}`", location(first)).map_err(|e| io_error(&e))?;
        if first.resolvable {
            writeln!(writer, "**Status**: {}", resolution_status(first))
                .map_err(|e| io_error(&e))?;
        }
    }
    writeln!(writer).map_err(|e| io_error(&e))?;

    for comment in comments {
        write_comment(writer, comment)?;
    }
    Ok(())
}

/// Writes author line, body, and separator for one comment.
fn write_comment<W: Write>(writer: &mut W, comment: &Comment) -> Result<(), GitLabError> {
    let author = comment
        .author
        .as_ref()
        .map_or("unknown", |author| author.username.as_str());
    let system_badge = if comment.system { " 🤖 _system_" } else { "" };
    let timestamp = format_timestamp(&comment.created_at);

    writeln!(writer, "**@{author}**{system_badge} • {timestamp}").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "{}", comment.body).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "---").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

fn location(comment: &Comment) -> String {
    let line = comment.position.as_ref().and_then(|position| position.line());
    match (comment.file_path.as_deref(), line) {
        (Some(path), Some(number)) => format!("{path}:{number}"),
        (Some(path), None) => path.to_owned(),
        (None, _) => "General".to_owned(),
    }
}

fn resolution_status(comment: &Comment) -> String {
    if comment.resolved == Some(true) {
        let resolver = comment
            .resolved_by
            .as_ref()
            .map(|author| author.username.as_str())
            .filter(|username| !username.is_empty())
            .unwrap_or("someone");
        format!("✅ Resolved by @{resolver}")
    } else {
        "⚠️  Unresolved".to_owned()
    }
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Formats an RFC 3339 timestamp for display, echoing unparseable input.
fn format_timestamp(raw: &str) -> String {
    parse_timestamp(raw).map_or_else(|| raw.to_owned(), format_instant)
}

/// Converts an I/O error to a [`GitLabError::Io`].
fn io_error(error: &std::io::Error) -> GitLabError {
    GitLabError::Io {
        message: error.to_string(),
    }
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod tests;
