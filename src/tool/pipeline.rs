//! Orchestrates one tool invocation end to end.
//!
//! Discussions and (optionally) standalone notes are fetched concurrently on
//! the current task, each under the retry policy. The first failure aborts
//! the run and drops the sibling fetch; partial results are never returned.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::comments::clock::Clock;
use crate::comments::digest::{DigestContext, render_digest};
use crate::comments::filter::filter_and_sort;
use crate::comments::model::Comment;
use crate::comments::normalize::normalize_comments;
use crate::gitlab::error::GitLabError;
use crate::gitlab::gateway::MergeRequestGateway;
use crate::gitlab::models::RawNote;
use crate::retry::{RetryPolicy, retry_with_backoff};

use super::error::ToolError;
use super::request::{CommentsRequest, OutputFormat};

/// Record counts reported alongside the comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentCounts {
    /// Comments remaining after filtering.
    pub comments: usize,
    /// Discussion threads fetched.
    pub discussions: usize,
    /// Standalone notes fetched (zero when skipped).
    pub notes: usize,
}

/// Structured result of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsOutput {
    /// Project path as requested.
    pub project: String,
    /// Merge request IID.
    pub mr: u64,
    /// When the result was assembled (RFC 3339, UTC).
    pub fetched_at: String,
    /// Record counts.
    pub counts: CommentCounts,
    /// Filtered comments, oldest first.
    pub comments: Vec<Comment>,
    /// Markdown digest when the digest format was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl CommentsOutput {
    /// Text payload returned to the agent for the requested format.
    ///
    /// # Errors
    ///
    /// Returns [`GitLabError::Decode`] if the result cannot be serialized.
    pub fn to_text(&self, format: OutputFormat) -> Result<String, GitLabError> {
        match (format, self.digest.as_ref()) {
            (OutputFormat::Digest, Some(digest)) => Ok(digest.clone()),
            _ => serde_json::to_string_pretty(self).map_err(|error| GitLabError::Decode {
                message: format!("failed to serialize result: {error}"),
            }),
        }
    }
}

/// Fetch, normalize, filter, and render pipeline.
#[derive(Debug, Clone)]
pub struct CommentsPipeline<G, C> {
    gateway: G,
    retry: RetryPolicy,
    clock: C,
}

impl<G, C> CommentsPipeline<G, C>
where
    G: MergeRequestGateway,
    C: Clock,
{
    /// Creates a pipeline over a gateway, retry policy, and clock.
    #[must_use]
    pub const fn new(gateway: G, retry: RetryPolicy, clock: C) -> Self {
        Self {
            gateway,
            retry,
            clock,
        }
    }

    /// Runs one validated request.
    ///
    /// # Errors
    ///
    /// Returns a classified [`ToolError`] for the first failing fetch, or
    /// when rendering or serialization fails.
    pub async fn run(
        &self,
        request: &CommentsRequest,
        correlation_id: &str,
    ) -> Result<CommentsOutput, ToolError> {
        let locator = &request.locator;
        let per_page = request.per_page;

        let discussions_fetch =
            retry_with_backoff(&self.retry, "list discussions", correlation_id, || {
                self.gateway.discussions(locator, per_page, correlation_id)
            });
        let notes_fetch = async {
            if request.include_overview_notes {
                retry_with_backoff(&self.retry, "list notes", correlation_id, || {
                    self.gateway.notes(locator, per_page, correlation_id)
                })
                .await
            } else {
                tracing::debug!(correlation_id, "overview notes skipped");
                Ok(Vec::<RawNote>::new())
            }
        };

        let (discussions, notes) = tokio::try_join!(discussions_fetch, notes_fetch)?;

        let normalized = normalize_comments(&discussions, &notes);
        let comments = filter_and_sort(&normalized, &request.filter);

        let digest = match request.format {
            OutputFormat::Digest => Some(render_digest(
                &comments,
                DigestContext {
                    project: locator.project().as_str(),
                    mr: locator.iid().get(),
                },
                &self.clock,
            )?),
            OutputFormat::Structured => None,
        };

        Ok(CommentsOutput {
            project: locator.project().as_str().to_owned(),
            mr: locator.iid().get(),
            fetched_at: self
                .clock
                .now()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            counts: CommentCounts {
                comments: comments.len(),
                discussions: discussions.len(),
                notes: notes.len(),
            },
            comments,
            digest,
        })
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
