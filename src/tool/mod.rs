//! The `gitlab_get_mr_comments` tool: argument validation, the fetch
//! pipeline, and classified errors.
//!
//! [`handle_tool_call`] is the single entry point used by the MCP server. It
//! validates the raw JSON arguments before any request is made, assigns a
//! correlation id to the run, and returns the text payload for the requested
//! format.

pub mod error;
pub mod pipeline;
pub mod request;
pub mod schema;

use serde_json::Value;
use uuid::Uuid;

use crate::comments::clock::Clock;
use crate::gitlab::gateway::MergeRequestGateway;

pub use error::ToolError;
pub use pipeline::{CommentCounts, CommentsOutput, CommentsPipeline};
pub use request::{CommentsRequest, OutputFormat, RawToolInput};
pub use schema::input_schema;

/// Name the tool is published under.
pub const TOOL_NAME: &str = "gitlab_get_mr_comments";

/// Description shown to invoking agents.
pub const TOOL_DESCRIPTION: &str = concat!(
    "Fetch review comments for a GitLab merge request. Returns discussion threads ",
    "(including inline diff comments with file and line) and, optionally, overview ",
    "notes. Supports filtering by resolution state, hiding system notes, and a ",
    "Markdown digest grouped by thread."
);

/// Validates `arguments`, runs the pipeline, and renders the result text.
///
/// # Errors
///
/// Returns a [`ToolError`] with code `VALIDATION_ERROR` when the arguments
/// are malformed (no request is sent in that case), or the classified
/// failure of the first fetch that failed.
pub async fn handle_tool_call<G, C>(
    pipeline: &CommentsPipeline<G, C>,
    arguments: Value,
) -> Result<String, ToolError>
where
    G: MergeRequestGateway,
    C: Clock,
{
    let correlation_id = Uuid::new_v4().to_string();

    let request = CommentsRequest::from_arguments(arguments).map_err(|error| {
        let failure = ToolError::from(error);
        tracing::error!(
            tool = TOOL_NAME,
            correlation_id = %correlation_id,
            code = failure.code(),
            error = failure.message(),
            "tool arguments rejected"
        );
        failure
    })?;

    tracing::info!(
        tool = TOOL_NAME,
        correlation_id = %correlation_id,
        project = request.locator.project().as_str(),
        mr = request.locator.iid().get(),
        include_overview_notes = request.include_overview_notes,
        per_page = request.per_page.get(),
        "tool invoked"
    );

    let outcome = pipeline
        .run(&request, &correlation_id)
        .await
        .and_then(|output| {
            let text = output.to_text(request.format)?;
            Ok((output.counts, text))
        });

    match outcome {
        Ok((counts, text)) => {
            tracing::info!(
                tool = TOOL_NAME,
                correlation_id = %correlation_id,
                comments = counts.comments,
                discussions = counts.discussions,
                notes = counts.notes,
                "tool completed"
            );
            Ok(text)
        }
        Err(failure) => {
            tracing::error!(
                tool = TOOL_NAME,
                correlation_id = %correlation_id,
                code = failure.code(),
                error = failure.message(),
                "tool failed"
            );
            Err(failure)
        }
    }
}
