//! MCP server exposing `gitlab_get_mr_comments` over stdio.
//!
//! The server is a thin transport: it forwards the raw arguments to
//! [`handle_tool_call`] and maps [`ToolError`]s onto protocol errors whose
//! message starts with the bracketed error code. Tool output reaches the
//! client as raw text through [`TextContentTransport`].

mod transport;

use std::sync::Arc;

use pmcp::shared::StdioTransport;
use pmcp::{Server, ServerCapabilities, SimpleTool, ToolHandler};
use serde_json::Value;

use crate::comments::clock::Clock;
use crate::gitlab::error::ErrorKind;
use crate::gitlab::gateway::MergeRequestGateway;
use crate::tool::{
    CommentsPipeline, TOOL_DESCRIPTION, TOOL_NAME, ToolError, handle_tool_call, input_schema,
};

pub use self::transport::TextContentTransport;

const SERVER_NAME: &str = env!("CARGO_PKG_NAME");
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds the tool handler around a shared pipeline.
pub fn comments_tool<G, C>(pipeline: Arc<CommentsPipeline<G, C>>) -> impl ToolHandler
where
    G: MergeRequestGateway + 'static,
    C: Clock + 'static,
{
    SimpleTool::new(TOOL_NAME, move |arguments: Value, _extra| {
        let pipeline = Arc::clone(&pipeline);
        Box::pin(async move {
            handle_tool_call(&*pipeline, arguments)
                .await
                .map(Value::String)
                .map_err(|error| to_protocol_error(&error))
        })
    })
    .with_description(TOOL_DESCRIPTION)
    .with_schema(input_schema())
}

/// Maps a tool failure onto the MCP error carrying `[CODE] message`.
#[must_use]
pub fn to_protocol_error(error: &ToolError) -> pmcp::Error {
    let message = error.to_protocol_message();
    match error.kind() {
        ErrorKind::Validation => pmcp::Error::Validation(message),
        _ => pmcp::Error::Internal(message),
    }
}

/// Builds the MCP server registering the comments tool.
///
/// # Errors
///
/// Returns the builder's error when the server configuration is incomplete.
pub fn build_server<G, C>(pipeline: CommentsPipeline<G, C>) -> pmcp::Result<Server>
where
    G: MergeRequestGateway + 'static,
    C: Clock + 'static,
{
    Server::builder()
        .name(SERVER_NAME)
        .version(SERVER_VERSION)
        .capabilities(ServerCapabilities::default())
        .tool(TOOL_NAME, comments_tool(Arc::new(pipeline)))
        .build()
}

/// Builds the server and serves requests on stdin/stdout until the client
/// disconnects.
///
/// # Errors
///
/// Returns the transport or protocol error that ended the session.
pub async fn run_stdio<G, C>(pipeline: CommentsPipeline<G, C>) -> pmcp::Result<()>
where
    G: MergeRequestGateway + 'static,
    C: Clock + 'static,
{
    let server = build_server(pipeline)?;

    tracing::info!(tool = TOOL_NAME, "serving MCP on stdio");
    server
        .run(TextContentTransport::new(StdioTransport::new()))
        .await
}
