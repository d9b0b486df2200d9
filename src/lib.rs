//! mr-comments library crate providing GitLab merge request comment digests.
//!
//! The library walks a merge request's discussions and overview notes
//! through GitLab's paginated REST API, normalizes them into one comment
//! model, filters and sorts them, and optionally renders a Markdown digest.
//! The whole pipeline is exposed to agents as the `gitlab_get_mr_comments`
//! MCP tool.

pub mod comments;
pub mod config;
pub mod gitlab;
pub mod mcp;
pub mod retry;
pub mod telemetry;
pub mod tool;

pub use comments::{Clock, Comment, SystemClock};
pub use config::{ClientSettings, LogLevel, MrCommentsConfig};
pub use gitlab::{
    GitLabClient, GitLabError, GitLabGateway, MergeRequestGateway, MergeRequestLocator,
    PersonalAccessToken,
};
pub use retry::RetryPolicy;
pub use tool::{CommentsOutput, CommentsPipeline, ToolError, handle_tool_call};
