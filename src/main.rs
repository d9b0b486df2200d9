//! mr-comments entrypoint: an MCP server over stdio.

use std::io::{self, Write};
use std::process::ExitCode;

use mr_comments::telemetry::{init_tracing, log_startup};
use mr_comments::{
    CommentsPipeline, GitLabClient, GitLabError, GitLabGateway, MrCommentsConfig, RetryPolicy,
    SystemClock, mcp,
};
use ortho_config::OrthoConfig;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            if writeln!(io::stderr().lock(), "{message}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), String> {
    let config = load_config().map_err(|error| error.to_string())?;
    let settings = config.settings().map_err(|error| error.to_string())?;

    init_tracing(settings.log_level()).map_err(|error| error.to_string())?;
    log_startup(&settings);

    let retry = RetryPolicy::new(settings.max_attempts());
    let client = GitLabClient::new(settings).map_err(|error| error.to_string())?;
    let pipeline = CommentsPipeline::new(GitLabGateway::new(client), retry, SystemClock);

    mcp::run_stdio(pipeline).await.map_err(|error| {
        tracing::error!(error = %error, "MCP session ended with an error");
        error.to_string()
    })
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`GitLabError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<MrCommentsConfig, GitLabError> {
    MrCommentsConfig::load().map_err(|error| GitLabError::Configuration {
        message: error.to_string(),
    })
}
