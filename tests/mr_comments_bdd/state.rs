//! Scenario state and shared utilities for merge request comment BDD tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use mr_comments::comments::FixedClock;
use mr_comments::{
    ClientSettings, CommentsPipeline, GitLabClient, GitLabGateway, PersonalAccessToken,
    RetryPolicy, ToolError, handle_tool_call,
};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use serde_json::Value;
use tokio::runtime::Runtime;
use url::Url;
use wiremock::MockServer;

/// Shared runtime wrapper that can be stored in an `rstest-bdd` Slot.
#[derive(Clone)]
pub(crate) struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub(crate) fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }
}

#[derive(ScenarioState, Default)]
pub(crate) struct CommentsState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) project: Slot<String>,
    pub(crate) mr: Slot<u64>,
    pub(crate) output: Slot<String>,
    pub(crate) error: Slot<ToolError>,
}

/// Ensures a Tokio runtime and Wiremock server are initialised.
#[expect(
    clippy::expect_used,
    reason = "integration test helper; allow-expect-in-tests does not cover integration tests"
)]
pub(crate) fn ensure_runtime_and_server(state: &CommentsState) -> SharedRuntime {
    if state.runtime.with_ref(|_| ()).is_none() {
        let runtime = Runtime::new().expect("failed to create Tokio runtime");
        state.runtime.set(SharedRuntime::new(runtime));
    }

    let shared_runtime = state.runtime.get().expect("runtime not initialised");

    if state.server.with_ref(|_| ()).is_none() {
        state
            .server
            .set(shared_runtime.block_on(MockServer::start()));
    }

    shared_runtime
}

/// API path of one collection of the scenario's merge request.
#[expect(
    clippy::expect_used,
    reason = "integration test helper; allow-expect-in-tests does not cover integration tests"
)]
pub(crate) fn collection_path(state: &CommentsState, collection: &str) -> String {
    let project = state.project.get().expect("project not set");
    let mr = state.mr.get().expect("merge request not set");
    format!(
        "/api/v4/projects/{}/merge_requests/{mr}/{collection}",
        urlencoding::encode(&project)
    )
}

/// Builds the argument object for the scenario's merge request, merged with
/// `extra` flags.
#[expect(
    clippy::expect_used,
    reason = "integration test helper; allow-expect-in-tests does not cover integration tests"
)]
pub(crate) fn arguments_with(state: &CommentsState, extra: &Value) -> Value {
    let mut arguments = serde_json::json!({
        "project": state.project.get().expect("project not set"),
        "mr": state.mr.get().expect("merge request not set"),
    });
    if let (Some(target), Some(flags)) = (arguments.as_object_mut(), extra.as_object()) {
        target.extend(flags.clone());
    }
    arguments
}

/// Runs the tool against the mock server and records the outcome.
#[expect(
    clippy::expect_used,
    reason = "integration test helper; allow-expect-in-tests does not cover integration tests"
)]
pub(crate) fn invoke_tool(state: &CommentsState, arguments: Value) {
    let runtime = ensure_runtime_and_server(state);
    let server_url = state
        .server
        .with_ref(MockServer::uri)
        .expect("mock server URL missing");

    let settings = ClientSettings::new(
        Url::parse(&server_url).expect("mock server URL should parse"),
        PersonalAccessToken::new("glpat-test-token").expect("token should be valid"),
        Duration::from_secs(5),
    );
    let client = GitLabClient::new(settings).expect("client should build");
    let pipeline = CommentsPipeline::new(
        GitLabGateway::new(client),
        RetryPolicy::new(3).with_delays(Duration::ZERO, Duration::ZERO),
        FixedClock::at("2024-06-01T12:00:00Z"),
    );

    match runtime.block_on(handle_tool_call(&pipeline, arguments)) {
        Ok(text) => {
            let _had_previous_error = state.error.take().is_some();
            state.output.set(text);
        }
        Err(error) => {
            let _had_previous_output = state.output.take().is_some();
            state.error.set(error);
        }
    }
}
