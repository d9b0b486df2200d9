//! Then steps for merge request comment behavioural tests.

use rstest_bdd_macros::then;
use serde_json::Value;

use crate::mr_comments_bdd_state::CommentsState;

#[expect(
    clippy::expect_used,
    reason = "integration test helper; allow-expect-in-tests does not cover integration tests"
)]
fn structured_output(comments_state: &CommentsState) -> Value {
    let Some(text) = comments_state.output.get() else {
        let error = comments_state.error.with_ref(Clone::clone);
        panic!("tool output missing; last error: {error:?}");
    };
    serde_json::from_str(&text).expect("structured output should be JSON")
}

#[then("the result contains only thread {thread}")]
fn only_thread(comments_state: &CommentsState, thread: String) {
    let expected = thread.trim_matches('"');
    let output = structured_output(comments_state);
    let comments = output["comments"]
        .as_array()
        .cloned()
        .unwrap_or_default();

    assert!(!comments.is_empty(), "expected at least one comment");
    for comment in comments {
        assert_eq!(comment["thread_id"], expected, "unexpected comment {comment}");
    }
}

#[then(
    "the result counts {comments:u64} comments from {discussions:u64} discussions and {notes:u64} notes"
)]
fn counts(comments_state: &CommentsState, comments: u64, discussions: u64, notes: u64) {
    let output = structured_output(comments_state);

    assert_eq!(output["counts"]["comments"], comments);
    assert_eq!(output["counts"]["discussions"], discussions);
    assert_eq!(output["counts"]["notes"], notes);
}

#[then("the digest mentions the project and merge request")]
fn digest_mentions_target(comments_state: &CommentsState) {
    let Some(digest) = comments_state.output.get() else {
        let error = comments_state.error.with_ref(Clone::clone);
        panic!("digest missing; last error: {error:?}");
    };

    assert!(digest.contains("group/project"), "digest: {digest}");
    assert!(digest.contains("123"), "digest: {digest}");
    assert!(digest.contains("**File**: `src/lib.rs:42`"), "digest: {digest}");
}

#[then("the digest has an overview notes section")]
fn digest_has_overview_section(comments_state: &CommentsState) {
    let digest = comments_state.output.get().unwrap_or_default();

    assert!(digest.contains("## 📝 Overview Notes"), "digest: {digest}");
    assert!(digest.contains("**@carol**"), "digest: {digest}");
    assert!(
        !digest.contains("changed the description"),
        "system notes are hidden by default"
    );
}

#[then("the tool fails with code {code}")]
fn fails_with_code(comments_state: &CommentsState, code: String) {
    let expected = code.trim_matches('"');
    let Some(error) = comments_state.error.with_ref(Clone::clone) else {
        let output = comments_state.output.get();
        panic!("expected failure {expected}, got output {output:?}");
    };

    assert_eq!(error.code(), expected, "unexpected error: {error}");
    assert!(
        error.to_protocol_message().starts_with(&format!("[{expected}]")),
        "protocol message should lead with the code"
    );
}

#[then("the error suggests a remediation")]
fn suggests_remediation(comments_state: &CommentsState) {
    let Some(error) = comments_state.error.with_ref(Clone::clone) else {
        panic!("expected a tool error");
    };

    assert!(error.remediation().is_some());
    assert!(error.to_string().contains("\n\nSuggestion: "));
}

#[then("the GitLab mocks are satisfied")]
#[expect(
    clippy::expect_used,
    reason = "integration test step; allow-expect-in-tests does not cover integration tests"
)]
fn verify_mocks(comments_state: &CommentsState) {
    let runtime = comments_state.runtime.get().expect("runtime not initialised");
    comments_state
        .server
        .with_ref(|server| runtime.block_on(server.verify()))
        .expect("mock server not initialised");
}
