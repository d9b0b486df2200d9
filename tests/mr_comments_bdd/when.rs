//! When steps for merge request comment behavioural tests.

use rstest_bdd_macros::when;
use serde_json::json;

use crate::mr_comments_bdd_state::{CommentsState, arguments_with, invoke_tool};

#[when("the agent requests comments")]
fn request_comments(comments_state: &CommentsState) {
    invoke_tool(comments_state, arguments_with(comments_state, &json!({})));
}

#[when("the agent requests unresolved comments")]
fn request_unresolved(comments_state: &CommentsState) {
    invoke_tool(
        comments_state,
        arguments_with(comments_state, &json!({"onlyUnresolved": true})),
    );
}

#[when("the agent requests a digest")]
fn request_digest(comments_state: &CommentsState) {
    invoke_tool(
        comments_state,
        arguments_with(comments_state, &json!({"format": "digest"})),
    );
}

#[when("the agent requests both resolved and unresolved comments")]
fn request_conflicting_filters(comments_state: &CommentsState) {
    invoke_tool(
        comments_state,
        arguments_with(
            comments_state,
            &json!({"onlyResolved": true, "onlyUnresolved": true}),
        ),
    );
}
