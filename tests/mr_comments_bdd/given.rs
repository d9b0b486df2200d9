//! Given steps for merge request comment behavioural tests.

use mr_comments::gitlab::models::test_support::{discussion, note, user};
use rstest_bdd_macros::given;
use serde_json::json;
use wiremock::matchers::{any, method, path, path_regex, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::mr_comments_bdd_state::{CommentsState, collection_path, ensure_runtime_and_server};

fn mount(state: &CommentsState, mock: Mock) {
    let runtime = ensure_runtime_and_server(state);
    let mounted = state
        .server
        .with_ref(|server| runtime.block_on(mock.mount(server)));
    assert!(mounted.is_some(), "mock server not initialised");
}

#[given("a GitLab server for project {project} merge request {mr:u64}")]
fn gitlab_server(comments_state: &CommentsState, project: String, mr: u64) {
    ensure_runtime_and_server(comments_state);
    comments_state
        .project
        .set(project.trim_matches('"').to_owned());
    comments_state.mr.set(mr);
}

#[given("the merge request has an unresolved thread {open} and a resolved thread {closed}")]
fn two_threads(comments_state: &CommentsState, open: String, closed: String) {
    let discussions = vec![
        discussion(
            open.trim_matches('"'),
            vec![
                note(1, "Please handle the error case", "2024-01-01T10:00:00Z")
                    .by(user(1, "alice"))
                    .at(None, Some("src/lib.rs"), Some(42))
                    .with_resolution(false, None),
            ],
        ),
        discussion(
            closed.trim_matches('"'),
            vec![
                note(2, "Typo in docs", "2024-01-01T09:00:00Z")
                    .by(user(2, "bob"))
                    .with_resolution(true, Some(user(2, "bob"))),
            ],
        ),
    ];

    let mock = Mock::given(method("GET"))
        .and(path(collection_path(comments_state, "discussions")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&discussions))
        .named("discussions");
    mount(comments_state, mock);
}

#[given("the merge request has an overview note by {author}")]
fn overview_note(comments_state: &CommentsState, author: String) {
    let notes = vec![
        note(3, "Thanks for the review!", "2024-01-01T11:00:00Z")
            .by(user(3, author.trim_matches('"'))),
        note(4, "changed the description", "2024-01-01T08:00:00Z").as_system(),
    ];

    let mock = Mock::given(method("GET"))
        .and(path(collection_path(comments_state, "notes")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&notes))
        .named("notes");
    mount(comments_state, mock);
}

#[given("the merge request has no overview notes")]
fn no_overview_notes(comments_state: &CommentsState) {
    let mock = Mock::given(method("GET"))
        .and(path(collection_path(comments_state, "notes")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .named("notes (empty)");
    mount(comments_state, mock);
}

#[given("the discussions span two pages")]
fn two_pages_of_discussions(comments_state: &CommentsState) {
    let discussions_path = collection_path(comments_state, "discussions");
    let first_page = vec![
        discussion("d1", vec![note(1, "first", "2024-01-01T10:00:00Z")]),
        discussion("d2", vec![note(2, "second", "2024-01-01T10:01:00Z")]),
    ];
    let second_page = vec![discussion(
        "d3",
        vec![note(3, "third", "2024-01-01T10:02:00Z")],
    )];

    let first = Mock::given(method("GET"))
        .and(path(discussions_path.clone()))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-page", "1")
                .insert_header("x-total-pages", "2")
                .insert_header("x-next-page", "2")
                .set_body_json(&first_page),
        )
        .expect(1)
        .named("discussions page 1");
    let second = Mock::given(method("GET"))
        .and(path(discussions_path))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-page", "2")
                .insert_header("x-total-pages", "2")
                .insert_header("x-next-page", "")
                .set_body_json(&second_page),
        )
        .expect(1)
        .named("discussions page 2");

    mount(comments_state, first);
    mount(comments_state, second);
}

#[given("the project does not exist")]
fn missing_project(comments_state: &CommentsState) {
    let mock = Mock::given(method("GET"))
        .and(path_regex(r"^/api/v4/projects/.+"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "404 Project Not Found"})),
        )
        .named("missing project");
    mount(comments_state, mock);
}

#[given("the discussions endpoint keeps failing with {status:u16}")]
fn failing_discussions(comments_state: &CommentsState, status: u16) {
    let mock = Mock::given(method("GET"))
        .and(path(collection_path(comments_state, "discussions")))
        .respond_with(
            ResponseTemplate::new(status).set_body_json(json!({"message": "Service Unavailable"})),
        )
        .expect(3)
        .named("failing discussions");
    mount(comments_state, mock);
}

#[given("no request may reach the server")]
fn no_requests(comments_state: &CommentsState) {
    let mock = Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .named("no requests");
    mount(comments_state, mock);
}
