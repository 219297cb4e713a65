//! Integration tests for the task store over real HTTP.
//!
//! Each test drives `TaskStore<HttpTaskApi>` against a mock server and
//! checks that the local collection only ever reflects server responses.

use serde_json::json;
use tasklist::api::http::{DEFAULT_REQUEST_TIMEOUT, HttpTaskApi};
use tasklist::store::TaskStore;
use tasklist_proto::task::{Task, TaskId};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn store_with_list(list: serde_json::Value) -> (MockServer, TaskStore<HttpTaskApi>) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let api = HttpTaskApi::new(&server.uri(), DEFAULT_REQUEST_TIMEOUT).unwrap();
    let store = TaskStore::new(api);
    assert!(store.refresh().await);
    (server, store)
}

fn milk(completed: bool) -> serde_json::Value {
    json!({"id": "1", "title": "Buy milk", "completed": completed})
}

#[tokio::test]
async fn add_to_empty_list() {
    let (server, store) = store_with_list(json!([])).await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(201).set_body_json(milk(false)))
        .mount(&server)
        .await;

    assert!(store.add("Buy milk", None).await);
    assert_eq!(
        store.snapshot().tasks,
        vec![Task::new("1", "Buy milk", None)]
    );
}

#[tokio::test]
async fn toggle_takes_server_state() {
    let (server, store) = store_with_list(json!([milk(false)])).await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/1/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(milk(true)))
        .mount(&server)
        .await;

    assert!(store.toggle(&TaskId::new("1")).await);
    let state = store.snapshot();
    assert_eq!(state.tasks.len(), 1);
    assert!(state.tasks[0].completed);
    assert_eq!(state.tasks[0].title, "Buy milk");
}

#[tokio::test]
async fn toggle_reply_lands_on_requested_task() {
    let (server, store) = store_with_list(json!([
        {"id": "abc", "title": "Buy milk", "completed": false}
    ]))
    .await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/abc/complete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ABC", "title": "Buy milk", "completed": true
        })))
        .mount(&server)
        .await;

    assert!(store.toggle(&TaskId::new("abc")).await);
    let state = store.snapshot();
    assert_eq!(state.tasks.len(), 1);
    assert!(state.tasks[0].completed);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn update_replaces_fields_and_keeps_identity() {
    let (server, store) = store_with_list(json!([milk(false)])).await;
    Mock::given(method("PUT"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1", "title": "Buy oat milk", "description": "2% preferred", "completed": false
        })))
        .mount(&server)
        .await;

    assert!(
        store
            .update(&TaskId::new("1"), "Buy oat milk", Some("2% preferred"))
            .await
    );
    let task = &store.snapshot().tasks[0];
    assert_eq!(task.id, TaskId::new("1"));
    assert_eq!(task.title, "Buy oat milk");
    assert_eq!(task.description.as_deref(), Some("2% preferred"));
    assert!(!task.completed);
}

#[tokio::test]
async fn remove_last_task_empties_list() {
    let (server, store) = store_with_list(json!([milk(false)])).await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Task 1 deleted successfully"})),
        )
        .mount(&server)
        .await;

    assert!(store.remove(&TaskId::new("1")).await);
    assert!(store.snapshot().tasks.is_empty());
}

#[tokio::test]
async fn failed_refresh_keeps_previous_tasks() {
    let (server, store) = store_with_list(json!([milk(false)])).await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(!store.refresh().await);
    let state = store.snapshot();
    assert_eq!(state.tasks, vec![Task::new("1", "Buy milk", None)]);
    assert!(!state.loading);
    assert!(state.error.unwrap().contains("500"));
}

#[tokio::test]
async fn every_failed_mutation_leaves_tasks_untouched() {
    let (server, store) = store_with_list(json!([milk(false)])).await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let before = store.snapshot().tasks;
    let id = TaskId::new("1");

    store.add("Walk dog", None).await;
    assert_eq!(store.snapshot().tasks, before);
    assert!(!store.snapshot().error.unwrap().is_empty());

    store.update(&id, "Changed", None).await;
    assert_eq!(store.snapshot().tasks, before);
    assert!(store.snapshot().error.unwrap().starts_with("Failed to update task"));

    store.toggle(&id).await;
    assert_eq!(store.snapshot().tasks, before);
    assert!(store.snapshot().error.unwrap().starts_with("Failed to toggle task"));

    store.remove(&id).await;
    assert_eq!(store.snapshot().tasks, before);
    assert!(store.snapshot().error.unwrap().contains("503"));
}

#[tokio::test]
async fn blank_title_is_rejected_before_any_request() {
    let (server, store) = store_with_list(json!([])).await;

    assert!(!store.add(" \t ", None).await);
    assert!(store.snapshot().error.is_some());
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "only the initial list request");
}
