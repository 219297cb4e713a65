//! Integration tests for the HTTP task client against a mock server.
//!
//! Verifies request shapes (method, path, body) and the mapping of every
//! failure mode to `TransportError`.

use std::time::Duration;

use serde_json::json;
use tasklist::api::http::{DEFAULT_REQUEST_TIMEOUT, HttpTaskApi};
use tasklist::api::{TaskApi, TransportError};
use tasklist_proto::task::{TaskDraft, TaskId};
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, HttpTaskApi) {
    let server = MockServer::start().await;
    let api = HttpTaskApi::new(&server.uri(), DEFAULT_REQUEST_TIMEOUT).unwrap();
    (server, api)
}

fn milk_json(completed: bool) -> serde_json::Value {
    json!({"id": "1", "title": "Buy milk", "description": "", "completed": completed})
}

#[tokio::test]
async fn list_returns_tasks_in_server_order() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "b", "title": "second", "completed": true},
            {"id": "a", "title": "first", "description": "with notes", "completed": false},
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = api.list_tasks().await.unwrap();
    let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
    assert!(tasks[0].completed);
    assert_eq!(tasks[0].description, None);
    assert_eq!(tasks[1].description.as_deref(), Some("with notes"));
}

#[tokio::test]
async fn list_error_status_carries_code() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = api.list_tasks().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn get_fetches_single_task() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(milk_json(false)))
        .mount(&server)
        .await;

    let task = api.get_task(&TaskId::new("1")).await.unwrap();
    assert_eq!(task.title, "Buy milk");
    assert!(!task.completed);
}

#[tokio::test]
async fn create_posts_json_without_empty_description() {
    let (server, api) = setup().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"title": "Buy milk"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(milk_json(false)))
        .expect(1)
        .mount(&server)
        .await;

    let draft = TaskDraft::new("Buy milk", Some("")).unwrap();
    let task = api.create_task(&draft).await.unwrap();
    assert_eq!(task.id, TaskId::new("1"));
    assert_eq!(task.description, None);
}

#[tokio::test]
async fn create_sends_description_when_present() {
    let (server, api) = setup().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({"title": "Buy milk", "description": "2%"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "1", "title": "Buy milk", "description": "2%", "completed": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = TaskDraft::new("Buy milk", Some("2%")).unwrap();
    let task = api.create_task(&draft).await.unwrap();
    assert_eq!(task.description.as_deref(), Some("2%"));
}

#[tokio::test]
async fn update_puts_to_task_path() {
    let (server, api) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/tasks/1"))
        .and(body_json(json!({"title": "Buy oat milk", "description": "2% preferred"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1", "title": "Buy oat milk", "description": "2% preferred", "completed": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let draft = TaskDraft::new("Buy oat milk", Some("2% preferred")).unwrap();
    let task = api.update_task(&TaskId::new("1"), &draft).await.unwrap();
    assert_eq!(task.title, "Buy oat milk");
}

#[tokio::test]
async fn update_not_found_is_transport_error() {
    let (server, api) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/tasks/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Task not found"})))
        .mount(&server)
        .await;

    let draft = TaskDraft::new("x", None).unwrap();
    let err = api.update_task(&TaskId::new("9"), &draft).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn toggle_patches_with_empty_body() {
    let (server, api) = setup().await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/1/complete"))
        .and(body_string(""))
        .respond_with(ResponseTemplate::new(200).set_body_json(milk_json(true)))
        .expect(1)
        .mount(&server)
        .await;

    let task = api.toggle_task(&TaskId::new("1")).await.unwrap();
    assert!(task.completed);
}

#[tokio::test]
async fn delete_ignores_response_body() {
    let (server, api) = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not even json"))
        .expect(1)
        .mount(&server)
        .await;

    api.delete_task(&TaskId::new("1")).await.unwrap();
}

#[tokio::test]
async fn ids_are_percent_encoded_as_one_segment() {
    let (server, api) = setup().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/a%2Fb"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    api.delete_task(&TaskId::new("a/b")).await.unwrap();
}

#[tokio::test]
async fn base_url_path_prefix_is_honored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpTaskApi::new(&format!("{}/api", server.uri()), DEFAULT_REQUEST_TIMEOUT).unwrap();
    assert!(api.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"tasks\": []}"))
        .mount(&server)
        .await;

    let err = api.list_tasks().await.unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let api = HttpTaskApi::new(&server.uri(), Duration::from_millis(100)).unwrap();
    let err = api.list_tasks().await.unwrap_err();
    assert!(matches!(err, TransportError::Request(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn unreachable_server_is_request_error() {
    // Bind then drop a listener so the port is very likely closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpTaskApi::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = api.list_tasks().await.unwrap_err();
    assert!(matches!(err, TransportError::Request(_)));
    assert_eq!(err.status(), None);
}
