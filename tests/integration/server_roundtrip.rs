//! End-to-end tests: the HTTP client and store against the in-process
//! task server bound to an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tasklist::api::TaskApi;
use tasklist::api::http::{DEFAULT_REQUEST_TIMEOUT, HttpTaskApi};
use tasklist::store::{TaskListState, TaskStore};
use tasklist::sync::{self, StoreCommand};
use tasklist_proto::task::{TaskDraft, TaskId};
use tasklist_server::server::{ServerState, start_server, start_server_with_state};
use tokio::sync::watch;

/// Start the task server in-process and return a client for it.
async fn start() -> (HttpTaskApi, tokio::task::JoinHandle<()>) {
    let (addr, handle) = start_server("127.0.0.1:0")
        .await
        .expect("failed to start task server");
    let api = HttpTaskApi::new(&format!("http://{addr}"), DEFAULT_REQUEST_TIMEOUT).unwrap();
    (api, handle)
}

async fn wait_for(
    rx: &mut watch::Receiver<TaskListState>,
    pred: impl Fn(&TaskListState) -> bool,
) -> TaskListState {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| pred(s)))
        .await
        .expect("timed out waiting for state")
        .expect("store dropped")
        .clone()
}

#[tokio::test]
async fn crud_through_the_store() {
    let (api, _server) = start().await;
    let store = TaskStore::new(api);

    assert!(store.refresh().await);
    assert!(store.snapshot().tasks.is_empty());

    assert!(store.add("Buy milk", None).await);
    let created = store.snapshot().tasks[0].clone();
    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);
    assert!(!created.id.as_str().is_empty());

    assert!(store.toggle(&created.id).await);
    assert!(store.snapshot().tasks[0].completed);
    assert!(store.toggle(&created.id).await);
    assert!(!store.snapshot().tasks[0].completed);

    assert!(
        store
            .update(&created.id, "Buy oat milk", Some("2% preferred"))
            .await
    );
    let updated = store.snapshot().tasks[0].clone();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Buy oat milk");
    assert_eq!(updated.description.as_deref(), Some("2% preferred"));

    assert!(store.remove(&created.id).await);
    assert!(store.snapshot().tasks.is_empty());

    // A fresh list agrees with what the store reconciled locally.
    assert!(store.refresh().await);
    assert!(store.snapshot().tasks.is_empty());
}

#[tokio::test]
async fn refresh_matches_server_order() {
    let (api, _server) = start().await;
    for title in ["one", "two", "three"] {
        api.create_task(&TaskDraft::new(title, None).unwrap())
            .await
            .unwrap();
    }

    let store = TaskStore::new(api);
    assert!(store.refresh().await);
    let titles: Vec<_> = store
        .snapshot()
        .tasks
        .iter()
        .map(|t| t.title.clone())
        .collect();
    assert_eq!(titles, ["one", "two", "three"]);
}

#[tokio::test]
async fn unknown_id_is_reported_as_error() {
    let (api, _server) = start().await;
    let store = TaskStore::new(api);

    assert!(!store.toggle(&TaskId::new("does-not-exist")).await);
    let error = store.snapshot().error.unwrap();
    assert!(error.starts_with("Failed to toggle task"));
    assert!(error.contains("404"));
}

#[tokio::test]
async fn server_rejects_what_the_client_would_not_send() {
    let (api, _server) = start().await;
    // Bypass client-side validation by building the draft by hand.
    let draft = TaskDraft {
        title: "   ".to_string(),
        description: None,
    };
    let err = api.create_task(&draft).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn get_returns_created_task() {
    let (api, _server) = start().await;
    let created = api
        .create_task(&TaskDraft::new("Buy milk", Some("2%")).unwrap())
        .await
        .unwrap();

    let fetched = api.get_task(&created.id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn concurrent_adds_all_land() {
    let (api, _server) = start().await;
    let store = TaskStore::new(api);

    let titles: Vec<String> = (0..8).map(|i| format!("task {i}")).collect();
    let results = join_all(titles.iter().map(|t| store.add(t, None))).await;
    assert!(results.iter().all(|ok| *ok));

    let local = store.snapshot().tasks;
    assert_eq!(local.len(), titles.len());

    // Server order may differ from completion order, but the sets agree.
    assert!(store.refresh().await);
    let mut remote: Vec<_> = store.snapshot().tasks.into_iter().map(|t| t.id).collect();
    let mut local: Vec<_> = local.into_iter().map(|t| t.id).collect();
    remote.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    local.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(remote, local);
}

#[tokio::test]
async fn spawned_store_loads_on_start_and_applies_commands() {
    let state = Arc::new(ServerState::new());
    let (addr, _server) = start_server_with_state("127.0.0.1:0", Arc::clone(&state))
        .await
        .unwrap();
    state
        .tasks
        .create(TaskDraft::new("Preloaded", None).unwrap())
        .await;

    let api = HttpTaskApi::new(&format!("http://{addr}"), DEFAULT_REQUEST_TIMEOUT).unwrap();
    let handle = sync::spawn_store(api, sync::DEFAULT_COMMAND_CAPACITY);
    let mut rx = handle.state();

    let loaded = wait_for(&mut rx, |s| s.synced_at.is_some() && !s.loading).await;
    assert_eq!(loaded.tasks.len(), 1);
    assert_eq!(loaded.tasks[0].title, "Preloaded");

    handle
        .send(StoreCommand::Add {
            title: "Buy milk".to_string(),
            description: Some("2%".to_string()),
        })
        .unwrap();
    let added = wait_for(&mut rx, |s| s.tasks.len() == 2).await;
    let id = added.tasks[1].id.clone();

    handle.send(StoreCommand::Toggle(id.clone())).unwrap();
    wait_for(&mut rx, |s| s.tasks.get(1).is_some_and(|t| t.completed)).await;

    handle.send(StoreCommand::Remove(id)).unwrap();
    wait_for(&mut rx, |s| s.tasks.len() == 1).await;

    assert_eq!(state.tasks.len().await, 1);
    handle.shutdown().await;
}
