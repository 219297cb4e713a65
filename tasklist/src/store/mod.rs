//! Task synchronization store.
//!
//! [`TaskStore`] owns the client-side view of the task list and mediates
//! every mutation: it calls the [`TaskApi`], then reconciles its collection
//! from the server's response. Nothing is applied optimistically; a failed
//! call leaves the collection exactly as it was and records an error message
//! instead.
//!
//! State is published through a [`tokio::sync::watch`] channel so the UI can
//! hold a cheap receiver and redraw whenever a new snapshot is available.

pub mod reconcile;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use tasklist_proto::task::{Task, TaskDraft, TaskId};
use tokio::sync::watch;

use crate::api::{TaskApi, TransportError};

pub use reconcile::{append_task, remove_task, replace_task};

/// Snapshot of everything the UI renders about the task list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListState {
    /// Tasks in server order, with created tasks appended.
    pub tasks: Vec<Task>,
    /// `true` while a full refresh is in flight.
    pub loading: bool,
    /// Message of the most recent failure, if it has not been cleared yet.
    pub error: Option<String>,
    /// Local time of the last successful refresh.
    pub synced_at: Option<DateTime<Local>>,
}

impl TaskListState {
    /// Number of tasks marked completed.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }
}

type TaskLock = Arc<tokio::sync::Mutex<()>>;

/// Holds the task collection and runs mutations against a [`TaskApi`].
///
/// Mutations targeting the same task id (`update`, `toggle`, `remove`) are
/// serialized: a second request for an id is not sent until the response to
/// the first has been applied. Different ids, `add` and `refresh` run freely.
pub struct TaskStore<A> {
    api: A,
    state: watch::Sender<TaskListState>,
    task_locks: Mutex<HashMap<TaskId, TaskLock>>,
}

impl<A: TaskApi> TaskStore<A> {
    /// Creates an empty store on top of `api`. No request is made.
    pub fn new(api: A) -> Self {
        let (state, _) = watch::channel(TaskListState::default());
        Self {
            api,
            state,
            task_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the underlying API client.
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<TaskListState> {
        self.state.subscribe()
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> TaskListState {
        self.state.borrow().clone()
    }

    /// Reloads the whole list from the server.
    ///
    /// On failure the previous tasks stay visible and `error` is set.
    /// Returns `true` if the server's list was applied.
    pub async fn refresh(&self) -> bool {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.api.list_tasks().await {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "task list refreshed");
                self.state.send_modify(|s| {
                    s.tasks = tasks;
                    s.loading = false;
                    s.synced_at = Some(Local::now());
                });
                true
            }
            Err(e) => {
                self.state.send_modify(|s| s.loading = false);
                self.fail("fetch tasks", &e);
                false
            }
        }
    }

    /// Creates a task and appends the server's copy to the list.
    ///
    /// Input is trimmed and validated first; invalid input sets `error`
    /// without touching the network. Returns `true` on success.
    pub async fn add(&self, title: &str, description: Option<&str>) -> bool {
        self.clear_error();
        let Some(draft) = self.validate(title, description) else {
            return false;
        };

        match self.api.create_task(&draft).await {
            Ok(created) => {
                tracing::info!(id = %created.id, "task added");
                self.state.send_modify(|s| append_task(&mut s.tasks, created));
                true
            }
            Err(e) => {
                self.fail("add task", &e);
                false
            }
        }
    }

    /// Replaces a task's title and description with the server's result.
    pub async fn update(&self, id: &TaskId, title: &str, description: Option<&str>) -> bool {
        self.clear_error();
        let Some(draft) = self.validate(title, description) else {
            return false;
        };

        self.with_task_lock(id, async {
            match self.api.update_task(id, &draft).await {
                Ok(updated) => {
                    tracing::info!(%id, "task updated");
                    self.apply_replacement(id, updated);
                    true
                }
                Err(e) => {
                    self.fail("update task", &e);
                    false
                }
            }
        })
        .await
    }

    /// Flips a task's completion flag server-side and applies the result.
    pub async fn toggle(&self, id: &TaskId) -> bool {
        self.clear_error();
        self.with_task_lock(id, async {
            match self.api.toggle_task(id).await {
                Ok(updated) => {
                    tracing::info!(%id, completed = updated.completed, "task toggled");
                    self.apply_replacement(id, updated);
                    true
                }
                Err(e) => {
                    self.fail("toggle task", &e);
                    false
                }
            }
        })
        .await
    }

    /// Deletes a task and drops it from the list once the server confirms.
    pub async fn remove(&self, id: &TaskId) -> bool {
        self.clear_error();
        self.with_task_lock(id, async {
            match self.api.delete_task(id).await {
                Ok(()) => {
                    tracing::info!(%id, "task deleted");
                    self.state.send_modify(|s| {
                        remove_task(&mut s.tasks, id);
                    });
                    true
                }
                Err(e) => {
                    self.fail("delete task", &e);
                    false
                }
            }
        })
        .await
    }

    /// Dismisses the current error message, if any.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    fn validate(&self, title: &str, description: Option<&str>) -> Option<TaskDraft> {
        match TaskDraft::new(title, description) {
            Ok(draft) => Some(draft),
            Err(e) => {
                tracing::debug!(error = %e, "rejected task input");
                self.state.send_modify(|s| s.error = Some(e.to_string()));
                None
            }
        }
    }

    fn apply_replacement(&self, id: &TaskId, updated: Task) {
        self.state.send_if_modified(|s| {
            let replaced = replace_task(&mut s.tasks, id, updated);
            if !replaced {
                tracing::debug!(%id, "updated task no longer listed locally");
            }
            replaced
        });
    }

    fn fail(&self, action: &str, err: &TransportError) {
        let message = format!("Failed to {action}: {err}");
        tracing::warn!(error = %err, "{message}");
        self.state.send_modify(|s| s.error = Some(message));
    }

    /// Runs `op` while holding the lock for `id`.
    ///
    /// The registry entry is dropped again once nobody else holds or waits
    /// on it, so the map only ever contains ids with work in progress.
    async fn with_task_lock<T>(&self, id: &TaskId, op: impl Future<Output = T>) -> T {
        let lock = Arc::clone(self.task_locks.lock().entry(id.clone()).or_default());
        let result = {
            let _guard = lock.lock().await;
            op.await
        };

        let mut locks = self.task_locks.lock();
        // One reference in the map, one held here.
        if locks.get(id).is_some_and(|l| Arc::strong_count(l) <= 2) {
            locks.remove(id);
        }
        result
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.task_locks.lock().len()
    }
}
