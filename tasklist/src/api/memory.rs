//! In-process task API for testing.
//!
//! [`InMemoryTaskApi`] behaves like the real server (sequential ids starting
//! at `"1"`, toggle flips `completed`, unknown ids yield 404) and can be told
//! to fail with a given status or to delay individual responses.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use reqwest::StatusCode;
use tasklist_proto::task::{Task, TaskDraft, TaskId};

use super::{TaskApi, TransportError};

#[derive(Default)]
struct Inner {
    tasks: Vec<Task>,
    next_id: u64,
    failure: Option<StatusCode>,
    delays: VecDeque<Duration>,
    calls: Vec<&'static str>,
}

/// Fake task backend holding tasks in memory.
#[derive(Default)]
pub struct InMemoryTaskApi {
    inner: Mutex<Inner>,
}

impl InMemoryTaskApi {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-seeded with tasks.
    ///
    /// Fresh ids continue after the number of seeded tasks.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.len() as u64;
        Self {
            inner: Mutex::new(Inner {
                tasks,
                next_id,
                ..Inner::default()
            }),
        }
    }

    /// Makes every subsequent call fail with `status` (or succeed again on `None`).
    ///
    /// Codes outside `100..=999` are reported as 500.
    pub fn set_failure(&self, status: Option<u16>) {
        self.inner.lock().failure = status
            .map(|code| StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));
    }

    /// Delays the response of the next not-yet-delayed call by `delay`.
    ///
    /// The server-side effect is applied immediately; only the reply is late.
    pub fn push_delay(&self, delay: Duration) {
        self.inner.lock().delays.push_back(delay);
    }

    /// Returns the server-side tasks.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.inner.lock().tasks.clone()
    }

    /// Returns the names of the operations invoked so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.lock().calls.clone()
    }

    /// Records a call and applies `f` to the server state, then waits out
    /// any queued delay before replying.
    async fn call<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Vec<Task>, &mut u64) -> Result<T, TransportError>,
    ) -> Result<T, TransportError> {
        let (result, delay) = {
            let mut inner = self.inner.lock();
            inner.calls.push(op);
            let delay = inner.delays.pop_front();
            let failure = inner.failure;
            let result = match failure {
                Some(status) => Err(TransportError::Status(status)),
                None => {
                    let Inner { tasks, next_id, .. } = &mut *inner;
                    f(tasks, next_id)
                }
            };
            (result, delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }
}

fn find_mut<'a>(tasks: &'a mut [Task], id: &TaskId) -> Result<&'a mut Task, TransportError> {
    tasks
        .iter_mut()
        .find(|t| &t.id == id)
        .ok_or(TransportError::Status(StatusCode::NOT_FOUND))
}

impl TaskApi for InMemoryTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, TransportError> {
        self.call("list", |tasks, _| Ok(tasks.clone())).await
    }

    async fn get_task(&self, id: &TaskId) -> Result<Task, TransportError> {
        self.call("get", |tasks, _| find_mut(tasks, id).cloned())
            .await
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, TransportError> {
        self.call("create", |tasks, next_id| {
            *next_id += 1;
            let task = Task::new(
                next_id.to_string(),
                draft.title.clone(),
                draft.description.clone(),
            );
            tasks.push(task.clone());
            Ok(task)
        })
        .await
    }

    async fn update_task(&self, id: &TaskId, draft: &TaskDraft) -> Result<Task, TransportError> {
        self.call("update", |tasks, _| {
            let task = find_mut(tasks, id)?;
            task.title.clone_from(&draft.title);
            task.description.clone_from(&draft.description);
            Ok(task.clone())
        })
        .await
    }

    async fn toggle_task(&self, id: &TaskId) -> Result<Task, TransportError> {
        self.call("toggle", |tasks, _| {
            let task = find_mut(tasks, id)?;
            task.completed = !task.completed;
            Ok(task.clone())
        })
        .await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), TransportError> {
        self.call("delete", |tasks, _| {
            let before = tasks.len();
            tasks.retain(|t| &t.id != id);
            if tasks.len() == before {
                Err(TransportError::Status(StatusCode::NOT_FOUND))
            } else {
                Ok(())
            }
        })
        .await
    }
}
