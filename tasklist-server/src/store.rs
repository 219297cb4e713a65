//! In-memory, insertion-ordered task store.
//!
//! The [`TaskStore`] is the server's single source of truth. Tasks keep the
//! order in which they were created; updates and toggles mutate in place.

use tasklist_proto::task::{Task, TaskDraft, TaskId};
use tokio::sync::RwLock;

/// Thread-safe ordered task collection.
///
/// Guarded by a [`RwLock`] so concurrent list requests do not block each
/// other. Lookups are linear; the store is sized for a personal task list.
pub struct TaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
        }
    }

    /// Returns all tasks in creation order.
    pub async fn list(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    /// Returns a single task by id.
    pub async fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.read().await.iter().find(|t| &t.id == id).cloned()
    }

    /// Creates an open task from a validated draft and appends it.
    pub async fn create(&self, draft: TaskDraft) -> Task {
        let task = Task {
            id: TaskId::generate(),
            title: draft.title,
            description: draft.description,
            completed: false,
        };
        self.tasks.write().await.push(task.clone());
        task
    }

    /// Replaces title and description of an existing task.
    ///
    /// Returns `None` if no task has the given id.
    pub async fn update(&self, id: &TaskId, draft: TaskDraft) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.iter_mut().find(|t| &t.id == id)?;
        task.title = draft.title;
        task.description = draft.description;
        Some(task.clone())
    }

    /// Flips the completion flag of an existing task.
    ///
    /// Returns `None` if no task has the given id.
    pub async fn toggle(&self, id: &TaskId) -> Option<Task> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.iter_mut().find(|t| &t.id == id)?;
        task.completed = !task.completed;
        Some(task.clone())
    }

    /// Removes a task, returning `true` if it existed.
    pub async fn delete(&self, id: &TaskId) -> bool {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| &t.id != id);
        tasks.len() != before
    }

    /// Returns the number of stored tasks.
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Returns `true` if no tasks are stored.
    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }
}
