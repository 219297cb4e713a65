//! Bridge between the synchronous TUI loop and the async [`TaskStore`].
//!
//! The UI thread never awaits anything: it pushes [`StoreCommand`]s into a
//! bounded channel and reads the latest [`TaskListState`] from a watch
//! receiver on every tick.
//!
//! ```text
//! TUI (main thread)  ─── StoreCommand ──→  command loop ──→ spawned store ops
//!                    ←── TaskListState ──  watch channel
//! ```

use std::sync::Arc;

use tasklist_proto::task::TaskId;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::api::TaskApi;
use crate::store::{TaskListState, TaskStore};

/// Default capacity of the command channel.
pub const DEFAULT_COMMAND_CAPACITY: usize = 64;

/// One request from the UI to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    /// Reload the full list.
    Refresh,
    /// Create a task.
    Add {
        /// Raw title; trimmed and validated by the store.
        title: String,
        /// Optional description.
        description: Option<String>,
    },
    /// Replace a task's title and description.
    Update {
        /// Task to edit.
        id: TaskId,
        /// New title.
        title: String,
        /// New description; `None` clears it.
        description: Option<String>,
    },
    /// Flip a task's completion flag.
    Toggle(TaskId),
    /// Delete a task.
    Remove(TaskId),
    /// Dismiss the current error message.
    ClearError,
    /// Stop accepting commands.
    Shutdown,
}

/// Errors returned when a command cannot be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// The command channel is full.
    #[error("too many pending requests, try again")]
    Busy,
    /// The command loop has stopped.
    #[error("task store is no longer running")]
    Closed,
}

/// UI-side handle to a running store.
pub struct SyncHandle {
    commands: mpsc::Sender<StoreCommand>,
    state: watch::Receiver<TaskListState>,
    worker: JoinHandle<()>,
}

impl SyncHandle {
    /// Queues a command without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Busy`] if the channel is full and
    /// [`SyncError::Closed`] if the command loop has exited.
    pub fn send(&self, command: StoreCommand) -> Result<(), SyncError> {
        self.commands.try_send(command).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SyncError::Busy,
            mpsc::error::TrySendError::Closed(_) => SyncError::Closed,
        })
    }

    /// Returns a receiver that observes every published state.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<TaskListState> {
        self.state.clone()
    }

    /// Returns the latest published state.
    #[must_use]
    pub fn snapshot(&self) -> TaskListState {
        self.state.borrow().clone()
    }

    /// Sends [`StoreCommand::Shutdown`] and waits for the command loop to end.
    ///
    /// Requests already dispatched keep running on their own tasks.
    pub async fn shutdown(self) {
        let _ = self.commands.send(StoreCommand::Shutdown).await;
        if let Err(e) = self.worker.await {
            tracing::warn!(error = %e, "store command loop panicked");
        }
    }
}

/// Spawns a store over `api` on the current tokio runtime.
///
/// The store performs its initial refresh before any queued command is
/// processed. Each command then runs on its own task, so a slow request
/// never holds up later ones; the store keeps requests for a single task id
/// in order.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn spawn_store<A>(api: A, command_capacity: usize) -> SyncHandle
where
    A: TaskApi + 'static,
{
    let store = Arc::new(TaskStore::new(api));
    let state = store.subscribe();
    let (commands, rx) = mpsc::channel(command_capacity.max(1));

    let worker = tokio::spawn(command_loop(store, rx));

    SyncHandle {
        commands,
        state,
        worker,
    }
}

async fn command_loop<A: TaskApi + 'static>(
    store: Arc<TaskStore<A>>,
    mut rx: mpsc::Receiver<StoreCommand>,
) {
    store.refresh().await;

    while let Some(command) = rx.recv().await {
        tracing::debug!(?command, "store command");
        let store = Arc::clone(&store);
        match command {
            StoreCommand::Shutdown => {
                tracing::info!("store command loop shutting down");
                break;
            }
            StoreCommand::ClearError => store.clear_error(),
            StoreCommand::Refresh => {
                tokio::spawn(async move {
                    store.refresh().await;
                });
            }
            StoreCommand::Add { title, description } => {
                tokio::spawn(async move {
                    store.add(&title, description.as_deref()).await;
                });
            }
            StoreCommand::Update {
                id,
                title,
                description,
            } => {
                tokio::spawn(async move {
                    store.update(&id, &title, description.as_deref()).await;
                });
            }
            StoreCommand::Toggle(id) => {
                tokio::spawn(async move {
                    store.toggle(&id).await;
                });
            }
            StoreCommand::Remove(id) => {
                tokio::spawn(async move {
                    store.remove(&id).await;
                });
            }
        }
    }
}
