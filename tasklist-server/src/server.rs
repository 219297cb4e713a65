//! REST server core: shared state, route table, and task handlers.
//!
//! Routes:
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/` | 200 welcome message |
//! | GET | `/tasks` | 200 task array |
//! | POST | `/tasks` | 201 created task |
//! | GET | `/tasks/{id}` | 200 task |
//! | PUT | `/tasks/{id}` | 200 updated task |
//! | PATCH | `/tasks/{id}/complete` | 200 toggled task |
//! | DELETE | `/tasks/{id}` | 200 confirmation message |
//!
//! Unknown ids yield 404 and malformed write bodies yield 400, both with an
//! [`ErrorBody`].

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use tasklist_proto::response::{ErrorBody, MessageBody};
use tasklist_proto::task::{Task, TaskDraft, TaskId};

use crate::config::DEFAULT_MAX_BODY_SIZE;
use crate::store::TaskStore;

/// Shared server state holding the task store.
pub struct ServerState {
    /// Ordered in-memory task collection.
    pub tasks: TaskStore,
    /// Maximum accepted request body size in bytes.
    max_body_size: usize,
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerState {
    /// Creates server state with an empty store and default body limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_MAX_BODY_SIZE, TaskStore::new())
    }

    /// Creates server state with a custom body limit and task store.
    #[must_use]
    pub const fn with_config(max_body_size: usize, tasks: TaskStore) -> Self {
        Self {
            tasks,
            max_body_size,
        }
    }
}

/// Handler-level failures, rendered as JSON [`ErrorBody`] responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body was missing, malformed, or failed validation.
    #[error("{0}")]
    BadRequest(String),
    /// No task exists with the requested id.
    #[error("Task not found")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
        };
        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

/// Builds the route table over the given state.
pub fn router(state: Arc<ServerState>) -> axum::Router {
    let body_limit = state.max_body_size;
    axum::Router::new()
        .route("/", get(welcome))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/{id}/complete", patch(toggle_task))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Starts the task server on the given address.
///
/// Returns the bound socket address and a join handle for the server task.
/// Pass `127.0.0.1:0` to bind an OS-assigned port.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: impl tokio::net::ToSocketAddrs,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(ServerState::new())).await
}

/// Starts the task server with a pre-configured [`ServerState`].
///
/// Use [`ServerState::with_config`] to create a state with a custom body
/// limit from the resolved [`crate::config::ServerConfig`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: impl tokio::net::ToSocketAddrs,
    state: Arc<ServerState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task server error");
        }
    });

    Ok((bound_addr, handle))
}

/// Parses and validates a create/update body.
///
/// An empty body, non-JSON body, or a body without a string `title` is
/// reported as "Title is required".
fn parse_draft(body: &[u8]) -> Result<TaskDraft, ApiError> {
    let draft: TaskDraft = serde_json::from_slice(body)
        .map_err(|_| ApiError::BadRequest("Title is required".to_string()))?;
    draft
        .normalized()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

async fn welcome() -> Json<MessageBody> {
    Json(MessageBody::new("Welcome to the tasklist API"))
}

async fn list_tasks(State(state): State<Arc<ServerState>>) -> Json<Vec<Task>> {
    let tasks = state.tasks.list().await;
    tracing::debug!(count = tasks.len(), "listing tasks");
    Json(tasks)
}

async fn get_task(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    state
        .tasks
        .get(&TaskId::new(id))
        .await
        .map(Json)
        .ok_or(ApiError::NotFound)
}

async fn create_task(
    State(state): State<Arc<ServerState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let draft = parse_draft(&body)?;
    let task = state.tasks.create(draft).await;
    tracing::info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Task>, ApiError> {
    let draft = parse_draft(&body)?;
    let id = TaskId::new(id);
    let task = state
        .tasks
        .update(&id, draft)
        .await
        .ok_or(ApiError::NotFound)?;
    tracing::info!(task_id = %id, "task updated");
    Ok(Json(task))
}

async fn toggle_task(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = TaskId::new(id);
    let task = state.tasks.toggle(&id).await.ok_or(ApiError::NotFound)?;
    tracing::info!(task_id = %id, completed = task.completed, "task toggled");
    Ok(Json(task))
}

async fn delete_task(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = TaskId::new(id);
    if !state.tasks.delete(&id).await {
        return Err(ApiError::NotFound);
    }
    tracing::info!(task_id = %id, "task deleted");
    Ok(Json(MessageBody::new(format!(
        "Task {id} deleted successfully"
    ))))
}
