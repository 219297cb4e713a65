//! Remote task API abstraction for `Tasklist`.
//!
//! Defines the [`TaskApi`] trait that every task backend must satisfy.
//! Concrete implementations:
//! - [`http::HttpTaskApi`]: REST client over `reqwest`
//! - [`memory::InMemoryTaskApi`]: in-process fake for testing

pub mod http;
pub mod memory;

use std::future::Future;

use tasklist_proto::task::{Task, TaskDraft, TaskId};

/// The single failure kind of the task API.
///
/// Raised for any non-success HTTP status, any request that could not
/// complete (DNS, connection, timeout), and any unparseable response body.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a status outside the 2xx range.
    #[error("server responded with status {0}")]
    Status(reqwest::StatusCode),

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not the expected JSON shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot be used for HTTP requests.
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl {
        /// The rejected URL as given.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl TransportError {
    /// Returns the HTTP status code associated with this failure, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(code) => Some(code.as_u16()),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::InvalidBaseUrl { .. } => None,
        }
    }
}

/// Async client for the remote task service.
///
/// Every call is single-shot: implementations never retry. The server's
/// response is authoritative; callers must not derive task fields locally.
pub trait TaskApi: Send + Sync {
    /// `GET /tasks`: all tasks in server order.
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, TransportError>> + Send;

    /// `GET /tasks/{id}`: a single task.
    fn get_task(&self, id: &TaskId) -> impl Future<Output = Result<Task, TransportError>> + Send;

    /// `POST /tasks`: create a task; the server assigns its id.
    fn create_task(
        &self,
        draft: &TaskDraft,
    ) -> impl Future<Output = Result<Task, TransportError>> + Send;

    /// `PUT /tasks/{id}`: replace title and description.
    fn update_task(
        &self,
        id: &TaskId,
        draft: &TaskDraft,
    ) -> impl Future<Output = Result<Task, TransportError>> + Send;

    /// `PATCH /tasks/{id}/complete`: flip the completion flag server-side.
    fn toggle_task(&self, id: &TaskId)
    -> impl Future<Output = Result<Task, TransportError>> + Send;

    /// `DELETE /tasks/{id}`: remove a task. The response body is ignored.
    fn delete_task(&self, id: &TaskId) -> impl Future<Output = Result<(), TransportError>> + Send;
}
