//! REST task client backed by `reqwest`.
//!
//! All paths are resolved against a base URL supplied at construction, so
//! a deployment under a path prefix (`https://host/api`) works unchanged.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use tasklist_proto::task::{Task, TaskDraft, TaskId, decode_task, decode_task_list};
use url::Url;

use super::{TaskApi, TransportError};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP implementation of [`TaskApi`].
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTaskApi {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidBaseUrl`] if the URL does not parse,
    /// is not `http`/`https`, or cannot carry a path. Returns
    /// [`TransportError::Request`] if the underlying client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let invalid = |reason: String| TransportError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tasklist/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: url,
        })
    }

    /// Returns the base URL all requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `base/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new(), so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        tracing::debug!(%method, %url, "sending request");
        self.client.request(method, url)
    }

    /// Sends a request and maps transport failures and non-2xx statuses.
    async fn execute(
        &self,
        op: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, TransportError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(op, error = %e, "request failed");
            TransportError::Request(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(op, status = status.as_u16(), "unexpected response status");
            return Err(TransportError::Status(status));
        }
        Ok(response)
    }
}

async fn read_task(response: Response) -> Result<Task, TransportError> {
    let body = response.bytes().await?;
    Ok(decode_task(&body)?)
}

impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<Task>, TransportError> {
        let response = self
            .execute("list", self.request(Method::GET, &["tasks"]))
            .await?;
        let body = response.bytes().await?;
        Ok(decode_task_list(&body)?)
    }

    async fn get_task(&self, id: &TaskId) -> Result<Task, TransportError> {
        let response = self
            .execute("get", self.request(Method::GET, &["tasks", id.as_str()]))
            .await?;
        read_task(response).await
    }

    async fn create_task(&self, draft: &TaskDraft) -> Result<Task, TransportError> {
        let request = self.request(Method::POST, &["tasks"]).json(draft);
        let response = self.execute("create", request).await?;
        read_task(response).await
    }

    async fn update_task(&self, id: &TaskId, draft: &TaskDraft) -> Result<Task, TransportError> {
        let request = self
            .request(Method::PUT, &["tasks", id.as_str()])
            .json(draft);
        let response = self.execute("update", request).await?;
        read_task(response).await
    }

    async fn toggle_task(&self, id: &TaskId) -> Result<Task, TransportError> {
        let request = self.request(Method::PATCH, &["tasks", id.as_str(), "complete"]);
        let response = self.execute("toggle", request).await?;
        read_task(response).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), TransportError> {
        let request = self.request(Method::DELETE, &["tasks", id.as_str()]);
        self.execute("delete", request).await?;
        Ok(())
    }
}
