//! Task entity model and write bodies for the tasklist REST contract.
//!
//! A [`Task`] is always server-authored: the server assigns its [`TaskId`]
//! and owns the `completed` flag. Clients only ever send a [`TaskDraft`]
//! (title plus optional description) on create and update.

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Maximum allowed task title length in characters.
pub const MAX_TITLE_LENGTH: usize = 160;

/// Maximum allowed task description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 400;

/// Opaque, server-assigned task identifier.
///
/// Clients never parse the inner value; it is only compared and echoed back
/// in request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh time-ordered identifier (UUID v7).
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One to-do item as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier, immutable after creation.
    pub id: TaskId,
    /// Non-empty title, at most [`MAX_TITLE_LENGTH`] characters.
    pub title: String,
    /// Optional free-form description. Absent, `null` and `""` all decode
    /// to `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub description: Option<String>,
    /// Completion flag, owned by the server.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Creates an open (not completed) task.
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description,
            completed: false,
        }
    }

    /// Returns the description, or `""` when there is none.
    #[must_use]
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Write body for create (`POST /tasks`) and update (`PUT /tasks/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Task title.
    pub title: String,
    /// Optional description; omitted from the JSON body when absent.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub description: Option<String>,
}

impl TaskDraft {
    /// Builds a validated draft from raw user input.
    ///
    /// Both fields are trimmed and a blank description becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the trimmed title is empty or either
    /// field exceeds its length limit.
    pub fn new(title: &str, description: Option<&str>) -> Result<Self, ValidationError> {
        Self {
            title: title.to_string(),
            description: description.map(str::to_string),
        }
        .normalized()
    }

    /// Trims and validates a draft received over the wire.
    ///
    /// # Errors
    ///
    /// Same conditions as [`TaskDraft::new`].
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let title = self.title.trim().to_string();
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        validate_title(&title)?;
        if let Some(ref d) = description {
            validate_description(d)?;
        }
        Ok(Self { title, description })
    }
}

/// Field validation failures shared by the client form and the server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Title is empty or whitespace only.
    #[error("Please enter a task.")]
    TitleEmpty,
    /// Title exceeds [`MAX_TITLE_LENGTH`].
    #[error("task title too long (max {MAX_TITLE_LENGTH} characters)")]
    TitleTooLong,
    /// Description exceeds [`MAX_DESCRIPTION_LENGTH`].
    #[error("task description too long (max {MAX_DESCRIPTION_LENGTH} characters)")]
    DescriptionTooLong,
}

/// Checks a title against the emptiness and length rules.
///
/// # Errors
///
/// Returns [`ValidationError::TitleEmpty`] or [`ValidationError::TitleTooLong`].
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::TitleEmpty);
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong);
    }
    Ok(())
}

/// Checks a description against the length rule.
///
/// # Errors
///
/// Returns [`ValidationError::DescriptionTooLong`].
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}

/// Decodes a single task from a JSON response body.
///
/// # Errors
///
/// Returns the underlying [`serde_json::Error`] if the body is not a task.
pub fn decode_task(bytes: &[u8]) -> Result<Task, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Decodes a task array from a JSON response body, preserving order.
///
/// # Errors
///
/// Returns the underlying [`serde_json::Error`] if the body is not a task array.
pub fn decode_task_list(bytes: &[u8]) -> Result<Vec<Task>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
