//! Non-task JSON bodies exchanged with the task server.

use serde::{Deserialize, Serialize};

/// Informational body, e.g. the welcome route or a delete confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Human-readable message.
    pub message: String,
}

impl MessageBody {
    /// Creates a message body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error body returned with every 4xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason, e.g. `"Task not found"`.
    pub error: String,
}

impl ErrorBody {
    /// Creates an error body.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
