use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Notification validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for NotificationError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => NotificationError::NotFound(id),
            FrameworkError::Conflict(msg) | FrameworkError::Rejected(msg) => {
                NotificationError::ValidationError(msg)
            }
            other => NotificationError::ActorCommunicationError(other.to_string()),
        }
    }
}

/// Failure reported by an outbound channel. Never surfaced to callers.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Dispatch over {channel} failed: {reason}")]
pub struct DispatchError {
    pub channel: String,
    pub reason: String,
}
