use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SupportError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Support validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for SupportError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => SupportError::NotFound(id),
            FrameworkError::Conflict(msg) | FrameworkError::Rejected(msg) => SupportError::ValidationError(msg),
            other => SupportError::ActorCommunicationError(other.to_string()),
        }
    }
}
