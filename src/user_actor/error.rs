use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("User already exists: {0}")]
    AlreadyExists(String),
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for UserError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            FrameworkError::Conflict(msg) => UserError::AlreadyExists(msg),
            FrameworkError::Rejected(msg) => UserError::ValidationError(msg),
            other => UserError::ActorCommunicationError(other.to_string()),
        }
    }
}
