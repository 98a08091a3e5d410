use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors from hotel and room-category management.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HotelError {
    #[error("Hotel not found: {0}")]
    NotFound(String),
    #[error("Room category not found: {0}")]
    RoomNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Hotel validation error: {0}")]
    ValidationError(String),
    #[error("Rooms unavailable: {0}")]
    Unavailable(String),
    #[error("Hotel conflict: {0}")]
    Conflict(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for HotelError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => HotelError::NotFound(id),
            FrameworkError::Conflict(msg) => HotelError::Conflict(msg),
            FrameworkError::Rejected(msg) => HotelError::ValidationError(msg),
            other => HotelError::ActorCommunicationError(other.to_string()),
        }
    }
}
