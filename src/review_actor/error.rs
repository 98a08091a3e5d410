use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReviewError {
    #[error("Review not found: {0}")]
    NotFound(String),
    #[error("Hotel not found: {0}")]
    HotelNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not eligible to review: {0}")]
    NotEligible(String),
    #[error("Already reviewed: {0}")]
    AlreadyReviewed(String),
    #[error("Review validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for ReviewError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => ReviewError::NotFound(id),
            FrameworkError::Conflict(msg) => ReviewError::AlreadyReviewed(msg),
            FrameworkError::Rejected(msg) => ReviewError::ValidationError(msg),
            other => ReviewError::ActorCommunicationError(other.to_string()),
        }
    }
}
