use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::booking_actor::BookingError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Payment not found: {0}")]
    NotFound(String),
    #[error("Booking not found: {0}")]
    BookingNotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Payment validation error: {0}")]
    ValidationError(String),
    #[error("Payment state error: {0}")]
    InvalidState(String),
    #[error("Payment already submitted: {0}")]
    AlreadySubmitted(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for PaymentError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => PaymentError::NotFound(id),
            FrameworkError::Conflict(msg) => PaymentError::AlreadySubmitted(msg),
            FrameworkError::Rejected(msg) => PaymentError::ValidationError(msg),
            other => PaymentError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl From<BookingError> for PaymentError {
    fn from(e: BookingError) -> Self {
        match e {
            BookingError::NotFound(id) => PaymentError::BookingNotFound(id),
            BookingError::Forbidden(msg) => PaymentError::Forbidden(msg),
            BookingError::InvalidState(msg) => PaymentError::InvalidState(msg),
            BookingError::ActorCommunicationError(msg) => PaymentError::ActorCommunicationError(msg),
            other => PaymentError::ValidationError(other.to_string()),
        }
    }
}
