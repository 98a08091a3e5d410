use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur while quoting, creating or changing bookings.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    NotFound(String),
    #[error("Invalid user: {0}")]
    InvalidUser(String),
    #[error("Invalid hotel: {0}")]
    InvalidHotel(String),
    #[error("Invalid room category: {0}")]
    InvalidRoom(String),
    #[error("Rooms unavailable: {0}")]
    Unavailable(String),
    #[error("Invalid coupon: {0}")]
    InvalidCoupon(String),
    #[error("Booking validation error: {0}")]
    ValidationError(String),
    #[error("Booking state error: {0}")]
    InvalidState(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for BookingError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => BookingError::NotFound(id),
            FrameworkError::Conflict(msg) => BookingError::InvalidState(msg),
            FrameworkError::Rejected(msg) => BookingError::InvalidState(msg),
            other => BookingError::ActorCommunicationError(other.to_string()),
        }
    }
}
