use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CouponError {
    #[error("Coupon not found: {0}")]
    NotFound(String),
    #[error("Coupon already exists: {0}")]
    AlreadyExists(String),
    #[error("Coupon cannot be applied: {0}")]
    NotApplicable(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Coupon validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CouponError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => CouponError::NotFound(id),
            FrameworkError::Conflict(msg) => CouponError::AlreadyExists(msg),
            FrameworkError::Rejected(msg) => CouponError::NotApplicable(msg),
            other => CouponError::ActorCommunicationError(other.to_string()),
        }
    }
}
