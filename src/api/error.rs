use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::booking_actor::BookingError;
use crate::clients::DashboardError;
use crate::coupon_actor::CouponError;
use crate::hotel_actor::HotelError;
use crate::notification_actor::NotificationError;
use crate::payment_actor::PaymentError;
use crate::review_actor::ReviewError;
use crate::support_actor::SupportError;
use crate::user_actor::UserError;

/// Procedure error as seen by API clients.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(detail) => {
                error!(%detail, "Procedure failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = json!({ "error": { "code": self.code(), "message": message } });
        (self.status(), Json(body)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(e: ValidationErrors) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        let message = e.to_string();
        match e {
            UserError::NotFound(_) => ApiError::NotFound(message),
            UserError::AlreadyExists(_) => ApiError::Conflict(message),
            UserError::ValidationError(_) => ApiError::BadRequest(message),
            UserError::Forbidden(_) => ApiError::Forbidden(message),
            UserError::ActorCommunicationError(_) => ApiError::Internal(message),
        }
    }
}

impl From<HotelError> for ApiError {
    fn from(e: HotelError) -> Self {
        let message = e.to_string();
        match e {
            HotelError::NotFound(_) | HotelError::RoomNotFound(_) => ApiError::NotFound(message),
            HotelError::Forbidden(_) => ApiError::Forbidden(message),
            HotelError::ValidationError(_) => ApiError::BadRequest(message),
            HotelError::Unavailable(_) | HotelError::Conflict(_) => ApiError::Conflict(message),
            HotelError::ActorCommunicationError(_) => ApiError::Internal(message),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(e: BookingError) -> Self {
        let message = e.to_string();
        match e {
            BookingError::NotFound(_) | BookingError::InvalidHotel(_) | BookingError::InvalidRoom(_) => {
                ApiError::NotFound(message)
            }
            BookingError::InvalidUser(_) => ApiError::Unauthorized(message),
            BookingError::Unavailable(_) | BookingError::InvalidState(_) => ApiError::Conflict(message),
            BookingError::InvalidCoupon(_) | BookingError::ValidationError(_) => ApiError::BadRequest(message),
            BookingError::Forbidden(_) => ApiError::Forbidden(message),
            BookingError::ActorCommunicationError(_) => ApiError::Internal(message),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(e: PaymentError) -> Self {
        let message = e.to_string();
        match e {
            PaymentError::NotFound(_) | PaymentError::BookingNotFound(_) => ApiError::NotFound(message),
            PaymentError::Forbidden(_) => ApiError::Forbidden(message),
            PaymentError::ValidationError(_) => ApiError::BadRequest(message),
            PaymentError::InvalidState(_) | PaymentError::AlreadySubmitted(_) => ApiError::Conflict(message),
            PaymentError::ActorCommunicationError(_) => ApiError::Internal(message),
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(e: ReviewError) -> Self {
        let message = e.to_string();
        match e {
            ReviewError::NotFound(_) | ReviewError::HotelNotFound(_) => ApiError::NotFound(message),
            ReviewError::Forbidden(_) | ReviewError::NotEligible(_) => ApiError::Forbidden(message),
            ReviewError::AlreadyReviewed(_) => ApiError::Conflict(message),
            ReviewError::ValidationError(_) => ApiError::BadRequest(message),
            ReviewError::ActorCommunicationError(_) => ApiError::Internal(message),
        }
    }
}

impl From<CouponError> for ApiError {
    fn from(e: CouponError) -> Self {
        let message = e.to_string();
        match e {
            CouponError::NotFound(_) => ApiError::NotFound(message),
            CouponError::AlreadyExists(_) => ApiError::Conflict(message),
            CouponError::NotApplicable(_) | CouponError::ValidationError(_) => ApiError::BadRequest(message),
            CouponError::Forbidden(_) => ApiError::Forbidden(message),
            CouponError::ActorCommunicationError(_) => ApiError::Internal(message),
        }
    }
}

impl From<SupportError> for ApiError {
    fn from(e: SupportError) -> Self {
        let message = e.to_string();
        match e {
            SupportError::NotFound(_) => ApiError::NotFound(message),
            SupportError::Forbidden(_) => ApiError::Forbidden(message),
            SupportError::ValidationError(_) => ApiError::BadRequest(message),
            SupportError::ActorCommunicationError(_) => ApiError::Internal(message),
        }
    }
}

impl From<NotificationError> for ApiError {
    fn from(e: NotificationError) -> Self {
        let message = e.to_string();
        match e {
            NotificationError::NotFound(_) => ApiError::NotFound(message),
            NotificationError::Forbidden(_) => ApiError::Forbidden(message),
            NotificationError::ValidationError(_) => ApiError::BadRequest(message),
            NotificationError::ActorCommunicationError(_) => ApiError::Internal(message),
        }
    }
}

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        let message = e.to_string();
        match e {
            DashboardError::Forbidden(_) => ApiError::Forbidden(message),
            DashboardError::ActorCommunicationError(_) => ApiError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_codes() {
        let overbooked = ApiError::from(BookingError::Unavailable("0 left".into()));
        assert_eq!(overbooked.code(), "CONFLICT");
        assert_eq!(overbooked.status(), StatusCode::CONFLICT);

        assert_eq!(ApiError::from(ReviewError::NotEligible("x".into())).code(), "FORBIDDEN");
        assert_eq!(ApiError::from(CouponError::NotApplicable("x".into())).code(), "BAD_REQUEST");
        assert_eq!(ApiError::from(UserError::NotFound("user_9".into())).code(), "NOT_FOUND");
        assert_eq!(ApiError::from(BookingError::InvalidUser("user_9".into())).code(), "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_internal_details_are_not_leaked() {
        let response = ApiError::Internal("Actor dropped".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "INTERNAL");
        assert_eq!(body["error"]["message"], "Internal server error");
    }
}
