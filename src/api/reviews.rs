use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use super::error::ApiError;
use super::extract::{ApiJson, Authenticated};
use super::state::AppState;
use crate::domain::{HotelRating, Review, ReviewStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub hotel_id: String,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(min = 10, max = 2000))]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct ModerateRequest {
    pub review_id: String,
    pub status: ReviewStatus,
}

#[derive(Debug, Deserialize)]
pub struct HotelReviewsRequest {
    pub hotel_id: String,
}

#[derive(Debug, Serialize)]
pub struct HotelReviews {
    pub rating: HotelRating,
    pub reviews: Vec<Review>,
}

#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<CreateReviewRequest>,
) -> Result<Json<Review>, ApiError> {
    body.validate()?;
    let review = state
        .reviews
        .create_review(&caller, body.hotel_id, body.rating, body.comment.trim().to_string())
        .await?;
    Ok(Json(review))
}

#[instrument(skip(state))]
pub async fn moderate(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<ModerateRequest>,
) -> Result<Json<Review>, ApiError> {
    Ok(Json(state.reviews.moderate(&caller, body.review_id, body.status).await?))
}

#[instrument(skip(state))]
pub async fn for_hotel(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<HotelReviewsRequest>,
) -> Result<Json<HotelReviews>, ApiError> {
    let rating = state.reviews.rating(body.hotel_id.clone()).await?;
    let reviews = state.reviews.for_hotel(body.hotel_id).await?;
    Ok(Json(HotelReviews { rating, reviews }))
}

#[instrument(skip(state))]
pub async fn pending(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.reviews.pending(&caller).await?))
}
