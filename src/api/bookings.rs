use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use super::error::ApiError;
use super::extract::{ApiJson, Authenticated};
use super::state::AppState;
use crate::domain::{Booking, BookingQuote, BookingRequest};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BookingRequestBody {
    pub hotel_id: String,
    pub room_category_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1, max = 100))]
    pub guests: u32,
    #[validate(range(min = 1, max = 50))]
    pub rooms: u32,
    #[validate(length(min = 1, max = 40))]
    pub coupon_code: Option<String>,
}

impl From<BookingRequestBody> for BookingRequest {
    fn from(body: BookingRequestBody) -> Self {
        Self {
            hotel_id: body.hotel_id,
            room_category_id: body.room_category_id,
            check_in: body.check_in,
            check_out: body.check_out,
            guests: body.guests,
            rooms: body.rooms,
            coupon_code: body.coupon_code.filter(|c| !c.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BookingIdRequest {
    pub booking_id: String,
}

#[derive(Debug, Deserialize)]
pub struct HotelBookingsRequest {
    pub hotel_id: String,
}

#[instrument(skip(state))]
pub async fn quote(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<BookingRequestBody>,
) -> Result<Json<BookingQuote>, ApiError> {
    body.validate()?;
    Ok(Json(state.bookings.quote(body.into(), state.today()).await?))
}

#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<BookingRequestBody>,
) -> Result<Json<Booking>, ApiError> {
    body.validate()?;
    Ok(Json(state.bookings.create_booking(&caller, body.into(), state.today()).await?))
}

#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<BookingIdRequest>,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(state.bookings.get_booking_for(&caller, body.booking_id).await?))
}

#[instrument(skip(state))]
pub async fn mine(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.bookings.my_bookings(&caller).await?))
}

#[instrument(skip(state))]
pub async fn for_hotel(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<HotelBookingsRequest>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.bookings.hotel_bookings(&caller, body.hotel_id).await?))
}

#[instrument(skip(state))]
pub async fn cancel(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<BookingIdRequest>,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(state.bookings.cancel_booking(&caller, body.booking_id, state.today()).await?))
}

#[instrument(skip(state))]
pub async fn complete(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<BookingIdRequest>,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(state.bookings.complete_booking(&caller, body.booking_id, state.today()).await?))
}
