use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use super::error::ApiError;
use super::extract::{ApiJson, Authenticated, MaybeAuthenticated};
use super::state::AppState;
use crate::clients::{HotelSearch, HotelSummary};
use crate::domain::{
    Hotel, HotelCreate, HotelPatch, HotelRating, HotelStatus, Price, RoomAvailability, RoomCategory,
    RoomCategoryPatch, StayRange,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHotelRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 300))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateHotelRequest {
    pub hotel_id: String,
    #[serde(flatten)]
    pub patch: HotelPatch,
}

#[derive(Debug, Deserialize)]
pub struct HotelIdRequest {
    pub hotel_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub hotel_id: String,
    pub status: HotelStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SearchRequest {
    pub city: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    #[validate(range(min = 1, max = 50))]
    pub guests: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddRoomRequest {
    pub hotel_id: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1, max = 10000))]
    pub total_rooms: u32,
    #[validate(length(min = 1))]
    pub prices: Vec<Price>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoomRequest {
    pub room_category_id: String,
    #[serde(flatten)]
    pub patch: RoomCategoryPatch,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AvailabilityRequest {
    pub hotel_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    #[validate(range(min = 1))]
    pub guests: u32,
    #[serde(default = "one")]
    #[validate(range(min = 1))]
    pub rooms: u32,
}

fn one() -> u32 {
    1
}

/// A hotel page: the listing, its rooms and approved-review rating.
#[derive(Debug, Serialize)]
pub struct HotelDetails {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub rooms: Vec<RoomCategory>,
    pub rating: HotelRating,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

pub(crate) fn stay(check_in: NaiveDate, check_out: NaiveDate) -> Result<StayRange, ApiError> {
    StayRange::new(check_in, check_out)
        .ok_or_else(|| ApiError::BadRequest("check-out must be after check-in".to_string()))
}

#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<CreateHotelRequest>,
) -> Result<Json<Hotel>, ApiError> {
    body.validate()?;
    let params = HotelCreate {
        owner_id: caller.user_id.clone(),
        name: body.name,
        city: body.city,
        address: body.address,
        description: body.description,
        amenities: body.amenities,
    };
    Ok(Json(state.hotels.create_hotel(&caller, params).await?))
}

#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<UpdateHotelRequest>,
) -> Result<Json<Hotel>, ApiError> {
    Ok(Json(state.hotels.update_hotel(&caller, body.hotel_id, body.patch).await?))
}

#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    MaybeAuthenticated(caller): MaybeAuthenticated,
    ApiJson(body): ApiJson<HotelIdRequest>,
) -> Result<Json<HotelDetails>, ApiError> {
    let hotel = state.hotels.visible_hotel(caller.as_ref(), body.hotel_id.clone()).await?;
    let rooms = state.hotels.rooms().rooms_for_hotel(body.hotel_id.clone()).await?;
    let rating = state.reviews.rating(body.hotel_id).await?;
    Ok(Json(HotelDetails { hotel, rooms, rating }))
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SearchRequest>,
) -> Result<Json<Vec<HotelSummary>>, ApiError> {
    body.validate()?;
    let stay = match (body.check_in, body.check_out) {
        (Some(check_in), Some(check_out)) => Some(stay(check_in, check_out)?),
        (None, None) => None,
        _ => return Err(ApiError::BadRequest("check_in and check_out go together".to_string())),
    };
    let query = HotelSearch {
        city: body.city,
        stay,
        guests: body.guests,
    };
    Ok(Json(state.hotels.search(query).await?))
}

#[instrument(skip(state))]
pub async fn set_status(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<SetStatusRequest>,
) -> Result<Json<Hotel>, ApiError> {
    Ok(Json(state.hotels.set_status(&caller, body.hotel_id, body.status).await?))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<HotelIdRequest>,
) -> Result<Json<Deleted>, ApiError> {
    state.hotels.delete_hotel(&caller, body.hotel_id).await?;
    Ok(Json(Deleted { deleted: true }))
}

#[instrument(skip(state))]
pub async fn add_room(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<AddRoomRequest>,
) -> Result<Json<RoomCategory>, ApiError> {
    body.validate()?;
    if body.prices.iter().any(|p| p.nightly_rate <= Decimal::ZERO) {
        return Err(ApiError::BadRequest("nightly rates must be positive".to_string()));
    }
    let room = state
        .hotels
        .add_room(&caller, body.hotel_id, body.name, body.total_rooms, body.prices)
        .await?;
    Ok(Json(room))
}

#[instrument(skip(state))]
pub async fn update_room(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<UpdateRoomRequest>,
) -> Result<Json<RoomCategory>, ApiError> {
    Ok(Json(state.hotels.update_room(&caller, body.room_category_id, body.patch).await?))
}

#[instrument(skip(state))]
pub async fn rooms(
    State(state): State<AppState>,
    MaybeAuthenticated(caller): MaybeAuthenticated,
    ApiJson(body): ApiJson<HotelIdRequest>,
) -> Result<Json<Vec<RoomCategory>>, ApiError> {
    Ok(Json(state.hotels.rooms_for(caller.as_ref(), body.hotel_id).await?))
}

#[instrument(skip(state))]
pub async fn availability(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<AvailabilityRequest>,
) -> Result<Json<Vec<RoomAvailability>>, ApiError> {
    body.validate()?;
    let stay = stay(body.check_in, body.check_out)?;
    let rooms = state
        .hotels
        .availability(body.hotel_id, stay, body.guests, body.rooms)
        .await?;
    Ok(Json(rooms))
}

#[derive(Debug, Deserialize)]
pub struct RoomIdRequest {
    pub room_category_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: HotelStatus,
}

#[instrument(skip(state))]
pub async fn delete_room(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<RoomIdRequest>,
) -> Result<Json<Deleted>, ApiError> {
    state.hotels.delete_room(&caller, body.room_category_id).await?;
    Ok(Json(Deleted { deleted: true }))
}

#[instrument(skip(state))]
pub async fn mine(State(state): State<AppState>, Authenticated(caller): Authenticated) -> Result<Json<Vec<Hotel>>, ApiError> {
    Ok(Json(state.hotels.owned_hotels(&caller).await?))
}

#[instrument(skip(state))]
pub async fn by_status(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<StatusRequest>,
) -> Result<Json<Vec<Hotel>>, ApiError> {
    Ok(Json(state.hotels.hotels_with_status(&caller, body.status).await?))
}
