use axum::extract::State;
use axum::Json;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use super::error::ApiError;
use super::extract::{ApiJson, Authenticated};
use super::state::AppState;
use crate::domain::{Coupon, CouponCreate, Discount};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCouponRequest {
    #[validate(length(min = 3, max = 40))]
    pub code: String,
    pub discount: Discount,
    pub max_discount: Option<Decimal>,
    #[serde(default)]
    pub min_subtotal: Decimal,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    #[validate(range(min = 1))]
    pub usage_limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub code: String,
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize)]
pub struct Preview {
    pub code: String,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CodeRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct Deactivated {
    pub code: String,
    pub active: bool,
}

#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<CreateCouponRequest>,
) -> Result<Json<Coupon>, ApiError> {
    body.validate()?;
    if body.max_discount.is_some_and(|cap| cap <= Decimal::ZERO) {
        return Err(ApiError::BadRequest("max_discount must be positive".to_string()));
    }
    if body.min_subtotal < Decimal::ZERO {
        return Err(ApiError::BadRequest("min_subtotal cannot be negative".to_string()));
    }
    let params = CouponCreate {
        code: body.code,
        discount: body.discount,
        max_discount: body.max_discount,
        min_subtotal: body.min_subtotal,
        valid_from: body.valid_from,
        valid_until: body.valid_until,
        usage_limit: body.usage_limit,
    };
    Ok(Json(state.coupons.create_coupon(&caller, params).await?))
}

#[instrument(skip(state))]
pub async fn preview(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PreviewRequest>,
) -> Result<Json<Preview>, ApiError> {
    let discount = state.coupons.preview(&body.code, body.subtotal, state.today()).await?;
    Ok(Json(Preview {
        code: Coupon::normalize_code(&body.code),
        subtotal: body.subtotal,
        discount,
        total: body.subtotal - discount,
    }))
}

#[instrument(skip(state))]
pub async fn deactivate(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<CodeRequest>,
) -> Result<Json<Deactivated>, ApiError> {
    state.coupons.deactivate(&caller, &body.code).await?;
    Ok(Json(Deactivated {
        code: Coupon::normalize_code(&body.code),
        active: false,
    }))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<Coupon>>, ApiError> {
    Ok(Json(state.coupons.list_coupons(&caller).await?))
}
