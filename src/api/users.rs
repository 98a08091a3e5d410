use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use super::error::ApiError;
use super::extract::{ApiJson, Authenticated};
use super::state::AppState;
use crate::domain::{Role, User, UserCreate, UserPatch};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Customer
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// Defaults to the caller.
    pub user_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 6, max = 20))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub user_id: String,
    pub role: Role,
}

#[instrument(skip(state))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<Json<User>, ApiError> {
    body.validate()?;
    let user = state
        .users
        .register(UserCreate {
            name: body.name,
            email: body.email,
            phone: body.phone,
            role: body.role,
        })
        .await?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn me(State(state): State<AppState>, Authenticated(caller): Authenticated) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.require_user(caller.user_id).await?))
}

#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    body.validate()?;
    let id = body.user_id.unwrap_or_else(|| caller.user_id.clone());
    let patch = UserPatch {
        name: body.name,
        phone: body.phone,
    };
    Ok(Json(state.users.update_profile(&caller, id, patch).await?))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list_users(&caller).await?))
}

#[instrument(skip(state))]
pub async fn set_role(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<SetRoleRequest>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.set_role(&caller, body.user_id, body.role).await?))
}
