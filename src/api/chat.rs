use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use super::error::ApiError;
use super::extract::{ApiJson, Authenticated};
use super::state::AppState;
use crate::domain::ChatThread;

#[derive(Debug, Deserialize, Validate)]
pub struct OpenChatRequest {
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MessageRequest {
    pub thread_id: String,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ThreadIdRequest {
    pub thread_id: String,
}

#[instrument(skip(state))]
pub async fn open(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<OpenChatRequest>,
) -> Result<Json<ChatThread>, ApiError> {
    body.validate()?;
    Ok(Json(state.support.open_chat(&caller, body.subject, body.message).await?))
}

#[instrument(skip(state))]
pub async fn post(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<MessageRequest>,
) -> Result<Json<ChatThread>, ApiError> {
    body.validate()?;
    Ok(Json(state.support.post_message(&caller, body.thread_id, body.message).await?))
}

#[instrument(skip(state))]
pub async fn reply(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<MessageRequest>,
) -> Result<Json<ChatThread>, ApiError> {
    body.validate()?;
    Ok(Json(state.support.reply(&caller, body.thread_id, body.message).await?))
}

#[instrument(skip(state))]
pub async fn close(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<ThreadIdRequest>,
) -> Result<Json<ChatThread>, ApiError> {
    Ok(Json(state.support.close_chat(&caller, body.thread_id).await?))
}

#[instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<ThreadIdRequest>,
) -> Result<Json<ChatThread>, ApiError> {
    Ok(Json(state.support.get_chat(&caller, body.thread_id).await?))
}

#[instrument(skip(state))]
pub async fn mine(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<ChatThread>>, ApiError> {
    Ok(Json(state.support.my_chats(&caller).await?))
}
