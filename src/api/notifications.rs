use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::ApiError;
use super::extract::{ApiJson, Authenticated};
use super::state::AppState;
use crate::domain::Notification;

#[derive(Debug, Serialize)]
pub struct Inbox {
    pub unread: usize,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationIdRequest {
    pub notification_id: String,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked: usize,
}

#[instrument(skip(state))]
pub async fn mine(State(state): State<AppState>, Authenticated(caller): Authenticated) -> Result<Json<Inbox>, ApiError> {
    let notifications = state.notifications.mine(&caller).await?;
    let unread = notifications.iter().filter(|n| !n.read).count();
    Ok(Json(Inbox { unread, notifications }))
}

#[instrument(skip(state))]
pub async fn read(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<NotificationIdRequest>,
) -> Result<Json<Notification>, ApiError> {
    Ok(Json(state.notifications.mark_read(&caller, body.notification_id).await?))
}

#[instrument(skip(state))]
pub async fn read_all(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<MarkedRead>, ApiError> {
    let marked = state.notifications.mark_all_read(&caller).await?;
    Ok(Json(MarkedRead { marked }))
}
