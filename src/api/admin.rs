use axum::extract::State;
use axum::Json;
use tracing::instrument;

use super::error::ApiError;
use super::extract::Authenticated;
use super::state::AppState;
use crate::clients::DashboardStats;

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.dashboard.stats(&caller).await?))
}
