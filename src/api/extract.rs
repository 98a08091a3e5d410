use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use tracing::debug;

use super::error::ApiError;
use super::state::AppState;
use crate::domain::Caller;
use crate::user_actor::UserError;

/// Header carrying the signed-in user's id, set by the session layer in front of us.
pub const USER_HEADER: &str = "x-user-id";

/// JSON body whose rejections use the procedure error format.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// A caller that must be signed in.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Caller);

/// A caller that may be anonymous.
#[derive(Debug, Clone)]
pub struct MaybeAuthenticated(pub Option<Caller>);

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<Caller>, ApiError> {
    let Some(value) = parts.headers.get(USER_HEADER) else {
        return Ok(None);
    };
    let user_id = value
        .to_str()
        .map_err(|_| ApiError::Unauthorized(format!("{USER_HEADER} is not valid text")))?
        .trim();
    if user_id.is_empty() {
        return Ok(None);
    }
    match state.users.resolve_caller(user_id).await {
        Ok(caller) => {
            debug!(user_id = %caller.user_id, role = ?caller.role, "Caller resolved");
            Ok(Some(caller))
        }
        Err(UserError::NotFound(id)) => Err(ApiError::Unauthorized(format!("unknown user {id}"))),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve(parts, state)
            .await?
            .map(Authenticated)
            .ok_or_else(|| ApiError::Unauthorized("sign in required".to_string()))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuthenticated(resolve(parts, state).await?))
    }
}
