use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::instrument;
use validator::Validate;

use super::error::ApiError;
use super::extract::{ApiJson, Authenticated};
use super::hotels::Deleted;
use super::state::AppState;
use crate::domain::{ContactRequest, ContactRequestCreate, ContactStatus, Faq, FaqCreate, FaqPatch};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFaqRequest {
    #[validate(length(min = 1, max = 300))]
    pub question: String,
    #[validate(length(min = 1, max = 5000))]
    pub answer: String,
    #[serde(default = "default_category")]
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn default_category() -> String {
    "general".to_string()
}

#[derive(Debug, Deserialize)]
pub struct UpdateFaqRequest {
    pub faq_id: String,
    #[serde(flatten)]
    pub patch: FaqPatch,
}

#[derive(Debug, Deserialize)]
pub struct FaqIdRequest {
    pub faq_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FaqQuery {
    pub category: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ContactFormRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub subject: String,
    #[validate(length(min = 10, max = 5000))]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactListRequest {
    pub status: Option<ContactStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ContactIdRequest {
    pub contact_id: String,
}

#[instrument(skip(state))]
pub async fn faq_create(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<CreateFaqRequest>,
) -> Result<Json<Faq>, ApiError> {
    body.validate()?;
    let params = FaqCreate {
        question: body.question,
        answer: body.answer,
        category: body.category,
        keywords: body.keywords,
    };
    Ok(Json(state.support.create_faq(&caller, params).await?))
}

#[instrument(skip(state))]
pub async fn faq_update(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<UpdateFaqRequest>,
) -> Result<Json<Faq>, ApiError> {
    Ok(Json(state.support.update_faq(&caller, body.faq_id, body.patch).await?))
}

#[instrument(skip(state))]
pub async fn faq_delete(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<FaqIdRequest>,
) -> Result<Json<Deleted>, ApiError> {
    state.support.delete_faq(&caller, body.faq_id).await?;
    Ok(Json(Deleted { deleted: true }))
}

#[instrument(skip(state))]
pub async fn faqs(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<FaqQuery>,
) -> Result<Json<Vec<Faq>>, ApiError> {
    Ok(Json(state.support.faqs(body.category, body.query).await?))
}

#[instrument(skip(state))]
pub async fn contact(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ContactFormRequest>,
) -> Result<Json<ContactRequest>, ApiError> {
    body.validate()?;
    let params = ContactRequestCreate {
        name: body.name,
        email: body.email,
        subject: body.subject,
        message: body.message,
    };
    Ok(Json(state.support.submit_contact(params).await?))
}

#[instrument(skip(state))]
pub async fn contacts(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<ContactListRequest>,
) -> Result<Json<Vec<ContactRequest>>, ApiError> {
    Ok(Json(state.support.contacts(&caller, body.status).await?))
}

#[instrument(skip(state))]
pub async fn resolve_contact(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<ContactIdRequest>,
) -> Result<Json<ContactRequest>, ApiError> {
    Ok(Json(state.support.resolve_contact(&caller, body.contact_id).await?))
}
