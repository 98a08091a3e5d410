use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use super::error::ApiError;
use super::extract::{ApiJson, Authenticated};
use super::state::AppState;
use crate::clients::PaymentSubmission;
use crate::domain::{Invoice, Payment, Transaction};

#[derive(Debug, Deserialize)]
pub struct PaymentIdRequest {
    pub payment_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RejectPaymentRequest {
    pub payment_id: String,
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookingIdRequest {
    pub booking_id: String,
}

/// Everything recorded about a booking's money.
#[derive(Debug, Serialize)]
pub struct BookingPayments {
    pub payments: Vec<Payment>,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
pub struct RenderedInvoice {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub text: String,
}

#[instrument(skip(state))]
pub async fn submit(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<PaymentSubmission>,
) -> Result<Json<Payment>, ApiError> {
    body.validate()?;
    Ok(Json(state.payments.submit_payment(&caller, body).await?))
}

#[instrument(skip(state))]
pub async fn pending(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<Payment>>, ApiError> {
    Ok(Json(state.payments.pending_payments(&caller).await?))
}

#[instrument(skip(state))]
pub async fn verify(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<PaymentIdRequest>,
) -> Result<Json<Payment>, ApiError> {
    Ok(Json(state.payments.verify_payment(&caller, body.payment_id).await?))
}

#[instrument(skip(state))]
pub async fn reject(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<RejectPaymentRequest>,
) -> Result<Json<Payment>, ApiError> {
    body.validate()?;
    Ok(Json(state.payments.reject_payment(&caller, body.payment_id, body.note).await?))
}

#[instrument(skip(state))]
pub async fn for_booking(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<BookingIdRequest>,
) -> Result<Json<BookingPayments>, ApiError> {
    let payments = state.payments.payments_for_booking(&caller, body.booking_id.clone()).await?;
    let transactions = state.payments.transactions_for_booking(&caller, body.booking_id).await?;
    Ok(Json(BookingPayments { payments, transactions }))
}

#[instrument(skip(state))]
pub async fn invoice(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
    ApiJson(body): ApiJson<BookingIdRequest>,
) -> Result<Json<RenderedInvoice>, ApiError> {
    let invoice = state.payments.invoice_for_booking(&caller, body.booking_id).await?;
    let text = invoice.render();
    Ok(Json(RenderedInvoice { invoice, text }))
}
