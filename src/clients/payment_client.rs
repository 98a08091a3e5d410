use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

use crate::actor_framework::ResourceClient;
use crate::booking_actor::BookingAction;
use crate::clients::{BookingClient, LedgerClient, NotificationClient};
use crate::domain::{
    Booking, Caller, Invoice, InvoiceCreate, InvoiceLine, Payment, PaymentCreate, PaymentMethod, PaymentState,
    Transaction, TransactionKind,
};
use crate::payment_actor::{PaymentAction, PaymentError};

/// What a customer fills in after paying outside the platform.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentSubmission {
    pub booking_id: String,
    pub method: PaymentMethod,
    #[validate(length(min = 1, max = 64))]
    pub reference: String,
    #[validate(length(max = 32))]
    pub payer_account: Option<String>,
    pub amount: Decimal,
}

/// Client for payment confirmations and invoices.
///
/// Customers submit a reference for a pending booking; an admin then
/// verifies it (confirming the booking, charging the ledger and issuing
/// an invoice) or rejects it (the booking is unpaid again).
#[derive(Clone)]
pub struct PaymentClient {
    inner: ResourceClient<Payment>,
    invoices: ResourceClient<Invoice>,
    bookings: BookingClient,
    ledger: LedgerClient,
    notifications: NotificationClient,
}

impl_client_methods!(PaymentClient, Payment, PaymentError, payment);

impl PaymentClient {
    pub fn new(
        inner: ResourceClient<Payment>,
        invoices: ResourceClient<Invoice>,
        bookings: BookingClient,
        ledger: LedgerClient,
        notifications: NotificationClient,
    ) -> Self {
        Self {
            inner,
            invoices,
            bookings,
            ledger,
            notifications,
        }
    }

    #[instrument(skip(self, submission), fields(booking_id = %submission.booking_id, method = ?submission.method))]
    pub async fn submit_payment(&self, caller: &Caller, submission: PaymentSubmission) -> Result<Payment, PaymentError> {
        info!("Processing submit_payment request (Client Side)");

        // Step 1: The booking must be the caller's and the amount must match
        let booking = self.bookings.require_booking(submission.booking_id.clone()).await?;
        if booking.user_id != caller.user_id {
            return Err(PaymentError::Forbidden(format!("{} is not your booking", booking.id)));
        }
        if submission.amount != booking.total {
            return Err(PaymentError::ValidationError(format!(
                "amount {} does not match the booking total {}",
                submission.amount, booking.total
            )));
        }
        submission
            .method
            .validate(&submission.reference, submission.payer_account.as_deref())
            .map_err(PaymentError::ValidationError)?;

        // Step 2: Mark the booking as awaiting verification
        self.bookings
            .apply(booking.id.clone(), BookingAction::PaymentSubmitted)
            .await?;

        // Step 3: Record the payment
        let payload = PaymentCreate {
            booking_id: booking.id.clone(),
            user_id: caller.user_id.clone(),
            method: submission.method,
            amount: submission.amount,
            reference: submission.reference.trim().to_string(),
            payer_account: submission.payer_account.map(|a| a.trim().to_string()),
        };
        let payment = match self.inner.create(payload).await {
            Ok(payment) => payment,
            Err(e) => {
                error!(error = %e, "Payment record failed");
                if let Err(e) = self.bookings.apply(booking.id.clone(), BookingAction::PaymentRejected).await {
                    error!(error = %e, booking_id = %booking.id, "Failed to reset booking payment status");
                }
                return Err(PaymentError::from(e));
            }
        };
        info!(payment_id = %payment.id, "Payment submitted");

        self.notifications
            .notify(
                &caller.user_id,
                "Payment received",
                format!("We received your payment for booking {}. It will be verified shortly.", booking.id),
            )
            .await;
        Ok(payment)
    }

    /// Accepts a pending payment: the booking is confirmed, the ledger
    /// charged and an invoice issued.
    #[instrument(skip(self))]
    pub async fn verify_payment(&self, caller: &Caller, payment_id: String) -> Result<Payment, PaymentError> {
        info!("Processing verify_payment request (Client Side)");
        if !caller.is_admin() {
            return Err(PaymentError::Forbidden("only admins verify payments".to_string()));
        }
        let payment = self.require_payment(payment_id.clone()).await?;
        if payment.status != PaymentState::Pending {
            return Err(PaymentError::InvalidState(format!("{} was already reviewed", payment.id)));
        }

        // Step 1: Confirm the booking. Fails if it was cancelled meanwhile,
        // and then the payment can only be rejected.
        let booking = match self
            .bookings
            .apply(payment.booking_id.clone(), BookingAction::Confirm)
            .await
        {
            Ok(booking) => booking,
            Err(e) => {
                error!(error = %e, booking_id = %payment.booking_id, "Booking cannot be confirmed");
                let note = Some(format!("booking {} cannot be confirmed", payment.booking_id));
                if let Err(e) = self.inner.perform_action(payment.id.clone(), PaymentAction::Reject { note }).await {
                    warn!(error = %e, payment_id = %payment.id, "Payment left pending");
                }
                return Err(PaymentError::from(e));
            }
        };

        // Step 2: Close the payment
        let verified = self
            .inner
            .perform_action(payment_id, PaymentAction::Verify)
            .await
            .map_err(|e| PaymentError::InvalidState(e.to_string()))?;

        // Step 3: Charge the ledger and issue the invoice
        self.ledger
            .record(&booking.id, Some(verified.id.clone()), TransactionKind::Charge, verified.amount)
            .await?;
        let invoice = self.issue_invoice(&booking).await?;
        info!(payment_id = %verified.id, invoice = %invoice.number, "Payment verified");

        self.notifications
            .notify(
                &booking.user_id,
                "Booking confirmed",
                format!("Payment verified. Booking {} is confirmed, invoice {}.", booking.id, invoice.number),
            )
            .await;
        Ok(verified)
    }

    #[instrument(skip(self))]
    pub async fn reject_payment(
        &self,
        caller: &Caller,
        payment_id: String,
        note: Option<String>,
    ) -> Result<Payment, PaymentError> {
        info!("Processing reject_payment request (Client Side)");
        if !caller.is_admin() {
            return Err(PaymentError::Forbidden("only admins reject payments".to_string()));
        }
        let rejected = self
            .inner
            .perform_action(payment_id, PaymentAction::Reject { note: note.clone() })
            .await
            .map_err(|e| match e {
                crate::actor_framework::FrameworkError::Rejected(msg) => PaymentError::InvalidState(msg),
                other => PaymentError::from(other),
            })?;

        // A booking cancelled in the meantime is already unpaid.
        if let Err(e) = self
            .bookings
            .apply(rejected.booking_id.clone(), BookingAction::PaymentRejected)
            .await
        {
            warn!(error = %e, booking_id = %rejected.booking_id, "Booking not reset after rejection");
        }

        self.notifications
            .notify(
                &rejected.user_id,
                "Payment rejected",
                format!(
                    "Your payment for booking {} could not be verified{}",
                    rejected.booking_id,
                    note.map(|n| format!(": {n}")).unwrap_or_else(|| ".".to_string())
                ),
            )
            .await;
        Ok(rejected)
    }

    async fn issue_invoice(&self, booking: &Booking) -> Result<Invoice, PaymentError> {
        let nights = u32::try_from(booking.nights()).unwrap_or(u32::MAX);
        let quantity = booking.rooms.saturating_mul(nights).max(1);
        let line = InvoiceLine {
            description: format!("{} x {} night(s), {} guest(s)", booking.room_category_id, nights, booking.guests),
            quantity,
            unit_price: (booking.subtotal / Decimal::from(quantity)).round_dp(2),
            amount: booking.subtotal,
        };
        let invoice = self
            .invoices
            .create(InvoiceCreate {
                booking_id: booking.id.clone(),
                user_id: booking.user_id.clone(),
                lines: vec![line],
                subtotal: booking.subtotal,
                discount: booking.discount,
            })
            .await?;
        debug!(invoice_id = %invoice.id, "Invoice issued");
        Ok(invoice)
    }

    #[instrument(skip(self))]
    pub async fn pending_payments(&self, caller: &Caller) -> Result<Vec<Payment>, PaymentError> {
        if !caller.is_admin() {
            return Err(PaymentError::Forbidden("only admins list pending payments".to_string()));
        }
        Ok(self.inner.list_where(|p| p.status == PaymentState::Pending).await?)
    }

    #[instrument(skip(self))]
    pub async fn payments_for_booking(&self, caller: &Caller, booking_id: String) -> Result<Vec<Payment>, PaymentError> {
        self.bookings.get_booking_for(caller, booking_id.clone()).await?;
        Ok(self.inner.list_where(move |p| p.booking_id == booking_id).await?)
    }

    #[instrument(skip(self))]
    pub async fn transactions_for_booking(
        &self,
        caller: &Caller,
        booking_id: String,
    ) -> Result<Vec<Transaction>, PaymentError> {
        self.bookings.get_booking_for(caller, booking_id.clone()).await?;
        self.ledger.for_booking(booking_id).await
    }

    #[instrument(skip(self))]
    pub async fn invoice_for_booking(&self, caller: &Caller, booking_id: String) -> Result<Invoice, PaymentError> {
        self.bookings.get_booking_for(caller, booking_id.clone()).await?;
        let lookup = booking_id.clone();
        self.invoices
            .list_where(move |i| i.booking_id == lookup)
            .await?
            .pop()
            .ok_or_else(|| PaymentError::NotFound(format!("no invoice for {booking_id}")))
    }
}
