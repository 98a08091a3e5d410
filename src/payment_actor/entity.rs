use chrono::Utc;
use rust_decimal::Decimal;

use super::actions::PaymentAction;
use crate::actor_framework::Entity;
use crate::domain::{
    Invoice, InvoiceCreate, Payment, PaymentCreate, PaymentState, Transaction, TransactionCreate,
};

impl Entity for Payment {
    type Id = String;
    type CreateParams = PaymentCreate;
    type Patch = ();
    type Action = PaymentAction;
    type ActionResult = Payment;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: PaymentCreate) -> Result<Self, String> {
        if params.amount <= Decimal::ZERO {
            return Err("Payment amount must be positive".to_string());
        }
        params
            .method
            .validate(&params.reference, params.payer_account.as_deref())?;
        Ok(Self {
            id,
            booking_id: params.booking_id,
            user_id: params.user_id,
            method: params.method,
            amount: params.amount,
            reference: params.reference.trim().to_string(),
            payer_account: params.payer_account.map(|a| a.trim().to_string()),
            status: PaymentState::Pending,
            note: None,
            created_at: Utc::now(),
            reviewed_at: None,
        })
    }

    /// One pending payment per booking at a time.
    fn conflicts_with(&self, existing: &Self) -> Option<String> {
        (existing.booking_id == self.booking_id && existing.status == PaymentState::Pending)
            .then(|| format!("booking {} already has pending payment {}", self.booking_id, existing.id))
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, action: PaymentAction) -> Result<Payment, String> {
        if self.status != PaymentState::Pending {
            return Err(format!("Payment {} was already reviewed ({:?})", self.id, self.status));
        }
        match action {
            PaymentAction::Verify => self.status = PaymentState::Verified,
            PaymentAction::Reject { note } => {
                self.status = PaymentState::Rejected;
                self.note = note;
            }
        }
        self.reviewed_at = Some(Utc::now());
        Ok(self.clone())
    }
}

impl Entity for Transaction {
    type Id = String;
    type CreateParams = TransactionCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: TransactionCreate) -> Result<Self, String> {
        if params.amount <= Decimal::ZERO {
            return Err("Transaction amount must be positive".to_string());
        }
        Ok(Self {
            id,
            booking_id: params.booking_id,
            payment_id: params.payment_id,
            kind: params.kind,
            amount: params.amount,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Ledger entries are immutable".to_string())
    }

    fn on_delete(&self) -> Result<(), String> {
        Err("Ledger entries are immutable".to_string())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

impl Entity for Invoice {
    type Id = String;
    type CreateParams = InvoiceCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: InvoiceCreate) -> Result<Self, String> {
        let issued_at = Utc::now();
        Ok(Self {
            number: Invoice::number_for(&id, issued_at),
            id,
            booking_id: params.booking_id,
            user_id: params.user_id,
            lines: params.lines,
            subtotal: params.subtotal,
            discount: params.discount,
            total: params.subtotal - params.discount,
            issued_at,
        })
    }

    fn conflicts_with(&self, existing: &Self) -> Option<String> {
        (existing.booking_id == self.booking_id)
            .then(|| format!("booking {} already has invoice {}", self.booking_id, existing.number))
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
