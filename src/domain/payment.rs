use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Simulated local payment channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Bkash,
    Nagad,
    BankTransfer,
}

impl PaymentMethod {
    /// Checks the shape of what the customer typed into the confirmation form.
    ///
    /// Mobile wallets need the sending wallet number (`01[3-9]` followed by
    /// eight digits) and a transaction id of 8 to 12 upper-case letters or
    /// digits. Bank transfers only need a reference.
    pub fn validate(&self, reference: &str, payer_account: Option<&str>) -> Result<(), String> {
        let reference = reference.trim();
        match self {
            PaymentMethod::Bkash | PaymentMethod::Nagad => {
                let account = payer_account.map(str::trim).unwrap_or_default();
                if !is_mobile_wallet(account) {
                    return Err(format!("Invalid wallet number: {account:?}"));
                }
                let valid_trx = (8..=12).contains(&reference.len())
                    && reference.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
                if !valid_trx {
                    return Err(format!("Invalid transaction id: {reference:?}"));
                }
                Ok(())
            }
            PaymentMethod::BankTransfer => {
                if reference.is_empty() {
                    return Err("Bank transfer reference is required".to_string());
                }
                Ok(())
            }
        }
    }
}

fn is_mobile_wallet(number: &str) -> bool {
    let bytes = number.as_bytes();
    bytes.len() == 11
        && number.starts_with("01")
        && (b'3'..=b'9').contains(&bytes[2])
        && bytes.iter().all(u8::is_ascii_digit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    Pending,
    Verified,
    Rejected,
}

/// A customer's claim to have paid for a booking, waiting on an admin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub id: String,
    pub booking_id: String,
    pub user_id: String,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub reference: String,
    pub payer_account: Option<String>,
    pub status: PaymentState,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct PaymentCreate {
    pub booking_id: String,
    pub user_id: String,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub reference: String,
    pub payer_account: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Charge,
    Refund,
}

/// Ledger entry. Charges and refunds are never edited once written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: String,
    pub booking_id: String,
    pub payment_id: Option<String>,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Amount with refunds negated.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Charge => self.amount,
            TransactionKind::Refund => -self.amount,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransactionCreate {
    pub booking_id: String,
    pub payment_id: Option<String>,
    pub kind: TransactionKind,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLine {
    pub description: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub id: String,
    pub number: String,
    pub booking_id: String,
    pub user_id: String,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub issued_at: DateTime<Utc>,
}

impl Invoice {
    /// `INV-<year>-<seq>` where `seq` is the numeric tail of the invoice id.
    pub fn number_for(id: &str, issued_at: DateTime<Utc>) -> String {
        let seq = id
            .rsplit('_')
            .next()
            .and_then(|tail| tail.parse::<u64>().ok())
            .unwrap_or(0);
        format!("INV-{}-{:05}", issued_at.year(), seq)
    }

    /// Plain-text rendering used for downloads and email bodies.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Invoice {}", self.number);
        let _ = writeln!(out, "Booking: {}", self.booking_id);
        let _ = writeln!(out, "Issued: {}", self.issued_at.format("%Y-%m-%d"));
        let _ = writeln!(out);
        for line in &self.lines {
            let _ = writeln!(
                out,
                "{:<40} {:>4} x {:>10} = {:>12}",
                line.description, line.quantity, line.unit_price, line.amount
            );
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{:<40} {:>31}", "Subtotal", self.subtotal);
        if !self.discount.is_zero() {
            let _ = writeln!(out, "{:<40} {:>31}", "Discount", -self.discount);
        }
        let _ = writeln!(out, "{:<40} {:>31}", "Total (BDT)", self.total);
        out
    }
}

#[derive(Debug, Clone)]
pub struct InvoiceCreate {
    pub booking_id: String,
    pub user_id: String,
    pub lines: Vec<InvoiceLine>,
    pub subtotal: Decimal,
    pub discount: Decimal,
}
