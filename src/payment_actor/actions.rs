/// Admin review outcomes for a pending payment.
#[derive(Debug, Clone)]
pub enum PaymentAction {
    Verify,
    Reject { note: Option<String> },
}
