use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Transaction, TransactionCreate, TransactionKind};
use crate::payment_actor::PaymentError;

/// Append-only record of charges and refunds.
#[derive(Clone)]
pub struct LedgerClient {
    inner: ResourceClient<Transaction>,
}

impl_basic_client!(LedgerClient, Transaction, PaymentError, transaction);

impl LedgerClient {
    /// Writes a ledger entry. Zero amounts (fully discounted stays) leave no entry.
    #[instrument(skip(self))]
    pub async fn record(
        &self,
        booking_id: &str,
        payment_id: Option<String>,
        kind: TransactionKind,
        amount: Decimal,
    ) -> Result<Option<Transaction>, PaymentError> {
        debug!("Sending request");
        if amount.is_zero() {
            return Ok(None);
        }
        let transaction = self
            .inner
            .create(TransactionCreate {
                booking_id: booking_id.to_string(),
                payment_id,
                kind,
                amount,
            })
            .await?;
        info!(transaction_id = %transaction.id, %booking_id, ?kind, %amount, "Ledger entry written");
        Ok(Some(transaction))
    }

    #[instrument(skip(self))]
    pub async fn for_booking(&self, booking_id: String) -> Result<Vec<Transaction>, PaymentError> {
        debug!("Sending request");
        Ok(self.inner.list_where(move |t| t.booking_id == booking_id).await?)
    }

    /// Charges minus refunds across the whole ledger.
    #[instrument(skip(self))]
    pub async fn net_revenue(&self) -> Result<Decimal, PaymentError> {
        let entries = self.inner.list().await?;
        Ok(entries.iter().map(Transaction::signed_amount).sum())
    }
}
