use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, instrument};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::clients::LedgerClient;
use crate::domain::{
    Booking, BookingStatus, Caller, ContactRequest, ContactStatus, Hotel, HotelStatus, Payment, PaymentState,
    Review, ReviewStatus, User,
};
use crate::payment_actor::PaymentError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DashboardError {
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for DashboardError {
    fn from(e: FrameworkError) -> Self {
        DashboardError::ActorCommunicationError(e.to_string())
    }
}

impl From<PaymentError> for DashboardError {
    fn from(e: PaymentError) -> Self {
        DashboardError::ActorCommunicationError(e.to_string())
    }
}

/// Platform totals shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub users: usize,
    pub hotels: usize,
    pub pending_hotels: usize,
    pub bookings: usize,
    pub bookings_by_status: BTreeMap<String, usize>,
    pub revenue: Decimal,
    pub pending_payments: usize,
    pub pending_reviews: usize,
    pub open_contacts: usize,
}

/// Read-only view across the stores for admins.
#[derive(Clone)]
pub struct DashboardClient {
    users: ResourceClient<User>,
    hotels: ResourceClient<Hotel>,
    bookings: ResourceClient<Booking>,
    payments: ResourceClient<Payment>,
    reviews: ResourceClient<Review>,
    contacts: ResourceClient<ContactRequest>,
    ledger: LedgerClient,
}

fn status_label(status: BookingStatus) -> String {
    match status {
        BookingStatus::Pending => "pending",
        BookingStatus::Confirmed => "confirmed",
        BookingStatus::Cancelled => "cancelled",
        BookingStatus::Completed => "completed",
    }
    .to_string()
}

impl DashboardClient {
    pub fn new(
        users: ResourceClient<User>,
        hotels: ResourceClient<Hotel>,
        bookings: ResourceClient<Booking>,
        payments: ResourceClient<Payment>,
        reviews: ResourceClient<Review>,
        contacts: ResourceClient<ContactRequest>,
        ledger: LedgerClient,
    ) -> Self {
        Self {
            users,
            hotels,
            bookings,
            payments,
            reviews,
            contacts,
            ledger,
        }
    }

    #[instrument(skip(self))]
    pub async fn stats(&self, caller: &Caller) -> Result<DashboardStats, DashboardError> {
        if !caller.is_admin() {
            return Err(DashboardError::Forbidden("only admins see the dashboard".to_string()));
        }
        let users = self.users.list().await?.len();
        let hotels = self.hotels.list().await?;
        let bookings = self.bookings.list().await?;

        let mut bookings_by_status = BTreeMap::new();
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Completed,
        ] {
            bookings_by_status.insert(status_label(status), 0);
        }
        for booking in &bookings {
            *bookings_by_status.entry(status_label(booking.status)).or_insert(0) += 1;
        }

        let stats = DashboardStats {
            users,
            hotels: hotels.len(),
            pending_hotels: hotels.iter().filter(|h| h.status == HotelStatus::Pending).count(),
            bookings: bookings.len(),
            bookings_by_status,
            revenue: self.ledger.net_revenue().await?,
            pending_payments: count(&self.payments, |p| p.status == PaymentState::Pending).await?,
            pending_reviews: count(&self.reviews, |r| r.status == ReviewStatus::Pending).await?,
            open_contacts: count(&self.contacts, |c| c.status == ContactStatus::Open).await?,
        };
        info!(users = stats.users, bookings = stats.bookings, revenue = %stats.revenue, "Dashboard computed");
        Ok(stats)
    }
}

async fn count<T: crate::actor_framework::Entity>(
    client: &ResourceClient<T>,
    filter: impl Fn(&T) -> bool + Send + Sync + 'static,
) -> Result<usize, FrameworkError> {
    Ok(client.list_where(filter).await?.len())
}
