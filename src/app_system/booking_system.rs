use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::config::Config;
use crate::actor_framework::{Entity, ResourceActor, ResourceClient};
use crate::clients::{
    BookingClient, CouponClient, DashboardClient, HotelClient, LedgerClient, NotificationClient, PaymentClient,
    ReviewClient, RoomClient, SupportClient, UserClient,
};
use crate::domain::User;
use crate::notification_actor::{Dispatcher, TracingDispatcher};
use crate::user_actor::UserError;

/// Id generator producing `<prefix>_1`, `<prefix>_2`, ...
pub fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || format!("{}_{}", prefix, counter.fetch_add(1, Ordering::SeqCst))
}

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring the clients together, and
/// handling shutdown.
pub struct BookingSystem {
    pub users: UserClient,
    pub hotels: HotelClient,
    pub coupons: CouponClient,
    pub bookings: BookingClient,
    pub payments: PaymentClient,
    pub reviews: ReviewClient,
    pub support: SupportClient,
    pub notifications: NotificationClient,
    pub dashboard: DashboardClient,
    handles: Vec<JoinHandle<()>>,
}

/// Spawns one actor and keeps its task handle.
fn start<T: Entity<Id = String>>(
    handles: &mut Vec<JoinHandle<()>>,
    name: &'static str,
    prefix: &'static str,
    buffer: usize,
) -> ResourceClient<T> {
    let (actor, client) = ResourceActor::<T>::new(name, buffer, sequential_ids(prefix));
    handles.push(tokio::spawn(actor.run()));
    client
}

impl BookingSystem {
    pub fn new(config: &Config) -> Self {
        Self::with_dispatcher(config, Arc::new(TracingDispatcher))
    }

    pub fn with_dispatcher(config: &Config, dispatcher: Arc<dyn Dispatcher>) -> Self {
        let buffer = config.actor_buffer;
        let mut handles = Vec::new();

        // 1. Plain stores
        let users_store = start(&mut handles, "users", "user", buffer);
        let hotels_store = start(&mut handles, "hotels", "hotel", buffer);
        let rooms_store = start(&mut handles, "rooms", "room", buffer);
        let coupons_store = start(&mut handles, "coupons", "coupon", buffer);
        let bookings_store = start(&mut handles, "bookings", "booking", buffer);
        let payments_store = start(&mut handles, "payments", "payment", buffer);
        let transactions_store = start(&mut handles, "transactions", "txn", buffer);
        let invoices_store = start(&mut handles, "invoices", "invoice", buffer);
        let reviews_store = start(&mut handles, "reviews", "review", buffer);
        let chats_store = start(&mut handles, "chats", "chat", buffer);
        let faqs_store = start(&mut handles, "faqs", "faq", buffer);
        let contacts_store = start(&mut handles, "contacts", "contact", buffer);
        let notifications_store = start(&mut handles, "notifications", "notification", buffer);

        // 2. Single-actor clients
        let users = UserClient::new(users_store.clone());
        let hotels = HotelClient::new(hotels_store.clone(), RoomClient::new(rooms_store));
        let coupons = CouponClient::new(coupons_store);
        let ledger = LedgerClient::new(transactions_store);
        let notifications = NotificationClient::new(notifications_store, dispatcher);
        let support = SupportClient::new(chats_store, faqs_store, contacts_store.clone());

        // 3. Orchestrating clients
        let bookings = BookingClient::new(
            bookings_store.clone(),
            users.clone(),
            hotels.clone(),
            coupons.clone(),
            ledger.clone(),
            payments_store.clone(),
            notifications.clone(),
            config.max_stay_nights,
        );
        let payments = PaymentClient::new(
            payments_store.clone(),
            invoices_store,
            bookings.clone(),
            ledger.clone(),
            notifications.clone(),
        );
        let reviews = ReviewClient::new(reviews_store.clone(), hotels.clone(), bookings.clone());
        let dashboard = DashboardClient::new(
            users_store,
            hotels_store,
            bookings_store,
            payments_store,
            reviews_store,
            contacts_store,
            ledger,
        );

        info!(actors = handles.len(), buffer, "Booking system started");
        Self {
            users,
            hotels,
            coupons,
            bookings,
            payments,
            reviews,
            support,
            notifications,
            dashboard,
            handles,
        }
    }

    /// Creates or promotes the configured admin account.
    pub async fn seed_admin(&self, config: &Config) -> Result<User, UserError> {
        self.users.seed_admin(&config.admin_name, &config.admin_email).await
    }

    pub async fn shutdown(mut self) -> Result<(), String> {
        info!("Shutting down system...");
        let handles = std::mem::take(&mut self.handles);
        // Dropping the clients closes every actor's channel.
        drop(self);
        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }
        info!("System shutdown complete.");
        Ok(())
    }
}
