//! Typed handles over the resource actors.
//!
//! Simple clients wrap a single actor. Orchestrating clients (bookings,
//! payments, reviews) hold other clients and run multi-step workflows,
//! compensating earlier steps when a later one fails.

#[macro_use]
mod macros;

pub mod booking_client;
pub mod coupon_client;
pub mod dashboard_client;
pub mod hotel_client;
pub mod ledger_client;
pub mod notification_client;
pub mod payment_client;
pub mod review_client;
pub mod room_client;
pub mod support_client;
pub mod user_client;

pub use booking_client::BookingClient;
pub use coupon_client::CouponClient;
pub use dashboard_client::{DashboardClient, DashboardError, DashboardStats};
pub use hotel_client::{HotelClient, HotelSearch, HotelSummary};
pub use ledger_client::LedgerClient;
pub use notification_client::NotificationClient;
pub use payment_client::{PaymentClient, PaymentSubmission};
pub use review_client::ReviewClient;
pub use room_client::RoomClient;
pub use support_client::SupportClient;
pub use user_client::UserClient;
