//! JSON procedure API: `POST /rpc/<domain>.<procedure>` with the caller
//! identified by the `x-user-id` header.

pub mod admin;
pub mod bookings;
pub mod chat;
pub mod coupons;
pub mod error;
pub mod extract;
pub mod hotels;
pub mod notifications;
pub mod payments;
pub mod reviews;
pub mod state;
pub mod support;
pub mod users;

use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::app_system::Config;

pub use error::ApiError;
pub use state::{AppState, Clock};

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(extract::USER_HEADER)]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/rpc/user.register", post(users::register))
        .route("/rpc/user.me", post(users::me))
        .route("/rpc/user.update", post(users::update))
        .route("/rpc/user.list", post(users::list))
        .route("/rpc/user.set_role", post(users::set_role))
        .route("/rpc/hotel.create", post(hotels::create))
        .route("/rpc/hotel.update", post(hotels::update))
        .route("/rpc/hotel.get", post(hotels::get))
        .route("/rpc/hotel.search", post(hotels::search))
        .route("/rpc/hotel.mine", post(hotels::mine))
        .route("/rpc/hotel.by_status", post(hotels::by_status))
        .route("/rpc/hotel.set_status", post(hotels::set_status))
        .route("/rpc/hotel.delete", post(hotels::delete))
        .route("/rpc/hotel.add_room", post(hotels::add_room))
        .route("/rpc/hotel.update_room", post(hotels::update_room))
        .route("/rpc/hotel.delete_room", post(hotels::delete_room))
        .route("/rpc/hotel.rooms", post(hotels::rooms))
        .route("/rpc/hotel.availability", post(hotels::availability))
        .route("/rpc/booking.quote", post(bookings::quote))
        .route("/rpc/booking.create", post(bookings::create))
        .route("/rpc/booking.get", post(bookings::get))
        .route("/rpc/booking.mine", post(bookings::mine))
        .route("/rpc/booking.for_hotel", post(bookings::for_hotel))
        .route("/rpc/booking.cancel", post(bookings::cancel))
        .route("/rpc/booking.complete", post(bookings::complete))
        .route("/rpc/payment.submit", post(payments::submit))
        .route("/rpc/payment.pending", post(payments::pending))
        .route("/rpc/payment.verify", post(payments::verify))
        .route("/rpc/payment.reject", post(payments::reject))
        .route("/rpc/payment.for_booking", post(payments::for_booking))
        .route("/rpc/payment.invoice", post(payments::invoice))
        .route("/rpc/review.create", post(reviews::create))
        .route("/rpc/review.moderate", post(reviews::moderate))
        .route("/rpc/review.for_hotel", post(reviews::for_hotel))
        .route("/rpc/review.pending", post(reviews::pending))
        .route("/rpc/coupon.create", post(coupons::create))
        .route("/rpc/coupon.preview", post(coupons::preview))
        .route("/rpc/coupon.deactivate", post(coupons::deactivate))
        .route("/rpc/coupon.list", post(coupons::list))
        .route("/rpc/chat.open", post(chat::open))
        .route("/rpc/chat.post", post(chat::post))
        .route("/rpc/chat.reply", post(chat::reply))
        .route("/rpc/chat.close", post(chat::close))
        .route("/rpc/chat.get", post(chat::get))
        .route("/rpc/chat.mine", post(chat::mine))
        .route("/rpc/support.faq_create", post(support::faq_create))
        .route("/rpc/support.faq_update", post(support::faq_update))
        .route("/rpc/support.faq_delete", post(support::faq_delete))
        .route("/rpc/support.faqs", post(support::faqs))
        .route("/rpc/support.contact", post(support::contact))
        .route("/rpc/support.contacts", post(support::contacts))
        .route("/rpc/support.resolve_contact", post(support::resolve_contact))
        .route("/rpc/notification.mine", post(notifications::mine))
        .route("/rpc/notification.read", post(notifications::read))
        .route("/rpc/notification.read_all", post(notifications::read_all))
        .route("/rpc/admin.dashboard", post(admin::dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serves the API until Ctrl+C or SIGTERM.
pub async fn serve(config: &Config, state: AppState) -> Result<(), String> {
    let address = config.address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| format!("Failed to bind {address}: {e}"))?;
    info!(%address, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {e}"))?;

    info!("Server shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
