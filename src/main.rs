mod actor_framework;
mod api;
mod app_system;
mod clients;
mod domain;

mod booking_actor;
mod coupon_actor;
mod hotel_actor;
mod notification_actor;
mod payment_actor;
mod review_actor;
mod room_actor;
mod support_actor;
mod user_actor;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
mod mock_framework;

use tracing::{error, info, Instrument};

use crate::api::{AppState, Clock};
use crate::app_system::{setup_tracing, BookingSystem, Config};

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = Config::load().map_err(|e| e.to_string())?;
    setup_tracing(config.log_format);

    info!(address = %config.address(), "Starting innkeep");

    // Starts every actor
    let system = BookingSystem::new(&config);

    let span = tracing::info_span!("admin_seed");
    async {
        match system.seed_admin(&config).await {
            Ok(admin) => info!(user_id = %admin.id, email = %admin.email, "Admin account ready"),
            Err(e) => error!(error = %e, "Failed to seed the admin account"),
        }
    }
    .instrument(span)
    .await;

    let state = AppState::new(&system, Clock::System);
    let served = api::serve(&config, state).await;
    if let Err(e) = &served {
        error!(error = %e, "Server stopped with an error");
    }

    system.shutdown().await?;
    info!("Application stopped");
    served
}
