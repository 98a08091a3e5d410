//! System orchestration, configuration, startup, and shutdown logic.

pub mod booking_system;
pub mod config;
pub mod tracing;

pub use booking_system::*;
pub use config::*;
pub use self::tracing::*;
