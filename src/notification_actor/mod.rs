//! In-app notifications plus the outbound dispatch seam for SMS, push and email.

pub mod dispatcher;
pub mod entity;
pub mod error;

pub use dispatcher::*;
pub use entity::NotificationAction;
pub use error::*;
