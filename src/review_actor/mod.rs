//! Guest reviews and their moderation.

pub mod entity;
pub mod error;

pub use entity::ReviewAction;
pub use error::*;
