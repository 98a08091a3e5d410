//! Help desk records: chat threads, FAQ entries and contact requests.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
