//! Hotel listings and their approval workflow.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
