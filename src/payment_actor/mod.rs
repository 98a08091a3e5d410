//! Simulated payment confirmations, the transaction ledger and invoices.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
