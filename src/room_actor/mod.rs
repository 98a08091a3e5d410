//! Room categories: the room counter and the overlap check that guard
//! against overbooking.

mod actions;
pub mod entity;

pub use actions::*;
