pub mod user;
pub mod hotel;
pub mod room;
pub mod booking;
pub mod payment;
pub mod review;
pub mod coupon;
pub mod support;
pub mod notification;

pub use user::*;
pub use hotel::*;
pub use room::*;
pub use booking::*;
pub use payment::*;
pub use review::*;
pub use coupon::*;
pub use support::*;
pub use notification::*;
