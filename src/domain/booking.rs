use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::StayRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Rooms are held, waiting for payment.
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    /// A payment reference was submitted and awaits verification.
    Submitted,
    Paid,
    Refunded,
}

/// A customer's stay at a hotel, holding rooms of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub hotel_id: String,
    pub room_category_id: String,
    #[serde(skip)]
    pub reservation_id: u64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub rooms: u32,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub coupon_code: Option<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn stay(&self) -> Option<StayRange> {
        StayRange::new(self.check_in, self.check_out)
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Still holding rooms.
    pub fn is_active(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Payload for creating a booking once rooms are reserved and priced.
#[derive(Debug, Clone)]
pub struct BookingCreate {
    pub user_id: String,
    pub hotel_id: String,
    pub room_category_id: String,
    pub reservation_id: u64,
    pub stay: StayRange,
    pub guests: u32,
    pub rooms: u32,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub coupon_code: Option<String>,
}

/// What a customer asks for.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub hotel_id: String,
    pub room_category_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub rooms: u32,
    pub coupon_code: Option<String>,
}

/// Price breakdown for a prospective booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingQuote {
    pub hotel_id: String,
    pub room_category_id: String,
    pub nights: i64,
    pub rooms: u32,
    pub free_rooms: u32,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}
