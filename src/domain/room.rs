//! Room categories and the date arithmetic behind availability.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A half-open stay `[check_in, check_out)`: the guest sleeps every night
/// from `check_in` up to, but not including, `check_out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    /// Returns `None` unless `check_in` is strictly before `check_out`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Option<Self> {
        (check_in < check_out).then_some(Self { check_in, check_out })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Two stays overlap when they share at least one night. A guest checking
    /// out on the day another checks in does not conflict.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && self.check_out > other.check_in
    }

    /// True when the night starting on `date` belongs to this stay.
    pub fn covers_night(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }
}

/// Nightly rate for a room holding up to `max_guests` people.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub max_guests: u32,
    pub nightly_rate: Decimal,
}

/// A hold on `rooms` rooms for a stay, owned by one booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reservation {
    pub id: u64,
    pub stay: StayRange,
    pub rooms: u32,
}

/// A bookable room type within a hotel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomCategory {
    pub id: String,
    pub hotel_id: String,
    pub name: String,
    pub total_rooms: u32,
    /// Rooms not held by any active reservation, whatever the dates.
    /// Kept within `0..=total_rooms`.
    pub available_rooms: u32,
    /// Sorted by `max_guests`, ascending.
    pub prices: Vec<Price>,
    #[serde(skip)]
    pub reservations: Vec<Reservation>,
    #[serde(skip)]
    pub next_reservation: u64,
}

impl RoomCategory {
    /// Rooms held by reservations whose stay overlaps `stay`.
    pub fn booked_rooms(&self, stay: &StayRange) -> u32 {
        self.reservations
            .iter()
            .filter(|r| r.stay.overlaps(stay))
            .map(|r| r.rooms)
            .sum()
    }

    pub fn free_rooms(&self, stay: &StayRange) -> u32 {
        self.total_rooms.saturating_sub(self.booked_rooms(stay))
    }

    /// Rooms held by every active reservation.
    pub fn held_rooms(&self) -> u32 {
        self.reservations.iter().map(|r| r.rooms).sum()
    }

    /// Highest number of rooms occupied on any single night.
    ///
    /// Occupancy only rises on a check-in day, so checking the first night of
    /// each reservation is enough.
    pub fn peak_occupancy(&self) -> u32 {
        self.reservations
            .iter()
            .map(|candidate| {
                let night = candidate.stay.check_in();
                self.reservations
                    .iter()
                    .filter(|r| r.stay.covers_night(night))
                    .map(|r| r.rooms)
                    .sum::<u32>()
            })
            .max()
            .unwrap_or(0)
    }

    /// Cheapest tier that fits `guests` in one room.
    pub fn tier_for(&self, guests: u32) -> Option<&Price> {
        self.prices.iter().find(|p| p.max_guests >= guests)
    }

    /// Price of `rooms` rooms for the stay, spreading `guests` evenly.
    pub fn quote(&self, guests: u32, rooms: u32, stay: &StayRange) -> Option<Decimal> {
        if guests == 0 || rooms == 0 {
            return None;
        }
        let per_room = guests.div_ceil(rooms);
        let tier = self.tier_for(per_room)?;
        let total = tier.nightly_rate * Decimal::from(stay.nights()) * Decimal::from(rooms);
        Some(total.round_dp(2))
    }
}

#[derive(Debug, Clone)]
pub struct RoomCategoryCreate {
    pub hotel_id: String,
    pub name: String,
    pub total_rooms: u32,
    pub prices: Vec<Price>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomCategoryPatch {
    pub name: Option<String>,
    pub total_rooms: Option<u32>,
    pub prices: Option<Vec<Price>>,
}

/// Per-category availability for a stay, as shown to a customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomAvailability {
    pub room_category_id: String,
    pub name: String,
    pub free_rooms: u32,
    pub nightly_rate: Option<Decimal>,
    pub quote: Option<Decimal>,
}
