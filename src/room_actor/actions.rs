use rust_decimal::Decimal;

use crate::domain::StayRange;

/// Custom actions for RoomCategory entities.
///
/// These run inside the room actor, so the overlap count and the counter
/// update of a `Reserve` happen as one step.
#[derive(Debug, Clone)]
pub enum RoomAction {
    /// Holds `rooms` rooms for the stay.
    ///
    /// # Errors
    /// Fails when the rooms already booked on overlapping stays plus the
    /// requested rooms exceed the category's total.
    Reserve { stay: StayRange, rooms: u32 },
    /// Gives back the rooms of a reservation. Each reservation can be
    /// released once.
    Release { reservation_id: u64 },
    /// Counts rooms still free for the stay without holding anything.
    Availability { stay: StayRange },
    /// Prices `rooms` rooms for the stay from the tier fitting the guests.
    Quote { guests: u32, rooms: u32, stay: StayRange },
}

/// Results from RoomActions - variants match 1:1 with RoomAction
#[derive(Debug, Clone, PartialEq)]
pub enum RoomActionResult {
    Reserved { reservation_id: u64 },
    Released { rooms: u32 },
    Availability { free_rooms: u32 },
    Quoted { subtotal: Decimal, free_rooms: u32 },
}
