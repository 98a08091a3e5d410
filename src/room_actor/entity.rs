use rust_decimal::Decimal;

use super::actions::{RoomAction, RoomActionResult};
use crate::actor_framework::Entity;
use crate::domain::{Price, Reservation, RoomCategory, RoomCategoryCreate, RoomCategoryPatch};

/// Sorted, validated price tiers.
fn validate_prices(mut prices: Vec<Price>) -> Result<Vec<Price>, String> {
    if prices.is_empty() {
        return Err("At least one price tier is required".to_string());
    }
    for price in &prices {
        if price.max_guests == 0 {
            return Err("Price tier must allow at least one guest".to_string());
        }
        if price.nightly_rate <= Decimal::ZERO {
            return Err(format!("Nightly rate for {} guests must be positive", price.max_guests));
        }
    }
    prices.sort_by_key(|p| p.max_guests);
    if prices.windows(2).any(|w| w[0].max_guests == w[1].max_guests) {
        return Err("Duplicate price tier for the same guest count".to_string());
    }
    Ok(prices)
}

impl Entity for RoomCategory {
    type Id = String;
    type CreateParams = RoomCategoryCreate;
    type Patch = RoomCategoryPatch;
    type Action = RoomAction;
    type ActionResult = RoomActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: RoomCategoryCreate) -> Result<Self, String> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err("Room category name must not be empty".to_string());
        }
        if params.total_rooms == 0 {
            return Err("A room category needs at least one room".to_string());
        }
        Ok(Self {
            id,
            hotel_id: params.hotel_id,
            name,
            total_rooms: params.total_rooms,
            available_rooms: params.total_rooms,
            prices: validate_prices(params.prices)?,
            reservations: Vec::new(),
            next_reservation: 1,
        })
    }

    /// Renames, re-prices or resizes the category.
    ///
    /// Shrinking below the busiest night already booked is refused; the
    /// available counter is recomputed from the active holds.
    fn on_update(&mut self, patch: RoomCategoryPatch) -> Result<(), String> {
        if let Some(name) = patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err("Room category name must not be empty".to_string());
            }
            self.name = name.to_string();
        }
        if let Some(prices) = patch.prices {
            self.prices = validate_prices(prices)?;
        }
        if let Some(total) = patch.total_rooms {
            let peak = self.peak_occupancy();
            if total == 0 || total < peak {
                return Err(format!(
                    "Cannot reduce to {total} rooms: {peak} rooms are already booked on a single night"
                ));
            }
            self.total_rooms = total;
            self.available_rooms = total.saturating_sub(self.held_rooms());
        }
        Ok(())
    }

    fn on_delete(&self) -> Result<(), String> {
        if !self.reservations.is_empty() {
            return Err(format!(
                "Room category {} still has {} active reservations",
                self.id,
                self.reservations.len()
            ));
        }
        Ok(())
    }

    fn handle_action(&mut self, action: RoomAction) -> Result<RoomActionResult, String> {
        match action {
            RoomAction::Reserve { stay, rooms } => {
                if rooms == 0 {
                    return Err("At least one room must be reserved".to_string());
                }
                let booked = self.booked_rooms(&stay);
                if booked + rooms > self.total_rooms {
                    return Err(format!(
                        "Not enough rooms available. {} taken, {} requested, {} total.",
                        booked, rooms, self.total_rooms
                    ));
                }
                let reservation_id = self.next_reservation;
                self.next_reservation += 1;
                self.reservations.push(Reservation {
                    id: reservation_id,
                    stay,
                    rooms,
                });
                self.available_rooms = self.available_rooms.saturating_sub(rooms);
                Ok(RoomActionResult::Reserved { reservation_id })
            }
            RoomAction::Release { reservation_id } => {
                let position = self
                    .reservations
                    .iter()
                    .position(|r| r.id == reservation_id)
                    .ok_or_else(|| format!("Unknown reservation {} on {}", reservation_id, self.id))?;
                let released = self.reservations.swap_remove(position);
                self.available_rooms = (self.available_rooms + released.rooms).min(self.total_rooms);
                Ok(RoomActionResult::Released {
                    rooms: released.rooms,
                })
            }
            RoomAction::Availability { stay } => Ok(RoomActionResult::Availability {
                free_rooms: self.free_rooms(&stay),
            }),
            RoomAction::Quote { guests, rooms, stay } => {
                let subtotal = self.quote(guests, rooms, &stay).ok_or_else(|| {
                    format!("{} has no rate for {} guests in {} rooms", self.name, guests, rooms)
                })?;
                Ok(RoomActionResult::Quoted {
                    subtotal,
                    free_rooms: self.free_rooms(&stay),
                })
            }
        }
    }
}
