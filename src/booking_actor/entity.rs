use chrono::Utc;
use rust_decimal::Decimal;

use super::actions::BookingAction;
use crate::actor_framework::Entity;
use crate::domain::{Booking, BookingCreate, BookingStatus, PaymentStatus};

impl Entity for Booking {
    type Id = String;
    type CreateParams = BookingCreate;
    type Patch = (); // Bookings only change through actions
    type Action = BookingAction;
    type ActionResult = Booking;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a pending, unpaid booking from an already reserved and priced stay.
    fn from_create_params(id: String, params: BookingCreate) -> Result<Self, String> {
        if params.discount < Decimal::ZERO || params.discount > params.subtotal {
            return Err(format!(
                "Discount {} must be between 0 and the subtotal {}",
                params.discount, params.subtotal
            ));
        }
        Ok(Self {
            id,
            user_id: params.user_id,
            hotel_id: params.hotel_id,
            room_category_id: params.room_category_id,
            reservation_id: params.reservation_id,
            check_in: params.stay.check_in(),
            check_out: params.stay.check_out(),
            guests: params.guests,
            rooms: params.rooms,
            subtotal: params.subtotal,
            discount: params.discount,
            total: params.subtotal - params.discount,
            coupon_code: params.coupon_code,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, action: BookingAction) -> Result<Booking, String> {
        match action {
            BookingAction::Cancel { cutoff } => {
                if !self.is_active() {
                    return Err(format!("Booking {} is already {:?}", self.id, self.status));
                }
                if let Some(today) = cutoff {
                    if self.check_in <= today {
                        return Err("Cannot cancel booking after or on check-in date".to_string());
                    }
                }
                self.status = BookingStatus::Cancelled;
                self.payment_status = match self.payment_status {
                    PaymentStatus::Paid => PaymentStatus::Refunded,
                    PaymentStatus::Submitted => PaymentStatus::Unpaid,
                    other => other,
                };
            }
            BookingAction::PaymentSubmitted => {
                if self.status != BookingStatus::Pending || self.payment_status != PaymentStatus::Unpaid {
                    return Err(format!(
                        "Booking {} is not awaiting payment ({:?}, {:?})",
                        self.id, self.status, self.payment_status
                    ));
                }
                self.payment_status = PaymentStatus::Submitted;
            }
            BookingAction::PaymentRejected => {
                if self.payment_status != PaymentStatus::Submitted {
                    return Err(format!("Booking {} has no submitted payment", self.id));
                }
                self.payment_status = PaymentStatus::Unpaid;
            }
            BookingAction::Confirm => {
                if self.status != BookingStatus::Pending || self.payment_status != PaymentStatus::Submitted {
                    return Err(format!(
                        "Booking {} cannot be confirmed ({:?}, {:?})",
                        self.id, self.status, self.payment_status
                    ));
                }
                self.status = BookingStatus::Confirmed;
                self.payment_status = PaymentStatus::Paid;
            }
            BookingAction::Complete { today } => {
                if self.status != BookingStatus::Confirmed {
                    return Err(format!("Only confirmed bookings can be completed, {} is {:?}", self.id, self.status));
                }
                if today < self.check_out {
                    return Err(format!("Booking {} checks out on {}", self.id, self.check_out));
                }
                self.status = BookingStatus::Completed;
            }
        }
        Ok(self.clone())
    }
}
