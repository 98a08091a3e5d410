use chrono::NaiveDate;

/// Status transitions for a booking. Every action returns the updated booking.
#[derive(Debug, Clone)]
pub enum BookingAction {
    /// Cancels an active booking. With a `cutoff`, bookings whose check-in
    /// day is on or before it can no longer be cancelled.
    Cancel { cutoff: Option<NaiveDate> },
    /// A payment reference was submitted for an unpaid pending booking.
    PaymentSubmitted,
    /// The submitted payment was rejected; the booking is unpaid again.
    PaymentRejected,
    /// The submitted payment was verified.
    Confirm,
    /// The guest has checked out.
    Complete { today: NaiveDate },
}
