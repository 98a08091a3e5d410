use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::booking_actor::{BookingAction, BookingError};
use crate::clients::{CouponClient, HotelClient, LedgerClient, NotificationClient, UserClient};
use crate::domain::{
    Booking, BookingCreate, BookingQuote, BookingRequest, BookingStatus, Caller, Hotel, Payment, PaymentState,
    PaymentStatus, RoomCategory, StayRange, TransactionKind,
};
use crate::hotel_actor::HotelError;
use crate::payment_actor::PaymentAction;

/// How a caller relates to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// The customer who made it.
    Guest,
    /// The hotel's owner or an admin.
    Manager,
}

fn hotel_error(e: HotelError) -> BookingError {
    match e {
        HotelError::NotFound(id) => BookingError::InvalidHotel(id),
        HotelError::RoomNotFound(id) => BookingError::InvalidRoom(id),
        HotelError::Unavailable(msg) => BookingError::Unavailable(msg),
        HotelError::Forbidden(msg) => BookingError::Forbidden(msg),
        HotelError::ActorCommunicationError(msg) => BookingError::ActorCommunicationError(msg),
        other => BookingError::ValidationError(other.to_string()),
    }
}

/// Client for interacting with the Booking actor.
///
/// Booking creation spans the user, hotel, room and coupon actors. Each
/// actor applies its own step atomically; when a later step fails the
/// earlier ones are undone (coupon use returned, rooms released).
#[derive(Clone)]
pub struct BookingClient {
    inner: ResourceClient<Booking>,
    users: UserClient,
    hotels: HotelClient,
    coupons: CouponClient,
    ledger: LedgerClient,
    payments: ResourceClient<Payment>,
    notifications: NotificationClient,
    max_stay_nights: i64,
}

impl_client_methods!(BookingClient, Booking, BookingError, booking);

impl BookingClient {
    pub fn new(
        inner: ResourceClient<Booking>,
        users: UserClient,
        hotels: HotelClient,
        coupons: CouponClient,
        ledger: LedgerClient,
        payments: ResourceClient<Payment>,
        notifications: NotificationClient,
        max_stay_nights: i64,
    ) -> Self {
        Self {
            inner,
            users,
            hotels,
            coupons,
            ledger,
            payments,
            notifications,
            max_stay_nights,
        }
    }

    /// Checks the request's shape and returns the stay.
    fn validate_request(&self, request: &BookingRequest, today: NaiveDate) -> Result<StayRange, BookingError> {
        let stay = StayRange::new(request.check_in, request.check_out).ok_or_else(|| {
            BookingError::ValidationError("check-out must be after check-in".to_string())
        })?;
        if request.check_in < today {
            return Err(BookingError::ValidationError(format!(
                "check-in {} is in the past",
                request.check_in
            )));
        }
        if stay.nights() > self.max_stay_nights {
            return Err(BookingError::ValidationError(format!(
                "stays are limited to {} nights",
                self.max_stay_nights
            )));
        }
        if request.guests == 0 {
            return Err(BookingError::ValidationError("at least one guest is required".to_string()));
        }
        if request.rooms == 0 {
            return Err(BookingError::ValidationError("at least one room is required".to_string()));
        }
        Ok(stay)
    }

    /// Loads the hotel and room category, making sure both can be booked together.
    async fn bookable_room(&self, request: &BookingRequest) -> Result<(Hotel, RoomCategory), BookingError> {
        let hotel = self
            .hotels
            .require_hotel(request.hotel_id.clone())
            .await
            .map_err(hotel_error)?;
        if !hotel.is_bookable() {
            return Err(BookingError::InvalidHotel(format!("{} is not open for bookings", hotel.id)));
        }
        let room = self
            .hotels
            .rooms()
            .require_room(request.room_category_id.clone())
            .await
            .map_err(hotel_error)?;
        if room.hotel_id != hotel.id {
            return Err(BookingError::InvalidRoom(format!(
                "{} does not belong to {}",
                room.id, hotel.id
            )));
        }
        Ok((hotel, room))
    }

    /// Prices a prospective booking without holding rooms or using the coupon.
    #[instrument(skip(self))]
    pub async fn quote(&self, request: BookingRequest, today: NaiveDate) -> Result<BookingQuote, BookingError> {
        debug!("Sending request");
        let stay = self.validate_request(&request, today)?;
        let (hotel, room) = self.bookable_room(&request).await?;
        let (subtotal, free_rooms) = self
            .hotels
            .rooms()
            .quote(room.id.clone(), request.guests, request.rooms, stay)
            .await
            .map_err(hotel_error)?;
        let discount = match request.coupon_code.as_deref() {
            Some(code) => self
                .coupons
                .preview(code, subtotal, today)
                .await
                .map_err(|e| BookingError::InvalidCoupon(e.to_string()))?,
            None => Decimal::ZERO,
        };
        Ok(BookingQuote {
            hotel_id: hotel.id,
            room_category_id: room.id,
            nights: stay.nights(),
            rooms: request.rooms,
            free_rooms,
            subtotal,
            discount,
            total: subtotal - discount,
        })
    }

    #[instrument(skip(self))]
    pub async fn create_booking(
        &self,
        caller: &Caller,
        request: BookingRequest,
        today: NaiveDate,
    ) -> Result<Booking, BookingError> {
        info!("Processing create_booking request (Client Side)");
        let stay = self.validate_request(&request, today)?;

        // Step 1: Validate user
        match self.users.get_user(caller.user_id.clone()).await {
            Ok(Some(user)) => debug!(user_name = %user.name, "User validation successful"),
            Ok(None) => {
                error!("User not found");
                return Err(BookingError::InvalidUser(caller.user_id.clone()));
            }
            Err(e) => {
                error!(error = %e, "User validation failed");
                return Err(BookingError::InvalidUser(format!("User validation failed: {}", e)));
            }
        }

        // Step 2: Validate hotel and room category
        let (hotel, room) = self.bookable_room(&request).await?;
        debug!(hotel_name = %hotel.name, room_name = %room.name, "Hotel validation successful");

        // Step 3: Price the stay
        let subtotal = room.quote(request.guests, request.rooms, &stay).ok_or_else(|| {
            BookingError::ValidationError(format!(
                "{} has no rate for {} guests in {} rooms",
                room.name, request.guests, request.rooms
            ))
        })?;

        // Step 4: Redeem coupon
        let redeemed = match request.coupon_code.as_deref() {
            Some(code) => match self.coupons.redeem(code, subtotal, today).await {
                Ok(redeemed) => Some(redeemed),
                Err(e) => {
                    warn!(error = %e, "Coupon rejected");
                    return Err(BookingError::InvalidCoupon(e.to_string()));
                }
            },
            None => None,
        };
        let discount = redeemed.as_ref().map_or(Decimal::ZERO, |(_, amount)| *amount);

        // Step 5: Reserve rooms
        let reservation_id = match self.hotels.rooms().reserve(room.id.clone(), stay, request.rooms).await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Room reservation failed");
                self.return_coupon(redeemed.as_ref()).await;
                return Err(hotel_error(e));
            }
        };

        // Step 6: Create booking in ResourceActor
        let payload = BookingCreate {
            user_id: caller.user_id.clone(),
            hotel_id: hotel.id.clone(),
            room_category_id: room.id.clone(),
            reservation_id,
            stay,
            guests: request.guests,
            rooms: request.rooms,
            subtotal,
            discount,
            coupon_code: request.coupon_code.as_deref().map(crate::domain::Coupon::normalize_code),
        };
        let booking = match self.inner.create(payload).await {
            Ok(booking) => booking,
            Err(e) => {
                error!(error = %e, "Booking creation failed");
                if let Err(e) = self.hotels.rooms().release(room.id.clone(), reservation_id).await {
                    error!(error = %e, reservation_id, "Failed to release rooms after booking failure");
                }
                self.return_coupon(redeemed.as_ref()).await;
                return Err(BookingError::from(e));
            }
        };
        info!(booking_id = %booking.id, total = %booking.total, "Booking created");

        // Step 7: Tell the customer
        self.notifications
            .notify(
                &booking.user_id,
                "Booking received",
                format!(
                    "Your booking {} at {} for {} to {} is waiting for payment of {} BDT.",
                    booking.id, hotel.name, booking.check_in, booking.check_out, booking.total
                ),
            )
            .await;
        Ok(booking)
    }

    async fn return_coupon(&self, redeemed: Option<&(String, Decimal)>) {
        if let Some((coupon_id, _)) = redeemed {
            if let Err(e) = self.coupons.unredeem(coupon_id.clone()).await {
                error!(error = %e, %coupon_id, "Failed to return coupon use");
            }
        }
    }

    /// Works out whether `caller` may see or change `booking`.
    async fn access(&self, caller: &Caller, booking: &Booking) -> Result<Access, BookingError> {
        if caller.is_admin() {
            return Ok(Access::Manager);
        }
        if caller.user_id == booking.user_id {
            return Ok(Access::Guest);
        }
        let hotel = self
            .hotels
            .require_hotel(booking.hotel_id.clone())
            .await
            .map_err(hotel_error)?;
        if hotel.owner_id == caller.user_id {
            Ok(Access::Manager)
        } else {
            Err(BookingError::Forbidden(format!("{} cannot access {}", caller.user_id, booking.id)))
        }
    }

    #[instrument(skip(self))]
    pub async fn get_booking_for(&self, caller: &Caller, id: String) -> Result<Booking, BookingError> {
        let booking = self.require_booking(id).await?;
        self.access(caller, &booking).await?;
        Ok(booking)
    }

    /// Cancels a booking and gives its rooms back.
    ///
    /// Customers cannot cancel on or after the check-in day; hotel owners and
    /// admins can. A paid booking is refunded in the ledger.
    #[instrument(skip(self))]
    pub async fn cancel_booking(&self, caller: &Caller, id: String, today: NaiveDate) -> Result<Booking, BookingError> {
        info!("Processing cancel_booking request (Client Side)");
        let booking = self.require_booking(id.clone()).await?;
        let cutoff = match self.access(caller, &booking).await? {
            Access::Guest => Some(today),
            Access::Manager => None,
        };

        let cancelled = self.inner.perform_action(id, BookingAction::Cancel { cutoff }).await?;
        self.release_rooms(&cancelled).await;

        // A payment still under review can no longer confirm anything.
        if booking.payment_status == PaymentStatus::Submitted {
            self.reject_open_payments(&cancelled.id).await;
        }

        if cancelled.payment_status == PaymentStatus::Refunded {
            if let Err(e) = self
                .ledger
                .record(&cancelled.id, None, TransactionKind::Refund, cancelled.total)
                .await
            {
                error!(error = %e, booking_id = %cancelled.id, "Failed to record refund");
            }
        }

        info!(booking_id = %cancelled.id, "Booking cancelled");
        self.notifications
            .notify(
                &cancelled.user_id,
                "Booking cancelled",
                format!("Your booking {} has been cancelled.", cancelled.id),
            )
            .await;
        Ok(cancelled)
    }

    /// Marks a confirmed stay as completed once its check-out day has come.
    #[instrument(skip(self))]
    pub async fn complete_booking(&self, caller: &Caller, id: String, today: NaiveDate) -> Result<Booking, BookingError> {
        let booking = self.require_booking(id.clone()).await?;
        if self.access(caller, &booking).await? != Access::Manager {
            return Err(BookingError::Forbidden("only the hotel or an admin can complete a stay".to_string()));
        }
        let completed = self.inner.perform_action(id, BookingAction::Complete { today }).await?;
        self.release_rooms(&completed).await;
        info!(booking_id = %completed.id, "Booking completed");
        Ok(completed)
    }

    /// Gives a finished or cancelled booking's rooms back. Failures are logged.
    async fn release_rooms(&self, booking: &Booking) {
        match self
            .hotels
            .rooms()
            .release(booking.room_category_id.clone(), booking.reservation_id)
            .await
        {
            Ok(rooms) => debug!(rooms, "Rooms returned to inventory"),
            Err(e) => error!(error = %e, booking_id = %booking.id, "Failed to release rooms"),
        }
    }

    async fn reject_open_payments(&self, booking_id: &str) {
        let lookup = booking_id.to_string();
        let open = match self
            .payments
            .list_where(move |p| p.booking_id == lookup && p.status == PaymentState::Pending)
            .await
        {
            Ok(open) => open,
            Err(e) => {
                error!(error = %e, %booking_id, "Failed to look up open payments");
                return;
            }
        };
        for payment in open {
            let note = Some("booking cancelled".to_string());
            match self.payments.perform_action(payment.id.clone(), PaymentAction::Reject { note }).await {
                Ok(_) => info!(payment_id = %payment.id, "Open payment rejected after cancellation"),
                Err(e) => warn!(error = %e, payment_id = %payment.id, "Open payment not rejected"),
            }
        }
    }

    /// The caller's bookings, newest first.
    #[instrument(skip(self))]
    pub async fn my_bookings(&self, caller: &Caller) -> Result<Vec<Booking>, BookingError> {
        let user_id = caller.user_id.clone();
        let mut bookings = self.inner.list_where(move |b| b.user_id == user_id).await?;
        bookings.reverse();
        Ok(bookings)
    }

    #[instrument(skip(self))]
    pub async fn hotel_bookings(&self, caller: &Caller, hotel_id: String) -> Result<Vec<Booking>, BookingError> {
        self.hotels.managed_hotel(caller, hotel_id.clone()).await.map_err(hotel_error)?;
        Ok(self.inner.list_where(move |b| b.hotel_id == hotel_id).await?)
    }

    /// True when the user has a confirmed or completed stay at the hotel.
    #[instrument(skip(self))]
    pub async fn has_stayed(&self, user_id: String, hotel_id: String) -> Result<bool, BookingError> {
        let stays = self
            .inner
            .list_where(move |b| {
                b.user_id == user_id
                    && b.hotel_id == hotel_id
                    && matches!(b.status, BookingStatus::Confirmed | BookingStatus::Completed)
            })
            .await?;
        Ok(!stays.is_empty())
    }

    /// Applies a status transition on behalf of another workflow (payments).
    #[instrument(skip(self))]
    pub(crate) async fn apply(&self, id: String, action: BookingAction) -> Result<Booking, BookingError> {
        debug!("Sending request");
        Ok(self.inner.perform_action(id, action).await?)
    }
}
