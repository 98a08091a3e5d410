use chrono::{NaiveDate, Utc};

use crate::app_system::BookingSystem;
use crate::clients::{
    BookingClient, CouponClient, DashboardClient, HotelClient, NotificationClient, PaymentClient, ReviewClient,
    SupportClient, UserClient,
};

/// Source of "today" for date rules (check-in cutoff, coupon windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Utc::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// Handles shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: UserClient,
    pub hotels: HotelClient,
    pub coupons: CouponClient,
    pub bookings: BookingClient,
    pub payments: PaymentClient,
    pub reviews: ReviewClient,
    pub support: SupportClient,
    pub notifications: NotificationClient,
    pub dashboard: DashboardClient,
    pub clock: Clock,
}

impl AppState {
    pub fn new(system: &BookingSystem, clock: Clock) -> Self {
        Self {
            users: system.users.clone(),
            hotels: system.hotels.clone(),
            coupons: system.coupons.clone(),
            bookings: system.bookings.clone(),
            payments: system.payments.clone(),
            reviews: system.reviews.clone(),
            support: system.support.clone(),
            notifications: system.notifications.clone(),
            dashboard: system.dashboard.clone(),
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
