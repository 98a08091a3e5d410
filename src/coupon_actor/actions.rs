use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub enum CouponAction {
    /// Computes the discount without consuming a use.
    Preview { subtotal: Decimal, today: NaiveDate },
    /// Validates, consumes one use and returns the discount.
    ///
    /// # Errors
    /// Fails when the coupon is inactive, outside its window, used up, or the
    /// subtotal is below the minimum.
    Redeem { subtotal: Decimal, today: NaiveDate },
    /// Gives a use back after the booking it was redeemed for fell through.
    Unredeem,
    Deactivate,
}

/// Results from CouponActions
#[derive(Debug, Clone, PartialEq)]
pub enum CouponActionResult {
    Discount(Decimal),
    UsageReleased { used_count: u32 },
    Deactivated,
}
