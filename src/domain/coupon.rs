use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Discount {
    /// Whole percent, 1 to 100.
    Percentage(u32),
    Fixed(Decimal),
}

/// A discount code with a validity window and a usage limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coupon {
    pub id: String,
    pub code: String,
    pub discount: Discount,
    pub max_discount: Option<Decimal>,
    pub min_subtotal: Decimal,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub usage_limit: u32,
    pub used_count: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    /// Normalized form used for storage and lookups.
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Discount on `subtotal`, never more than the subtotal itself.
    pub fn discount_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let raw = match self.discount {
            Discount::Percentage(pct) => {
                let amount = subtotal * Decimal::from(pct) / Decimal::ONE_HUNDRED;
                match self.max_discount {
                    Some(cap) => amount.min(cap),
                    None => amount,
                }
            }
            Discount::Fixed(amount) => amount,
        };
        raw.min(subtotal).max(Decimal::ZERO).round_dp(2)
    }

    /// Whether the coupon may be applied to `subtotal` on `today`.
    pub fn check(&self, subtotal: Decimal, today: NaiveDate) -> Result<(), String> {
        if !self.active {
            return Err(format!("Coupon {} is no longer active", self.code));
        }
        if today < self.valid_from {
            return Err(format!("Coupon {} is valid from {}", self.code, self.valid_from));
        }
        if today > self.valid_until {
            return Err(format!("Coupon {} expired on {}", self.code, self.valid_until));
        }
        if self.used_count >= self.usage_limit {
            return Err(format!("Coupon {} has reached its usage limit", self.code));
        }
        if subtotal < self.min_subtotal {
            return Err(format!(
                "Coupon {} needs a subtotal of at least {}",
                self.code, self.min_subtotal
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CouponCreate {
    pub code: String,
    pub discount: Discount,
    pub max_discount: Option<Decimal>,
    pub min_subtotal: Decimal,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub usage_limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, day).unwrap()
    }

    fn coupon(discount: Discount) -> Coupon {
        Coupon {
            id: "coupon_1".into(),
            code: "WINTER".into(),
            discount,
            max_discount: None,
            min_subtotal: dec!(1000),
            valid_from: date(1),
            valid_until: date(31),
            usage_limit: 2,
            used_count: 0,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_percentage_discount_with_cap() {
        let mut c = coupon(Discount::Percentage(15));
        assert_eq!(c.discount_for(dec!(9999)), dec!(1499.85));
        c.max_discount = Some(dec!(1000));
        assert_eq!(c.discount_for(dec!(9999)), dec!(1000));
        assert_eq!(coupon(Discount::Percentage(100)).discount_for(dec!(450)), dec!(450));
    }

    #[test]
    fn test_fixed_discount_never_exceeds_subtotal() {
        let c = coupon(Discount::Fixed(dec!(500)));
        assert_eq!(c.discount_for(dec!(2000)), dec!(500));
        assert_eq!(c.discount_for(dec!(300)), dec!(300));
        assert_eq!(c.discount_for(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_check_window_limit_and_minimum() {
        let mut c = coupon(Discount::Percentage(10));
        assert!(c.check(dec!(1000), date(1)).is_ok());
        assert!(c.check(dec!(1000), date(31)).is_ok());
        assert!(c.check(dec!(999), date(10)).is_err());
        assert!(c.check(dec!(5000), NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()).is_err());
        assert!(c.check(dec!(5000), NaiveDate::from_ymd_opt(2026, 11, 30).unwrap()).is_err());

        c.used_count = 2;
        assert!(c.check(dec!(5000), date(10)).unwrap_err().contains("usage limit"));
        c.used_count = 0;
        c.active = false;
        assert!(c.check(dec!(5000), date(10)).is_err());
    }

    #[test]
    fn test_codes_normalize() {
        assert_eq!(Coupon::normalize_code("  winter25 "), "WINTER25");
    }
}
