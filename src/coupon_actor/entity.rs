use chrono::Utc;
use rust_decimal::Decimal;

use super::actions::{CouponAction, CouponActionResult};
use crate::actor_framework::Entity;
use crate::domain::{Coupon, CouponCreate, Discount};

impl Entity for Coupon {
    type Id = String;
    type CreateParams = CouponCreate;
    type Patch = ();
    type Action = CouponAction;
    type ActionResult = CouponActionResult;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: CouponCreate) -> Result<Self, String> {
        let code = Coupon::normalize_code(&params.code);
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(format!("Invalid coupon code: {:?}", params.code));
        }
        match params.discount {
            Discount::Percentage(pct) if !(1..=100).contains(&pct) => {
                return Err(format!("Percentage must be between 1 and 100, got {pct}"));
            }
            Discount::Fixed(amount) if amount <= Decimal::ZERO => {
                return Err("Fixed discount must be positive".to_string());
            }
            _ => {}
        }
        if params.valid_from > params.valid_until {
            return Err("Validity window ends before it starts".to_string());
        }
        if params.usage_limit == 0 {
            return Err("Usage limit must be at least 1".to_string());
        }
        Ok(Self {
            id,
            code,
            discount: params.discount,
            max_discount: params.max_discount,
            min_subtotal: params.min_subtotal.max(Decimal::ZERO),
            valid_from: params.valid_from,
            valid_until: params.valid_until,
            usage_limit: params.usage_limit,
            used_count: 0,
            active: true,
            created_at: Utc::now(),
        })
    }

    fn conflicts_with(&self, existing: &Self) -> Option<String> {
        (existing.code == self.code).then(|| format!("code {} is taken", self.code))
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, action: CouponAction) -> Result<CouponActionResult, String> {
        match action {
            CouponAction::Preview { subtotal, today } => {
                self.check(subtotal, today)?;
                Ok(CouponActionResult::Discount(self.discount_for(subtotal)))
            }
            CouponAction::Redeem { subtotal, today } => {
                self.check(subtotal, today)?;
                self.used_count += 1;
                Ok(CouponActionResult::Discount(self.discount_for(subtotal)))
            }
            CouponAction::Unredeem => {
                self.used_count = self.used_count.saturating_sub(1);
                Ok(CouponActionResult::UsageReleased {
                    used_count: self.used_count,
                })
            }
            CouponAction::Deactivate => {
                self.active = false;
                Ok(CouponActionResult::Deactivated)
            }
        }
    }
}
