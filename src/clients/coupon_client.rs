use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::coupon_actor::{CouponAction, CouponActionResult, CouponError};
use crate::domain::{Caller, Coupon, CouponCreate};

/// Client for interacting with the Coupon actor.
///
/// Coupons are addressed by code; the code is resolved to an id first and
/// the action then runs inside the actor, so validation and the usage
/// counter change together.
#[derive(Clone)]
pub struct CouponClient {
    inner: ResourceClient<Coupon>,
}

impl_basic_client!(CouponClient, Coupon, CouponError, coupon);

impl CouponClient {
    #[instrument(skip(self, params), fields(code = %params.code))]
    pub async fn create_coupon(&self, caller: &Caller, params: CouponCreate) -> Result<Coupon, CouponError> {
        debug!("Sending request");
        if !caller.is_admin() {
            return Err(CouponError::Forbidden("only admins create coupons".to_string()));
        }
        let coupon = self.inner.create(params).await?;
        info!(coupon_id = %coupon.id, code = %coupon.code, "Coupon created");
        Ok(coupon)
    }

    #[instrument(skip(self))]
    pub async fn list_coupons(&self, caller: &Caller) -> Result<Vec<Coupon>, CouponError> {
        if !caller.is_admin() {
            return Err(CouponError::Forbidden("only admins list coupons".to_string()));
        }
        Ok(self.inner.list().await?)
    }

    #[instrument(skip(self))]
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>, CouponError> {
        debug!("Sending request");
        let code = Coupon::normalize_code(code);
        Ok(self.inner.list_where(move |c| c.code == code).await?.pop())
    }

    async fn id_for_code(&self, code: &str) -> Result<String, CouponError> {
        self.find_by_code(code)
            .await?
            .map(|c| c.id)
            .ok_or_else(|| CouponError::NotFound(Coupon::normalize_code(code)))
    }

    /// Discount the code would give on `subtotal` today, without using it.
    #[instrument(skip(self))]
    pub async fn preview(&self, code: &str, subtotal: Decimal, today: NaiveDate) -> Result<Decimal, CouponError> {
        let id = self.id_for_code(code).await?;
        match self.inner.perform_action(id, CouponAction::Preview { subtotal, today }).await? {
            CouponActionResult::Discount(amount) => Ok(amount),
            other => Err(unexpected(other)),
        }
    }

    /// Consumes one use of the code. Returns the coupon id, needed to give
    /// the use back, and the discount.
    #[instrument(skip(self))]
    pub async fn redeem(
        &self,
        code: &str,
        subtotal: Decimal,
        today: NaiveDate,
    ) -> Result<(String, Decimal), CouponError> {
        let id = self.id_for_code(code).await?;
        match self
            .inner
            .perform_action(id.clone(), CouponAction::Redeem { subtotal, today })
            .await?
        {
            CouponActionResult::Discount(amount) => {
                info!(coupon_id = %id, %amount, "Coupon redeemed");
                Ok((id, amount))
            }
            other => Err(unexpected(other)),
        }
    }

    /// Gives back a use taken by [`CouponClient::redeem`].
    #[instrument(skip(self))]
    pub async fn unredeem(&self, coupon_id: String) -> Result<u32, CouponError> {
        match self.inner.perform_action(coupon_id.clone(), CouponAction::Unredeem).await? {
            CouponActionResult::UsageReleased { used_count } => {
                info!(%coupon_id, used_count, "Coupon use returned");
                Ok(used_count)
            }
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, caller: &Caller, code: &str) -> Result<(), CouponError> {
        if !caller.is_admin() {
            return Err(CouponError::Forbidden("only admins deactivate coupons".to_string()));
        }
        let id = self.id_for_code(code).await?;
        match self.inner.perform_action(id.clone(), CouponAction::Deactivate).await? {
            CouponActionResult::Deactivated => {
                info!(coupon_id = %id, "Coupon deactivated");
                Ok(())
            }
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: CouponActionResult) -> CouponError {
    warn!(?result, "Unexpected coupon action result");
    CouponError::ActorCommunicationError(format!("unexpected coupon action result: {result:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::ResourceActor;
    use crate::domain::{Discount, Role};
    use rust_decimal_macros::dec;

    fn start() -> CouponClient {
        let counter = std::sync::atomic::AtomicU64::new(1);
        let next_id = move || format!("coupon_{}", counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst));
        let (actor, inner) = ResourceActor::new("coupons", 8, next_id);
        tokio::spawn(actor.run());
        CouponClient::new(inner)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, d).unwrap()
    }

    fn winter() -> CouponCreate {
        CouponCreate {
            code: "winter10".into(),
            discount: Discount::Percentage(10),
            max_discount: Some(dec!(2000)),
            min_subtotal: dec!(1000),
            valid_from: day(1),
            valid_until: day(31),
            usage_limit: 1,
        }
    }

    #[tokio::test]
    async fn test_redeem_by_code_and_give_back() {
        let coupons = start();
        let admin = Caller::new("user_1", Role::Admin);
        coupons.create_coupon(&admin, winter()).await.unwrap();

        assert_eq!(coupons.preview(" Winter10 ", dec!(5000), day(5)).await.unwrap(), dec!(500));
        let (id, discount) = coupons.redeem("WINTER10", dec!(50000), day(5)).await.unwrap();
        assert_eq!(discount, dec!(2000));

        let used_up = coupons.redeem("WINTER10", dec!(5000), day(5)).await;
        assert!(matches!(used_up, Err(CouponError::NotApplicable(_))));

        assert_eq!(coupons.unredeem(id).await.unwrap(), 0);
        assert!(coupons.redeem("WINTER10", dec!(5000), day(6)).await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_only_management() {
        let coupons = start();
        let customer = Caller::new("user_2", Role::Customer);
        let admin = Caller::new("user_1", Role::Admin);
        assert!(matches!(coupons.create_coupon(&customer, winter()).await, Err(CouponError::Forbidden(_))));

        coupons.create_coupon(&admin, winter()).await.unwrap();
        let dup = coupons.create_coupon(&admin, winter()).await;
        assert!(matches!(dup, Err(CouponError::AlreadyExists(_))));

        assert!(matches!(coupons.deactivate(&customer, "WINTER10").await, Err(CouponError::Forbidden(_))));
        coupons.deactivate(&admin, "winter10").await.unwrap();
        assert!(coupons.preview("WINTER10", dec!(5000), day(5)).await.is_err());
        assert!(matches!(coupons.preview("NOPE", dec!(5000), day(5)).await, Err(CouponError::NotFound(_))));
    }
}
