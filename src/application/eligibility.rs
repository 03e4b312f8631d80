use crate::domain::customer::CustomerId;
use crate::domain::eligibility::{DenialReason, Eligibility, EligibilityPolicy, one_month_before};
use crate::domain::ports::{ClockRef, CustomerStoreRef, OrderStoreRef};
use crate::error::{Result, StorefrontError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

/// Decides whether a customer may purchase right now.
///
/// The rules run in a fixed order and the first failing rule decides the
/// outcome:
///
/// 1. the customer must exist (an error, not a denial),
/// 2. no order within the last calendar month,
/// 3. a first purchase may not exceed the first-purchase cap,
/// 4. "now" must fall inside business hours on a weekday.
///
/// The engine only reads from the stores and holds no state between calls.
pub struct PurchaseEligibility {
    customers: CustomerStoreRef,
    orders: OrderStoreRef,
    clock: ClockRef,
    policy: EligibilityPolicy,
}

impl PurchaseEligibility {
    pub fn new(customers: CustomerStoreRef, orders: OrderStoreRef, clock: ClockRef) -> Self {
        Self::with_policy(customers, orders, clock, EligibilityPolicy::default())
    }

    pub fn with_policy(
        customers: CustomerStoreRef,
        orders: OrderStoreRef,
        clock: ClockRef,
        policy: EligibilityPolicy,
    ) -> Self {
        Self {
            customers,
            orders,
            clock,
            policy,
        }
    }

    /// Returns whether `customer_id` may purchase `purchase_value` now.
    ///
    /// A `false` result is a business denial; invalid input and unknown
    /// customers are reported as errors instead.
    pub async fn can_purchase(&self, customer_id: CustomerId, purchase_value: Decimal) -> Result<bool> {
        Ok(self.evaluate(customer_id, purchase_value).await?.is_allowed())
    }

    /// Same as [`can_purchase`](Self::can_purchase) but keeps the reason of a denial.
    #[instrument(skip(self), fields(now = tracing::field::Empty))]
    pub async fn evaluate(&self, customer_id: CustomerId, purchase_value: Decimal) -> Result<Eligibility> {
        if customer_id <= 0 {
            return Err(StorefrontError::invalid_argument(
                "customer_id",
                format!("must be positive, got {customer_id}"),
            ));
        }
        if purchase_value <= Decimal::ZERO {
            return Err(StorefrontError::invalid_argument(
                "purchase_value",
                format!("must be positive, got {purchase_value}"),
            ));
        }

        if self.customers.get(customer_id).await?.is_none() {
            return Err(StorefrontError::NotFound(customer_id));
        }

        let now = self.clock.now();
        tracing::Span::current().record("now", tracing::field::display(now));

        let decision = self.apply_rules(customer_id, purchase_value, now).await?;
        match decision {
            Eligibility::Allowed => debug!("purchase allowed"),
            Eligibility::Denied(reason) => info!(%reason, "purchase denied"),
        }
        Ok(decision)
    }

    async fn apply_rules(
        &self,
        customer_id: CustomerId,
        purchase_value: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Eligibility> {
        let recent = self
            .orders
            .count_since(customer_id, one_month_before(now))
            .await?;
        if recent > 0 {
            return Ok(Eligibility::Denied(DenialReason::PurchasedWithinLastMonth));
        }

        if !self.orders.has_any(customer_id).await?
            && purchase_value > self.policy.first_purchase_cap
        {
            return Ok(Eligibility::Denied(DenialReason::FirstPurchaseOverCap));
        }

        if !self.policy.is_business_hours(now) {
            return Ok(Eligibility::Denied(DenialReason::OutsideBusinessHours));
        }

        Ok(Eligibility::Allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::Customer;
    use crate::domain::order::{Amount, NewOrder};
    use crate::domain::ports::{CustomerStore, OrderStore};
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::in_memory::InMemoryStore;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn thursday_10am() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 6, 15, 10, 0, 0).unwrap()
    }

    async fn engine_at(now: DateTime<Utc>) -> (PurchaseEligibility, InMemoryStore) {
        let store = InMemoryStore::new();
        CustomerStore::store(&store, Customer::new(1, "Test Customer"))
            .await
            .unwrap();
        let engine = PurchaseEligibility::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(FixedClock::new(now)),
        );
        (engine, store)
    }

    async fn place_order(store: &InMemoryStore, at: DateTime<Utc>) {
        store
            .insert(NewOrder::new(Amount::new(dec!(50)).unwrap(), 1, at))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_non_positive_customer_id_is_invalid() {
        let (engine, _) = engine_at(thursday_10am()).await;
        for id in [0, -1] {
            let result = engine.can_purchase(id, dec!(50)).await;
            assert!(matches!(
                result,
                Err(StorefrontError::InvalidArgument { name: "customer_id", .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_non_positive_value_is_invalid() {
        let (engine, _) = engine_at(thursday_10am()).await;
        for value in [dec!(0), dec!(-10)] {
            let result = engine.can_purchase(1, value).await;
            assert!(matches!(
                result,
                Err(StorefrontError::InvalidArgument { name: "purchase_value", .. })
            ));
        }
    }

    #[tokio::test]
    async fn test_unknown_customer_is_not_found() {
        let (engine, _) = engine_at(thursday_10am()).await;
        let err = engine.can_purchase(999, dec!(50)).await.unwrap_err();
        assert!(matches!(err, StorefrontError::NotFound(999)));
        assert!(err.to_string().contains("Customer Id 999 does not exist"));
    }

    #[tokio::test]
    async fn test_order_in_last_month_denies() {
        let now = thursday_10am();
        let (engine, store) = engine_at(now).await;
        place_order(&store, now - Duration::days(10)).await;

        let decision = engine.evaluate(1, dec!(75)).await.unwrap();
        assert_eq!(
            decision,
            Eligibility::Denied(DenialReason::PurchasedWithinLastMonth)
        );
    }

    #[tokio::test]
    async fn test_first_purchase_cap() {
        let (engine, _) = engine_at(thursday_10am()).await;
        assert!(engine.can_purchase(1, dec!(100)).await.unwrap());
        assert!(!engine.can_purchase(1, dec!(100.01)).await.unwrap());
        assert_eq!(
            engine.evaluate(1, dec!(150)).await.unwrap(),
            Eligibility::Denied(DenialReason::FirstPurchaseOverCap)
        );
    }

    #[tokio::test]
    async fn test_returning_customer_may_exceed_cap() {
        let now = thursday_10am();
        let (engine, store) = engine_at(now).await;
        place_order(&store, now - Duration::days(45)).await;

        assert!(engine.can_purchase(1, dec!(500)).await.unwrap());
    }

    #[tokio::test]
    async fn test_outside_business_hours_denies_first_time_buyer() {
        let (engine, _) = engine_at(Utc.with_ymd_and_hms(2023, 6, 15, 20, 0, 0).unwrap()).await;
        assert_eq!(
            engine.evaluate(1, dec!(50)).await.unwrap(),
            Eligibility::Denied(DenialReason::OutsideBusinessHours)
        );
    }

    #[tokio::test]
    async fn test_frequency_rule_runs_before_cap() {
        let now = thursday_10am();
        let (engine, store) = engine_at(now).await;
        place_order(&store, now - Duration::days(1)).await;

        assert_eq!(
            engine.evaluate(1, dec!(1000)).await.unwrap(),
            Eligibility::Denied(DenialReason::PurchasedWithinLastMonth)
        );
    }
}
