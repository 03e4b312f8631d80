use super::payment_registry::PaymentRegistry;
use crate::domain::customer::CustomerId;
use crate::domain::order::{Amount, NewOrder, Order};
use crate::domain::ports::{ClockRef, OrderStoreRef};
use crate::error::{Result, StorefrontError};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Turns a successful payment into a persisted order.
///
/// An attempt moves from pending to either succeeded (the order is inserted)
/// or failed (nothing is written). There is no automatic retry and no
/// eligibility check; callers consult [`PurchaseEligibility`] beforehand.
///
/// [`PurchaseEligibility`]: super::eligibility::PurchaseEligibility
pub struct OrderCheckout {
    registry: Arc<PaymentRegistry>,
    orders: OrderStoreRef,
    clock: ClockRef,
}

impl OrderCheckout {
    pub fn new(registry: Arc<PaymentRegistry>, orders: OrderStoreRef, clock: ClockRef) -> Self {
        Self {
            registry,
            orders,
            clock,
        }
    }

    #[instrument(skip(self))]
    pub async fn pay_order(
        &self,
        payment_method: &str,
        amount: Decimal,
        customer_id: CustomerId,
    ) -> Result<Order> {
        let processor = self.registry.resolve(payment_method)?;
        let amount = Amount::new(amount)?;

        if !processor.process_payment(amount).await {
            warn!(method = processor.method(), "payment declined");
            return Err(StorefrontError::PaymentFailed {
                method: processor.method().to_string(),
            });
        }

        let order = self
            .orders
            .insert(NewOrder::new(amount, customer_id, self.clock.now()))
            .await?;
        info!(order_id = order.id, "order persisted");
        Ok(order)
    }
}
