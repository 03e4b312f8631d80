use super::catalog::{Catalog, CustomerOrders};
use super::checkout::OrderCheckout;
use super::eligibility::PurchaseEligibility;
use super::payment_registry::PaymentRegistry;
use crate::domain::customer::CustomerId;
use crate::domain::eligibility::{Eligibility, EligibilityPolicy};
use crate::domain::order::Order;
use crate::domain::page::Page;
use crate::domain::ports::{ClockRef, CustomerStore, OrderStore, ProductStore};
use crate::domain::product::Product;
use crate::error::Result;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Wires the use cases over one backing store.
///
/// Every service is stateless between calls, so a single `Storefront` can be
/// shared across concurrent requests.
pub struct Storefront {
    eligibility: PurchaseEligibility,
    checkout: OrderCheckout,
    catalog: Catalog,
    registry: Arc<PaymentRegistry>,
}

impl Storefront {
    pub fn new<S>(store: S, clock: ClockRef, registry: PaymentRegistry, policy: EligibilityPolicy) -> Self
    where
        S: CustomerStore + OrderStore + ProductStore + 'static,
    {
        let store = Arc::new(store);
        let registry = Arc::new(registry);
        Self {
            eligibility: PurchaseEligibility::with_policy(
                store.clone(),
                store.clone(),
                clock.clone(),
                policy,
            ),
            checkout: OrderCheckout::new(registry.clone(), store.clone(), clock),
            catalog: Catalog::new(store.clone(), store.clone(), store),
            registry,
        }
    }

    pub async fn can_purchase(&self, customer_id: CustomerId, purchase_value: Decimal) -> Result<bool> {
        self.eligibility.can_purchase(customer_id, purchase_value).await
    }

    pub async fn evaluate_purchase(&self, customer_id: CustomerId, purchase_value: Decimal) -> Result<Eligibility> {
        self.eligibility.evaluate(customer_id, purchase_value).await
    }

    pub async fn pay_order(&self, payment_method: &str, amount: Decimal, customer_id: CustomerId) -> Result<Order> {
        self.checkout.pay_order(payment_method, amount, customer_id).await
    }

    pub async fn list_products(&self, page: i64) -> Result<Page<Product>> {
        self.catalog.list_products(page).await
    }

    pub async fn list_customers(&self, page: i64) -> Result<Page<CustomerOrders>> {
        self.catalog.list_customers(page).await
    }

    pub fn payment_methods(&self) -> Vec<&str> {
        self.registry.methods()
    }
}
