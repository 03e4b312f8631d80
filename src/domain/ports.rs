use super::customer::{Customer, CustomerId};
use super::order::{Amount, NewOrder, Order};
use super::page::{Page, PageRequest};
use super::product::Product;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Source of the current instant, always in UTC.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn store(&self, customer: Customer) -> Result<()>;
    async fn get(&self, id: CustomerId) -> Result<Option<Customer>>;
    /// Customers ordered by id.
    async fn page(&self, request: PageRequest) -> Result<Page<Customer>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a paid order, assigning its identity.
    ///
    /// Fails with `NotFound` when the owning customer does not exist.
    async fn insert(&self, order: NewOrder) -> Result<Order>;
    /// Stores an order that already carries an identity (seed data).
    async fn seed(&self, order: Order) -> Result<()>;
    /// Number of orders of `customer_id` placed at or after `since`.
    async fn count_since(&self, customer_id: CustomerId, since: DateTime<Utc>) -> Result<usize>;
    async fn has_any(&self, customer_id: CustomerId) -> Result<bool>;
    /// Orders of `customer_id` ordered by id.
    async fn for_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn store(&self, product: Product) -> Result<()>;
    /// Products ordered by id.
    async fn page(&self, request: PageRequest) -> Result<Page<Product>>;
}

/// Executes a payment through one named payment method.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Identifier matched case-insensitively against the requested method.
    fn method(&self) -> &str;
    /// Returns whether the payment went through.
    async fn process_payment(&self, amount: Amount) -> bool;
}

pub type ClockRef = Arc<dyn Clock>;
pub type CustomerStoreRef = Arc<dyn CustomerStore>;
pub type OrderStoreRef = Arc<dyn OrderStore>;
pub type ProductStoreRef = Arc<dyn ProductStore>;
pub type PaymentProcessorRef = Arc<dyn PaymentProcessor>;
