use crate::domain::customer::{Customer, CustomerId};
use crate::domain::order::{NewOrder, Order, OrderId, next_order_id, positive_id};
use crate::domain::page::{Page, PageRequest};
use crate::domain::ports::{CustomerStore, OrderStore, ProductStore};
use crate::domain::product::{Product, ProductId};
use crate::error::{Result, StorefrontError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for customers, products and orders.
///
/// Each collection sits behind its own `Arc<RwLock<BTreeMap<..>>>` so that
/// clones share state and listings come out ordered by id. When a lock on
/// both customers and orders is needed, customers are locked first.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    customers: Arc<RwLock<BTreeMap<CustomerId, Customer>>>,
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
    orders: Arc<RwLock<BTreeMap<OrderId, Order>>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for InMemoryStore {
    async fn store(&self, customer: Customer) -> Result<()> {
        let mut customers = self.customers.write().await;
        customers.insert(customer.id, customer);
        Ok(())
    }

    async fn get(&self, id: CustomerId) -> Result<Option<Customer>> {
        let customers = self.customers.read().await;
        Ok(customers.get(&id).cloned())
    }

    async fn page(&self, request: PageRequest) -> Result<Page<Customer>> {
        let customers = self.customers.read().await;
        Ok(request.apply(customers.values().cloned().collect()))
    }
}

#[async_trait]
impl ProductStore for InMemoryStore {
    async fn store(&self, product: Product) -> Result<()> {
        let mut products = self.products.write().await;
        products.insert(product.id, product);
        Ok(())
    }

    async fn page(&self, request: PageRequest) -> Result<Page<Product>> {
        let products = self.products.read().await;
        Ok(request.apply(products.values().cloned().collect()))
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let customers = self.customers.read().await;
        if !customers.contains_key(&order.customer_id) {
            return Err(StorefrontError::NotFound(order.customer_id));
        }

        let mut orders = self.orders.write().await;
        let id = next_order_id(orders.keys().next_back().copied())?;
        let order = order.with_id(id);
        orders.insert(id, order.clone());
        Ok(order)
    }

    async fn seed(&self, order: Order) -> Result<()> {
        positive_id("id", order.id)?;
        let customers = self.customers.read().await;
        if !customers.contains_key(&order.customer_id) {
            return Err(StorefrontError::NotFound(order.customer_id));
        }

        let mut orders = self.orders.write().await;
        orders.insert(order.id, order);
        Ok(())
    }

    async fn count_since(&self, customer_id: CustomerId, since: DateTime<Utc>) -> Result<usize> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .filter(|o| o.customer_id == customer_id && o.order_date >= since)
            .count())
    }

    async fn has_any(&self, customer_id: CustomerId) -> Result<bool> {
        let orders = self.orders.read().await;
        Ok(orders.values().any(|o| o.customer_id == customer_id))
    }

    async fn for_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::Amount;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 6, day, 10, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_in_memory_customer_store() {
        let store = InMemoryStore::new();
        let customer = Customer::new(1, "Ada");

        CustomerStore::store(&store, customer.clone()).await.unwrap();
        let retrieved = CustomerStore::get(&store, 1).await.unwrap().unwrap();
        assert_eq!(retrieved, customer);

        assert!(CustomerStore::get(&store, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = InMemoryStore::new();
        CustomerStore::store(&store, Customer::new(1, "Ada")).await.unwrap();

        let amount = Amount::new(dec!(10)).unwrap();
        let first = store.insert(NewOrder::new(amount, 1, at(1))).await.unwrap();
        let second = store.insert(NewOrder::new(amount, 1, at(2))).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_insert_continues_after_seeded_ids() {
        let store = InMemoryStore::new();
        CustomerStore::store(&store, Customer::new(1, "Ada")).await.unwrap();
        let seeded = NewOrder::new(Amount::new(dec!(5)).unwrap(), 1, at(1)).with_id(41);
        store.seed(seeded).await.unwrap();

        let inserted = store
            .insert(NewOrder::new(Amount::new(dec!(5)).unwrap(), 1, at(2)))
            .await
            .unwrap();
        assert_eq!(inserted.id, 42);
    }

    #[tokio::test]
    async fn test_seed_rejects_non_positive_ids() {
        let store = InMemoryStore::new();
        CustomerStore::store(&store, Customer::new(1, "Ada")).await.unwrap();

        for id in [0, -5] {
            let seeded = NewOrder::new(Amount::new(dec!(5)).unwrap(), 1, at(1)).with_id(id);
            let result = store.seed(seeded).await;
            assert!(matches!(result, Err(StorefrontError::InvalidArgument { name: "id", .. })));
        }
        assert!(!store.has_any(1).await.unwrap());

        let inserted = store
            .insert(NewOrder::new(Amount::new(dec!(5)).unwrap(), 1, at(2)))
            .await
            .unwrap();
        assert_eq!(inserted.id, 1);
    }

    #[tokio::test]
    async fn test_insert_after_max_id_is_an_error() {
        let store = InMemoryStore::new();
        CustomerStore::store(&store, Customer::new(1, "Ada")).await.unwrap();
        let seeded = NewOrder::new(Amount::new(dec!(5)).unwrap(), 1, at(1)).with_id(i64::MAX);
        store.seed(seeded).await.unwrap();

        let result = store
            .insert(NewOrder::new(Amount::new(dec!(5)).unwrap(), 1, at(2)))
            .await;
        assert!(matches!(result, Err(StorefrontError::Storage(_))));
        assert_eq!(store.for_customer(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_insert_for_unknown_customer_fails() {
        let store = InMemoryStore::new();
        let result = store
            .insert(NewOrder::new(Amount::new(dec!(10)).unwrap(), 9, at(1)))
            .await;
        assert!(matches!(result, Err(StorefrontError::NotFound(9))));
        assert!(!store.has_any(9).await.unwrap());
    }

    #[tokio::test]
    async fn test_count_since_is_inclusive_and_per_customer() {
        let store = InMemoryStore::new();
        CustomerStore::store(&store, Customer::new(1, "Ada")).await.unwrap();
        CustomerStore::store(&store, Customer::new(2, "Bob")).await.unwrap();
        let amount = Amount::new(dec!(10)).unwrap();
        store.insert(NewOrder::new(amount, 1, at(10))).await.unwrap();
        store.insert(NewOrder::new(amount, 1, at(5))).await.unwrap();
        store.insert(NewOrder::new(amount, 2, at(12))).await.unwrap();

        assert_eq!(store.count_since(1, at(10)).await.unwrap(), 1);
        assert_eq!(store.count_since(1, at(10) + Duration::seconds(1)).await.unwrap(), 0);
        assert_eq!(store.count_since(1, at(1)).await.unwrap(), 2);
        assert_eq!(store.for_customer(1).await.unwrap().len(), 2);
        assert!(store.has_any(2).await.unwrap());
    }

    #[tokio::test]
    async fn test_product_page() {
        let store = InMemoryStore::new();
        for id in (1..=12).rev() {
            ProductStore::store(&store, Product::new(id, format!("product {id}")))
                .await
                .unwrap();
        }

        let page = ProductStore::page(&store, PageRequest::new(2).unwrap()).await.unwrap();
        assert_eq!(page.total_count, 12);
        assert!(!page.has_next);
        assert_eq!(page.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![11, 12]);
    }
}
