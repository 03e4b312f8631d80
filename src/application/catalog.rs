use crate::domain::customer::Customer;
use crate::domain::order::Order;
use crate::domain::page::{Page, PageRequest};
use crate::domain::ports::{CustomerStoreRef, OrderStoreRef, ProductStoreRef};
use crate::domain::product::Product;
use crate::error::Result;
use tracing::debug;

/// A customer together with the orders they own.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerOrders {
    pub customer: Customer,
    pub orders: Vec<Order>,
}

/// Paginated, read-only listings of products and customers.
pub struct Catalog {
    customers: CustomerStoreRef,
    orders: OrderStoreRef,
    products: ProductStoreRef,
}

impl Catalog {
    pub fn new(customers: CustomerStoreRef, orders: OrderStoreRef, products: ProductStoreRef) -> Self {
        Self {
            customers,
            orders,
            products,
        }
    }

    pub async fn list_products(&self, page: i64) -> Result<Page<Product>> {
        let request = PageRequest::new(page)?;
        let listing = self.products.page(request).await?;
        debug!(page, returned = listing.items.len(), total = listing.total_count, "listed products");
        Ok(listing)
    }

    pub async fn list_customers(&self, page: i64) -> Result<Page<CustomerOrders>> {
        let request = PageRequest::new(page)?;
        let listing = self.customers.page(request).await?;
        debug!(page, returned = listing.items.len(), total = listing.total_count, "listed customers");

        let mut entries = Vec::with_capacity(listing.items.len());
        for customer in listing.items {
            let orders = self.orders.for_customer(customer.id).await?;
            entries.push(CustomerOrders { customer, orders });
        }
        Ok(request.wrap(entries, listing.total_count))
    }
}
