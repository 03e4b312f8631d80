//! JSON views returned by front ends.
//!
//! Orders are stored in UTC; this is the only place where their timestamps
//! are shifted into the display zone.

use crate::application::catalog::CustomerOrders;
use crate::domain::customer::CustomerId;
use crate::domain::eligibility::{DenialReason, Eligibility};
use crate::domain::order::{Order, OrderId};
use crate::domain::page::Page;
use crate::domain::product::{Product, ProductId};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Serialize;

/// Offset used for displaying order dates when none is configured (UTC-03:00).
pub const DEFAULT_DISPLAY_OFFSET_SECS: i32 = -3 * 3600;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub value: Decimal,
    pub customer_id: CustomerId,
    pub order_date: DateTime<FixedOffset>,
}

impl OrderView {
    pub fn new(order: &Order, display: FixedOffset) -> Self {
        Self {
            id: order.id,
            value: order.value,
            customer_id: order.customer_id,
            order_date: order.order_date.with_timezone(&display),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerView {
    pub id: CustomerId,
    pub name: String,
    pub orders: Vec<OrderView>,
}

impl CustomerView {
    pub fn new(entry: CustomerOrders, display: FixedOffset) -> Self {
        Self {
            id: entry.customer.id,
            name: entry.customer.name,
            orders: entry
                .orders
                .iter()
                .map(|order| OrderView::new(order, display))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
        }
    }
}

pub fn customer_page(page: Page<CustomerOrders>, display: FixedOffset) -> Page<CustomerView> {
    page.map(|entry| CustomerView::new(entry, display))
}

pub fn product_page(page: Page<Product>) -> Page<ProductView> {
    page.map(ProductView::from)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityView {
    pub customer_id: CustomerId,
    pub purchase_value: Decimal,
    pub eligible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenialReason>,
}

impl EligibilityView {
    pub fn new(customer_id: CustomerId, purchase_value: Decimal, eligibility: Eligibility) -> Self {
        Self {
            customer_id,
            purchase_value,
            eligible: eligibility.is_allowed(),
            reason: eligibility.reason(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentMethodsView {
    pub methods: Vec<String>,
}
