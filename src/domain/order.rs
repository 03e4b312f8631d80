use super::customer::CustomerId;
use crate::error::StorefrontError;
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

pub type OrderId = i64;

/// Number of fractional digits kept for persisted order values.
pub const MONEY_SCALE: u32 = 2;

/// Represents a strictly positive monetary amount.
///
/// Purchase values and payment amounts are both expressed as `Amount`, so a
/// zero or negative value can never reach a payment processor.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, StorefrontError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(StorefrontError::invalid_argument(
                "amount",
                format!("must be positive, got {value}"),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// Checks that a record identity is strictly positive.
pub fn positive_id(name: &'static str, id: i64) -> Result<i64, StorefrontError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(StorefrontError::invalid_argument(
            name,
            format!("must be positive, got {id}"),
        ))
    }
}

/// Identity for the next inserted order, one past the highest stored id.
pub fn next_order_id(last: Option<OrderId>) -> Result<OrderId, StorefrontError> {
    match last {
        None => Ok(1),
        Some(last) => last
            .checked_add(1)
            .ok_or_else(|| StorefrontError::Storage(format!("order id space exhausted after {last}"))),
    }
}

/// Rounds a value to the precision orders are stored with.
pub fn to_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// An order that has been paid for but not yet persisted.
///
/// The store assigns the identity when it inserts the record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub value: Decimal,
    pub customer_id: CustomerId,
    pub order_date: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(amount: Amount, customer_id: CustomerId, order_date: DateTime<Utc>) -> Self {
        Self {
            value: to_money(amount.value()),
            customer_id,
            order_date,
        }
    }

    pub fn with_id(self, id: OrderId) -> Order {
        Order {
            id,
            value: self.value,
            customer_id: self.customer_id,
            order_date: self.order_date,
        }
    }
}

/// A persisted order. Immutable once created.
///
/// `order_date` is always kept in UTC; conversion to a display zone happens
/// only when the order is rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub value: Decimal,
    pub customer_id: CustomerId,
    pub order_date: DateTime<Utc>,
}
