use crate::domain::customer::{Customer, CustomerId};
use crate::domain::order::{Order, OrderId, positive_id, to_money};
use crate::domain::product::{Product, ProductId};
use crate::error::{Result, StorefrontError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::marker::PhantomData;

/// Reads seed records of type `T` from a CSV source.
///
/// This reader wraps `csv::Reader` and provides an iterator over `Result<T>`.
/// It handles whitespace trimming and flexible record lengths automatically.
pub struct SeedReader<R: Read, T> {
    reader: csv::Reader<R>,
    record: PhantomData<T>,
}

impl<R: Read, T: DeserializeOwned> SeedReader<R, T> {
    /// Creates a new `SeedReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self {
            reader,
            record: PhantomData,
        }
    }

    /// Returns an iterator that lazily reads and deserializes records.
    pub fn records(self) -> impl Iterator<Item = Result<T>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(StorefrontError::from))
    }
}

/// `id,name`
#[derive(Debug, Deserialize)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
}

impl TryFrom<CustomerRecord> for Customer {
    type Error = StorefrontError;

    fn try_from(record: CustomerRecord) -> Result<Self> {
        Ok(Customer::new(positive_id("id", record.id)?, record.name))
    }
}

/// `id,name`
#[derive(Debug, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
}

impl TryFrom<ProductRecord> for Product {
    type Error = StorefrontError;

    fn try_from(record: ProductRecord) -> Result<Self> {
        Ok(Product::new(positive_id("id", record.id)?, record.name))
    }
}

/// `id,customer_id,value,order_date` with `order_date` in RFC 3339.
#[derive(Debug, Deserialize)]
pub struct OrderRecord {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub value: Decimal,
    pub order_date: DateTime<Utc>,
}

impl TryFrom<OrderRecord> for Order {
    type Error = StorefrontError;

    fn try_from(record: OrderRecord) -> Result<Self> {
        positive_id("id", record.id)?;
        positive_id("customer_id", record.customer_id)?;
        if record.value < Decimal::ZERO {
            return Err(StorefrontError::invalid_argument(
                "value",
                format!("order {} has a negative value", record.id),
            ));
        }
        Ok(Order {
            id: record.id,
            value: to_money(record.value),
            customer_id: record.customer_id,
            order_date: record.order_date,
        })
    }
}
