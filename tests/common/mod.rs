#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::io::Error;
use std::path::Path;
use std::sync::Arc;
use storefront::application::Storefront;
use storefront::application::payment_registry::PaymentRegistry;
use storefront::domain::customer::Customer;
use storefront::domain::eligibility::EligibilityPolicy;
use storefront::domain::order::Order;
use storefront::domain::ports::{CustomerStore, OrderStore};
use storefront::infrastructure::clock::FixedClock;
use storefront::infrastructure::in_memory::InMemoryStore;

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
}

/// Thursday, 2023-06-15 10:00 UTC.
pub fn thursday_10am() -> DateTime<Utc> {
    utc(2023, 6, 15, 10, 0, 0)
}

/// A storefront over an in-memory store holding one customer (id 1) and the
/// given historical orders, with the clock frozen at `now`.
pub async fn storefront_at(
    now: DateTime<Utc>,
    history: &[Order],
) -> (Storefront, InMemoryStore, Arc<FixedClock>) {
    storefront_with(now, history, PaymentRegistry::with_defaults()).await
}

pub async fn storefront_with(
    now: DateTime<Utc>,
    history: &[Order],
    registry: PaymentRegistry,
) -> (Storefront, InMemoryStore, Arc<FixedClock>) {
    let store = InMemoryStore::new();
    CustomerStore::store(&store, Customer::new(1, "Customer C"))
        .await
        .unwrap();
    for order in history {
        store.seed(order.clone()).await.unwrap();
    }

    let clock = Arc::new(FixedClock::new(now));
    let storefront = Storefront::new(
        store.clone(),
        clock.clone(),
        registry,
        EligibilityPolicy::default(),
    );
    (storefront, store, clock)
}

pub fn write_customers(path: &Path, rows: &[(i64, &str)]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["id", "name"])?;
    for (id, name) in rows {
        wtr.write_record([id.to_string().as_str(), *name])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_products(path: &Path, count: i64) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["id", "name"])?;
    for id in 1..=count {
        wtr.write_record([id.to_string(), format!("Product {id}")])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_orders(path: &Path, rows: &[(i64, i64, &str, &str)]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["id", "customer_id", "value", "order_date"])?;
    for (id, customer_id, value, order_date) in rows {
        wtr.write_record([
            id.to_string().as_str(),
            customer_id.to_string().as_str(),
            *value,
            *order_date,
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
