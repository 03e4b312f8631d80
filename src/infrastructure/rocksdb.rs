use crate::domain::customer::{Customer, CustomerId};
use crate::domain::order::{NewOrder, Order, OrderId, next_order_id, positive_id};
use crate::domain::page::{Page, PageRequest};
use crate::domain::ports::{CustomerStore, OrderStore, ProductStore};
use crate::domain::product::Product;
use crate::error::{Result, StorefrontError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rocksdb::{
    ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options, WriteBatch,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for customer records.
pub const CF_CUSTOMERS: &str = "customers";
/// Column Family for product records.
pub const CF_PRODUCTS: &str = "products";
/// Column Family for order records.
pub const CF_ORDERS: &str = "orders";
/// Column Family indexing order ids by owning customer (empty values).
pub const CF_CUSTOMER_ORDERS: &str = "customer_orders";

/// A persistent store implementation using RocksDB.
///
/// Customers, products and orders live in separate Column Families, keyed by
/// [`encode_id`] so that iteration yields records ordered by id. The
/// `customer_orders` family maps `customer id ++ order id` to nothing, which
/// lets per-customer lookups read only that customer's orders.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
/// Order writes are serialized through `write_lock` so that identity
/// assignment stays unique and the index stays in step with the orders.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_lock: Arc<Mutex<()>>,
}

/// Order-preserving key for a signed id: flipping the sign bit makes the
/// big-endian bytes sort the same way as the integers.
pub fn encode_id(id: i64) -> [u8; 8] {
    ((id as u64) ^ (1 << 63)).to_be_bytes()
}

pub fn decode_id(bytes: &[u8]) -> Result<i64> {
    let bytes: [u8; 8] = bytes
        .try_into()
        .map_err(|_| StorefrontError::Storage("malformed record key".to_string()))?;
    Ok((u64::from_be_bytes(bytes) ^ (1 << 63)) as i64)
}

fn index_key(customer_id: CustomerId, order_id: OrderId) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&encode_id(customer_id));
    key[8..].copy_from_slice(&encode_id(order_id));
    key
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "customers", "products", "orders" and
    /// "customer_orders" column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let families = [CF_CUSTOMERS, CF_PRODUCTS, CF_ORDERS, CF_CUSTOMER_ORDERS]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, families)?;

        Ok(Self {
            db: Arc::new(db),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorefrontError::Storage(format!("{name} column family not found")))
    }

    fn write_record<T: Serialize>(&self, family: &str, id: i64, record: &T) -> Result<()> {
        self.db.put_cf(self.cf(family)?, encode_id(id), encode(record)?)?;
        Ok(())
    }

    fn read_record<T: DeserializeOwned>(&self, family: &str, id: i64) -> Result<Option<T>> {
        match self.db.get_cf(self.cf(family)?, encode_id(id))? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn contains(&self, family: &str, id: i64) -> Result<bool> {
        Ok(self
            .db
            .get_pinned_cf(self.cf(family)?, encode_id(id))?
            .is_some())
    }

    fn scan<T: DeserializeOwned>(&self, family: &str) -> Result<Vec<T>> {
        let mut records = Vec::new();
        for item in self.db.iterator_cf(self.cf(family)?, IteratorMode::Start) {
            let (_key, value) = item?;
            records.push(decode(&value)?);
        }
        Ok(records)
    }

    fn last_order_id(&self) -> Result<Option<OrderId>> {
        let mut iter = self.db.iterator_cf(self.cf(CF_ORDERS)?, IteratorMode::End);
        match iter.next() {
            Some(item) => {
                let (key, _value) = item?;
                Ok(Some(decode_id(&key)?))
            }
            None => Ok(None),
        }
    }

    /// Writes the order and its index entry atomically, dropping the index
    /// entry of a previous owner when a seeded order changes customer.
    fn write_order(&self, order: &Order) -> Result<()> {
        let orders = self.cf(CF_ORDERS)?;
        let index = self.cf(CF_CUSTOMER_ORDERS)?;

        let mut batch = WriteBatch::default();
        if let Some(previous) = self.read_record::<Order>(CF_ORDERS, order.id)? {
            if previous.customer_id != order.customer_id {
                batch.delete_cf(index, index_key(previous.customer_id, previous.id));
            }
        }
        batch.put_cf(orders, encode_id(order.id), encode(order)?);
        batch.put_cf(index, index_key(order.customer_id, order.id), b"");
        self.db.write(batch)?;
        Ok(())
    }

    /// Orders of `customer_id` ordered by id, read through the index.
    fn orders_of(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        let prefix = encode_id(customer_id);
        let mode = IteratorMode::From(prefix.as_slice(), Direction::Forward);

        let mut orders = Vec::new();
        for item in self.db.iterator_cf(self.cf(CF_CUSTOMER_ORDERS)?, mode) {
            let (key, _value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            let order_id = decode_id(&key[prefix.len()..])?;
            if let Some(order) = self.read_record(CF_ORDERS, order_id)? {
                orders.push(order);
            }
        }
        Ok(orders)
    }
}

fn encode<T: Serialize>(record: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(record)
        .map_err(|e| StorefrontError::Storage(format!("Serialization error: {e}")))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| StorefrontError::Storage(format!("Deserialization error: {e}")))
}

#[async_trait]
impl CustomerStore for RocksDBStore {
    async fn store(&self, customer: Customer) -> Result<()> {
        self.write_record(CF_CUSTOMERS, customer.id, &customer)
    }

    async fn get(&self, id: CustomerId) -> Result<Option<Customer>> {
        self.read_record(CF_CUSTOMERS, id)
    }

    async fn page(&self, request: PageRequest) -> Result<Page<Customer>> {
        Ok(request.apply(self.scan(CF_CUSTOMERS)?))
    }
}

#[async_trait]
impl ProductStore for RocksDBStore {
    async fn store(&self, product: Product) -> Result<()> {
        self.write_record(CF_PRODUCTS, product.id, &product)
    }

    async fn page(&self, request: PageRequest) -> Result<Page<Product>> {
        Ok(request.apply(self.scan(CF_PRODUCTS)?))
    }
}

#[async_trait]
impl OrderStore for RocksDBStore {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let _guard = self.write_lock.lock().await;

        if !self.contains(CF_CUSTOMERS, order.customer_id)? {
            return Err(StorefrontError::NotFound(order.customer_id));
        }

        let id = next_order_id(self.last_order_id()?)?;
        let order = order.with_id(id);
        self.write_order(&order)?;
        Ok(order)
    }

    async fn seed(&self, order: Order) -> Result<()> {
        positive_id("id", order.id)?;
        let _guard = self.write_lock.lock().await;

        if !self.contains(CF_CUSTOMERS, order.customer_id)? {
            return Err(StorefrontError::NotFound(order.customer_id));
        }
        self.write_order(&order)
    }

    async fn count_since(&self, customer_id: CustomerId, since: DateTime<Utc>) -> Result<usize> {
        Ok(self
            .orders_of(customer_id)?
            .iter()
            .filter(|o| o.order_date >= since)
            .count())
    }

    async fn has_any(&self, customer_id: CustomerId) -> Result<bool> {
        let prefix = encode_id(customer_id);
        let mode = IteratorMode::From(prefix.as_slice(), Direction::Forward);
        match self.db.iterator_cf(self.cf(CF_CUSTOMER_ORDERS)?, mode).next() {
            Some(item) => {
                let (key, _value) = item?;
                Ok(key.starts_with(&prefix))
            }
            None => Ok(false),
        }
    }

    async fn for_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>> {
        self.orders_of(customer_id)
    }
}
