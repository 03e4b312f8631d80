//! CSV seed files for customers, products and historical orders.

pub mod seed_reader;

use crate::domain::customer::Customer;
use crate::domain::order::Order;
use crate::domain::ports::{CustomerStore, OrderStore, ProductStore};
use crate::domain::product::Product;
use crate::error::{Result, StorefrontError};
use seed_reader::{CustomerRecord, OrderRecord, ProductRecord, SeedReader};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Locations of the seed files; any of them may be omitted.
#[derive(Debug, Default, Clone)]
pub struct SeedFiles {
    pub customers: Option<PathBuf>,
    pub products: Option<PathBuf>,
    pub orders: Option<PathBuf>,
}

/// What a seeding run loaded and which rows it skipped.
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub customers: usize,
    pub products: usize,
    pub orders: usize,
    pub rejected: Vec<StorefrontError>,
}

/// Loads the seed files into `store`.
///
/// Customers are loaded before orders so that every order finds its owner.
/// Rows that fail to parse, carry a non-positive id, or orders whose customer
/// is unknown, are skipped
/// and reported in [`SeedSummary::rejected`]. Failing to open a file aborts
/// the run.
pub async fn load_seeds<S>(store: &S, files: &SeedFiles) -> Result<SeedSummary>
where
    S: CustomerStore + OrderStore + ProductStore,
{
    let mut summary = SeedSummary::default();

    if let Some(path) = &files.customers {
        for record in open::<CustomerRecord>(path)?.records() {
            match record.and_then(Customer::try_from) {
                Ok(customer) => {
                    CustomerStore::store(store, customer).await?;
                    summary.customers += 1;
                }
                Err(e) => summary.rejected.push(e),
            }
        }
    }

    if let Some(path) = &files.products {
        for record in open::<ProductRecord>(path)?.records() {
            match record.and_then(Product::try_from) {
                Ok(product) => {
                    ProductStore::store(store, product).await?;
                    summary.products += 1;
                }
                Err(e) => summary.rejected.push(e),
            }
        }
    }

    if let Some(path) = &files.orders {
        for record in open::<OrderRecord>(path)?.records() {
            let seeded = match record.and_then(Order::try_from) {
                Ok(order) => store.seed(order).await,
                Err(e) => Err(e),
            };
            match seeded {
                Ok(()) => summary.orders += 1,
                Err(e @ (StorefrontError::Csv(_)
                | StorefrontError::InvalidArgument { .. }
                | StorefrontError::NotFound(_))) => summary.rejected.push(e),
                Err(e) => return Err(e),
            }
        }
    }

    Ok(summary)
}

fn open<T: serde::de::DeserializeOwned>(path: &Path) -> Result<SeedReader<File, T>> {
    Ok(SeedReader::new(File::open(path)?))
}
