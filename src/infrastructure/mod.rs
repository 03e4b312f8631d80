//! Adapters implementing the domain ports: clocks, stores and simulated
//! payment gateways.

pub mod clock;
pub mod gateway;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
