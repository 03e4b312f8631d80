//! Domain model: records, value objects and the ports the application layer
//! depends on.

pub mod customer;
pub mod eligibility;
pub mod order;
pub mod page;
pub mod ports;
pub mod product;
