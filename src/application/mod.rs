//! Application layer orchestrating the storefront use cases.
//!
//! [`Storefront`] is the entry point used by front ends. It composes the
//! purchase eligibility rules, the order checkout workflow and the catalog
//! listings over a shared set of stores, a clock and a payment registry.

pub mod catalog;
pub mod checkout;
pub mod eligibility;
pub mod payment_registry;
pub mod storefront;

pub use storefront::Storefront;
