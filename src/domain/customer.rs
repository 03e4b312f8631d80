use serde::{Deserialize, Serialize};

pub type CustomerId = i64;

/// A registered customer.
///
/// Orders are dependent records owned by the customer and live in the
/// order store, keyed by `customer_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

impl Customer {
    pub fn new(id: CustomerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
