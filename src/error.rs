use crate::domain::customer::CustomerId;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum StorefrontError {
    #[error("Invalid argument `{name}`: {reason}")]
    #[diagnostic(code(storefront::invalid_argument))]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Customer Id {0} does not exist")]
    #[diagnostic(code(storefront::not_found))]
    NotFound(CustomerId),

    #[error("Payment method '{0}' is not supported")]
    #[diagnostic(
        code(storefront::unsupported_payment_method),
        help("run `storefront methods` to list the registered payment methods")
    )]
    UnsupportedPaymentMethod(String),

    #[error("Payment processing failed for method '{method}'")]
    #[diagnostic(
        code(storefront::payment_failed),
        help("the payment was not recorded; retry with the same or a different method")
    )]
    PaymentFailed { method: String },

    #[error("Payment method '{0}' is registered more than once")]
    #[diagnostic(code(storefront::duplicate_payment_method))]
    DuplicatePaymentMethod(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    Rocks(#[from] rocksdb::Error),
}

impl StorefrontError {
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
