use crate::domain::ports::PaymentProcessorRef;
use crate::error::{Result, StorefrontError};
use crate::infrastructure::gateway::SimulatedGateway;
use std::sync::Arc;

/// Immutable lookup table from payment method token to processor.
///
/// Built once at startup and shared by reference. Tokens are matched
/// case-insensitively and must be unique.
pub struct PaymentRegistry {
    processors: Vec<PaymentProcessorRef>,
}

impl PaymentRegistry {
    pub fn new(processors: Vec<PaymentProcessorRef>) -> Result<Self> {
        for (i, processor) in processors.iter().enumerate() {
            let duplicated = processors[..i]
                .iter()
                .any(|earlier| earlier.method().eq_ignore_ascii_case(processor.method()));
            if duplicated {
                return Err(StorefrontError::DuplicatePaymentMethod(
                    processor.method().to_string(),
                ));
            }
        }
        Ok(Self { processors })
    }

    /// Registry with the built-in `pix`, `creditcard` and `paypal` gateways.
    pub fn with_defaults() -> Self {
        Self {
            processors: SimulatedGateway::builtins()
                .into_iter()
                .map(|gateway| Arc::new(gateway) as PaymentProcessorRef)
                .collect(),
        }
    }

    pub fn resolve(&self, method: &str) -> Result<PaymentProcessorRef> {
        self.processors
            .iter()
            .find(|p| p.method().eq_ignore_ascii_case(method))
            .cloned()
            .ok_or_else(|| StorefrontError::UnsupportedPaymentMethod(method.to_string()))
    }

    /// Registered tokens, in registration order.
    pub fn methods(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.method()).collect()
    }
}
