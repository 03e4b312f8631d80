use crate::domain::order::Amount;
use crate::domain::ports::PaymentProcessor;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub const PIX: &str = "pix";
pub const CREDIT_CARD: &str = "creditcard";
pub const PAYPAL: &str = "paypal";

/// A payment gateway that answers after a fixed artificial latency.
///
/// The built-in gateways always approve; the latency only models the
/// difference in response time between providers. `declining` turns a
/// gateway into one that rejects every payment.
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    method: String,
    latency: Duration,
    approves: bool,
}

impl SimulatedGateway {
    pub fn new(method: impl Into<String>, latency: Duration) -> Self {
        Self {
            method: method.into(),
            latency,
            approves: true,
        }
    }

    pub fn pix() -> Self {
        Self::new(PIX, Duration::from_millis(100))
    }

    pub fn credit_card() -> Self {
        Self::new(CREDIT_CARD, Duration::from_millis(200))
    }

    pub fn paypal() -> Self {
        Self::new(PAYPAL, Duration::from_millis(150))
    }

    /// The three gateways registered by default.
    pub fn builtins() -> Vec<Self> {
        vec![Self::pix(), Self::credit_card(), Self::paypal()]
    }

    pub fn declining(mut self) -> Self {
        self.approves = false;
        self
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedGateway {
    fn method(&self) -> &str {
        &self.method
    }

    async fn process_payment(&self, amount: Amount) -> bool {
        tokio::time::sleep(self.latency).await;
        debug!(method = %self.method, amount = %amount.value(), approved = self.approves, "gateway answered");
        self.approves
    }
}
