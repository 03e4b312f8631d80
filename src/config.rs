//! Command-line and environment configuration.

use crate::application::payment_registry::PaymentRegistry;
use crate::domain::eligibility::EligibilityPolicy;
use crate::domain::ports::{ClockRef, PaymentProcessorRef};
use crate::error::Result;
use crate::infrastructure::clock::{FixedClock, SystemClock};
use crate::infrastructure::gateway::SimulatedGateway;
use crate::interfaces::csv::SeedFiles;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "storefront", author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Customers seed CSV (`id,name`)
    #[arg(long, global = true, env = "STOREFRONT_CUSTOMERS")]
    pub customers: Option<PathBuf>,

    /// Products seed CSV (`id,name`)
    #[arg(long, global = true, env = "STOREFRONT_PRODUCTS")]
    pub products: Option<PathBuf>,

    /// Orders seed CSV (`id,customer_id,value,order_date`)
    #[arg(long, global = true, env = "STOREFRONT_ORDERS")]
    pub orders: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true, env = "STOREFRONT_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Freeze the clock at this RFC 3339 instant instead of reading the system clock
    #[arg(long, global = true, env = "STOREFRONT_NOW", value_parser = parse_instant)]
    pub now: Option<DateTime<Utc>>,

    /// Offset in which business hours are evaluated
    #[arg(
        long,
        global = true,
        env = "STOREFRONT_REFERENCE_OFFSET",
        default_value = "+00:00",
        allow_hyphen_values = true,
        value_parser = parse_offset
    )]
    pub reference_offset: FixedOffset,

    /// Offset in which order dates are displayed
    #[arg(
        long,
        global = true,
        env = "STOREFRONT_DISPLAY_OFFSET",
        default_value = "-03:00",
        allow_hyphen_values = true,
        value_parser = parse_offset
    )]
    pub display_offset: FixedOffset,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check whether a customer may purchase right now
    CanPurchase {
        #[arg(long, allow_negative_numbers = true)]
        customer: i64,
        #[arg(long, allow_negative_numbers = true)]
        value: Decimal,
    },
    /// Pay for an order and record it
    Pay {
        /// Payment method token (pix, creditcard, paypal)
        #[arg(long)]
        method: String,
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
        #[arg(long, allow_negative_numbers = true)]
        customer: i64,
        /// Make every gateway decline the payment
        #[arg(long)]
        decline: bool,
    },
    /// List customers with their orders
    Customers {
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
    },
    /// List products
    Products {
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,
    },
    /// List the registered payment methods
    Methods,
}

impl Settings {
    pub fn policy(&self) -> EligibilityPolicy {
        EligibilityPolicy::default().with_reference_offset(self.reference_offset)
    }

    pub fn clock(&self) -> ClockRef {
        match self.now {
            Some(instant) => Arc::new(FixedClock::new(instant)),
            None => Arc::new(SystemClock),
        }
    }

    pub fn seed_files(&self) -> SeedFiles {
        SeedFiles {
            customers: self.customers.clone(),
            products: self.products.clone(),
            orders: self.orders.clone(),
        }
    }
}

impl Command {
    /// Payment registry for this command; `pay --decline` swaps every
    /// built-in gateway for a declining one.
    pub fn registry(&self) -> Result<PaymentRegistry> {
        match self {
            Command::Pay { decline: true, .. } => PaymentRegistry::new(
                SimulatedGateway::builtins()
                    .into_iter()
                    .map(|gateway| Arc::new(gateway.declining()) as PaymentProcessorRef)
                    .collect(),
            ),
            _ => Ok(PaymentRegistry::with_defaults()),
        }
    }
}

fn parse_instant(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 instant such as 2023-06-15T10:00:00Z: {e}"))
}

/// Parses `Z`, `+HH:MM`, `-HH:MM` or `±HH`.
fn parse_offset(value: &str) -> std::result::Result<FixedOffset, String> {
    let invalid = || format!("expected an offset such as +00:00 or -03:00, got `{value}`");
    if value.eq_ignore_ascii_case("z") {
        return Ok(Utc.fix());
    }

    let (sign, rest) = match value.split_at_checked(1) {
        Some(("+", rest)) => (1, rest),
        Some(("-", rest)) => (-1, rest),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h, m),
        None => (rest, "0"),
    };
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if !(0..24).contains(&hours) || !(0..60).contains(&minutes) {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Clock;
    use chrono::TimeZone;

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("+00:00").unwrap(), Utc.fix());
        assert_eq!(parse_offset("Z").unwrap(), Utc.fix());
        assert_eq!(parse_offset("-03:00").unwrap().local_minus_utc(), -3 * 3600);
        assert_eq!(parse_offset("+05:30").unwrap().local_minus_utc(), 5 * 3600 + 30 * 60);
        assert_eq!(parse_offset("+02").unwrap().local_minus_utc(), 2 * 3600);
        assert!(parse_offset("03:00").is_err());
        assert!(parse_offset("+25:00").is_err());
        assert!(parse_offset("+01:75").is_err());
    }

    #[test]
    fn test_parse_instant_normalizes_to_utc() {
        let instant = parse_instant("2023-06-15T07:00:00-03:00").unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2023, 6, 15, 10, 0, 0).unwrap());
        assert!(parse_instant("yesterday").is_err());
    }

    #[test]
    fn test_cli_parses_pay_command() {
        let cli = Cli::try_parse_from([
            "storefront",
            "--now",
            "2023-06-15T10:00:00Z",
            "pay",
            "--method",
            "PIX",
            "--amount",
            "75",
            "--customer",
            "1",
        ])
        .unwrap();

        assert!(matches!(
            &cli.command,
            Command::Pay { method, customer: 1, decline: false, .. } if method == "PIX"
        ));
        assert_eq!(cli.settings.display_offset.local_minus_utc(), -3 * 3600);
        assert_eq!(cli.settings.policy().reference_offset, Utc.fix());
        assert_eq!(
            cli.settings.clock().now(),
            Utc.with_ymd_and_hms(2023, 6, 15, 10, 0, 0).unwrap()
        );
        assert_eq!(cli.command.registry().unwrap().methods(), vec!["pix", "creditcard", "paypal"]);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "storefront",
            "can-purchase",
            "--customer",
            "1",
            "--value",
            "-5",
            "--reference-offset",
            "-03:00",
        ])
        .unwrap();
        assert_eq!(cli.settings.reference_offset.local_minus_utc(), -3 * 3600);
        assert!(matches!(cli.command, Command::CanPurchase { customer: 1, .. }));
    }
}
