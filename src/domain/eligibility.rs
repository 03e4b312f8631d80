use chrono::{DateTime, Datelike, FixedOffset, Months, Offset, Timelike, Utc, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;

/// Tunable parameters of the purchase rules.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibilityPolicy {
    /// Highest value a customer without any order may spend on a first purchase.
    pub first_purchase_cap: Decimal,
    /// Hours of day (inclusive on both ends) during which purchases are accepted.
    pub business_hours: RangeInclusive<u32>,
    /// Zone in which the hour and weekday of "now" are read.
    pub reference_offset: FixedOffset,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            first_purchase_cap: dec!(100),
            business_hours: 8..=18,
            reference_offset: Utc.fix(),
        }
    }
}

impl EligibilityPolicy {
    pub fn with_reference_offset(mut self, offset: FixedOffset) -> Self {
        self.reference_offset = offset;
        self
    }

    /// True when `now`, read in the reference zone, falls on a weekday inside
    /// the business hours.
    pub fn is_business_hours(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.reference_offset);
        let working_day = !matches!(local.weekday(), Weekday::Sat | Weekday::Sun);
        working_day && self.business_hours.contains(&local.hour())
    }
}

/// Start of the rolling window used by the purchase-frequency rule.
///
/// Calendar month arithmetic: the day is clamped to the end of the previous
/// month (March 31st becomes February 28th or 29th) and January rolls back
/// into December of the previous year.
pub fn one_month_before(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(1))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    PurchasedWithinLastMonth,
    FirstPurchaseOverCap,
    OutsideBusinessHours,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DenialReason::PurchasedWithinLastMonth => "customer already purchased within the last month",
            DenialReason::FirstPurchaseOverCap => "first purchase exceeds the first-purchase cap",
            DenialReason::OutsideBusinessHours => "purchases are only accepted during business hours",
        };
        f.write_str(text)
    }
}

/// Outcome of evaluating the purchase rules. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Allowed,
    Denied(DenialReason),
}

impl Eligibility {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Eligibility::Allowed)
    }

    pub fn reason(&self) -> Option<DenialReason> {
        match self {
            Eligibility::Allowed => None,
            Eligibility::Denied(reason) => Some(*reason),
        }
    }
}
