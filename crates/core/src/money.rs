//! Monetary amounts.
//!
//! Amounts are fixed-point decimals with no currency attached. Arithmetic is
//! exact; rounding happens only when an amount is rendered for display.

use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Decimal places used when rendering an amount.
pub const DISPLAY_SCALE: u32 = 2;

/// Non-negative, currency-agnostic monetary amount.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub fn new(amount: Decimal) -> Result<Self, DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::validation(format!(
                "amount must not be negative (got {amount})"
            )));
        }
        Ok(Self(amount))
    }

    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Amount expressed in hundredths (e.g. cents).
    pub fn from_minor_units(minor: u32) -> Self {
        Self(Decimal::new(i64::from(minor), DISPLAY_SCALE))
    }

    /// Parse a decimal literal such as `"19.99"`.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let amount = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::validation(format!("invalid amount {s:?}: {e}")))?;
        Self::new(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Unrounded product of this amount and a quantity.
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// `self + other`, or `None` if the result leaves the decimal range.
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// `self * quantity`, or `None` if the result leaves the decimal range.
    pub fn checked_times(&self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Amount rounded for presentation (half away from zero).
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Rendered amount with exactly two decimal places, e.g. `"42.50"`.
    pub fn display(&self) -> String {
        format!("{:.2}", self.rounded())
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.display())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}
