//! Monetary amounts in integral smallest units
//!
//! Every value the ledger moves (premiums, deposits, claim payouts, the pool
//! balance) is an unsigned count of the smallest indivisible unit, so there is
//! no fractional precision to lose. Decimal arithmetic only appears in `Rate`,
//! whose results are rounded back to whole units before they touch a balance.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of smallest units in one whole coin (18 decimal places)
pub const UNITS_PER_COIN: u128 = 1_000_000_000_000_000_000;

/// Errors that can occur during amount arithmetic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Overflow during calculation")]
    Overflow,

    #[error("Insufficient amount: {available} available, {requested} requested")]
    Underflow {
        available: u128,
        requested: u128,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// A non-negative monetary amount in smallest units
///
/// The type has no negative representation, which makes a negative pool
/// balance unrepresentable rather than merely checked.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// The zero amount
    pub const ZERO: Amount = Amount(0);

    /// Creates an amount from a count of smallest units
    pub const fn new(units: u128) -> Self {
        Self(units)
    }

    /// Creates an amount from whole coins
    pub fn from_coins(coins: u64) -> Self {
        Self(coins as u128 * UNITS_PER_COIN)
    }

    /// Returns the count of smallest units
    pub const fn units(&self) -> u128 {
        self.0
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(&self, other: Amount) -> Result<Amount, MoneyError> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or(MoneyError::Overflow)
    }

    /// Checked subtraction; fails instead of going below zero
    pub fn checked_sub(&self, other: Amount) -> Result<Amount, MoneyError> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or(MoneyError::Underflow {
                available: self.0,
                requested: other.0,
            })
    }

    /// Subtraction clamped at zero
    pub fn saturating_sub(&self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    /// Multiplies by a whole factor
    pub fn checked_mul(&self, factor: u128) -> Result<Amount, MoneyError> {
        self.0
            .checked_mul(factor)
            .map(Amount)
            .ok_or(MoneyError::Overflow)
    }

    fn to_decimal(self) -> Result<Decimal, MoneyError> {
        Decimal::from_u128(self.0).ok_or(MoneyError::Overflow)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(units: u128) -> Self {
        Amount(units)
    }
}

impl From<Amount> for u128 {
    fn from(amount: Amount) -> u128 {
        amount.0
    }
}

/// A non-negative decimal rate (e.g. a 10% loading per claim)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.10 for 10%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.10 for 10%)
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for negative rates
    pub fn new(value: Decimal) -> Result<Self, MoneyError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MoneyError::InvalidAmount(format!("negative rate {}", value)));
        }
        Ok(Self { value })
    }

    /// Creates a rate from a percentage (e.g., 10 for 10%)
    pub fn from_percentage(percentage: Decimal) -> Result<Self, MoneyError> {
        Self::new(percentage / dec!(100))
    }

    /// The zero rate
    pub fn zero() -> Self {
        Self { value: Decimal::ZERO }
    }

    /// Returns the rate as a decimal
    pub fn as_decimal(&self) -> Decimal {
        self.value
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// Applies this rate to an amount, rounding up to the next whole unit
    ///
    /// Rounding up keeps a surcharge from silently vanishing on small bases.
    pub fn apply_ceil(&self, amount: Amount) -> Result<Amount, MoneyError> {
        let product = amount
            .to_decimal()?
            .checked_mul(self.value)
            .ok_or(MoneyError::Overflow)?;
        product
            .ceil()
            .to_u128()
            .map(Amount)
            .ok_or(MoneyError::Overflow)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().normalize())
    }
}
