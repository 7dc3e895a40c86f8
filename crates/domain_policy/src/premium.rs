//! Risk repricing
//!
//! The premium a customer owes is a pure function of the base premium and
//! the number of claims ever paid to them. A valid curve is non-decreasing
//! in the claim count and strictly raises the premium on the first claim.

use serde::{Deserialize, Serialize};

use core_kernel::{Amount, CoreError, MoneyError, Rate};

/// How the premium grows with each paid claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RepricingCurve {
    /// A fixed surcharge per paid claim
    Linear {
        increment: Amount,
    },
    /// A surcharge of `loading` times the base premium per paid claim
    ///
    /// The per-claim surcharge is rounded up to a whole unit once, so the
    /// curve stays exactly linear in the claim count.
    Proportional {
        loading: Rate,
    },
    /// A total surcharge looked up by claim count
    ///
    /// `surcharges[n - 1]` applies after `n` claims; counts past the end of
    /// the table keep the last surcharge.
    Stepped {
        surcharges: Vec<Amount>,
    },
}

impl RepricingCurve {
    /// Calculates the premium owed after `num_claims` paid claims
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Overflow` if the premium exceeds the amount range
    pub fn premium_for(&self, base: Amount, num_claims: u32) -> Result<Amount, MoneyError> {
        let surcharge = match self {
            RepricingCurve::Linear { increment } => increment.checked_mul(num_claims as u128)?,
            RepricingCurve::Proportional { loading } => loading
                .apply_ceil(base)?
                .checked_mul(num_claims as u128)?,
            RepricingCurve::Stepped { surcharges } => {
                if num_claims == 0 || surcharges.is_empty() {
                    Amount::ZERO
                } else {
                    let index = (num_claims as usize).min(surcharges.len()) - 1;
                    surcharges[index]
                }
            }
        };
        base.checked_add(surcharge)
    }

    /// Validates that a paid claim raises the premium and later claims never lower it
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Configuration` for a zero increment, a zero
    /// loading, an empty or zero-first stepped table, or decreasing steps
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            RepricingCurve::Linear { increment } if increment.is_zero() => Err(
                CoreError::configuration("linear repricing increment must be positive"),
            ),
            RepricingCurve::Proportional { loading } if loading.as_decimal().is_zero() => Err(
                CoreError::configuration("proportional repricing loading must be positive"),
            ),
            RepricingCurve::Stepped { surcharges } => match surcharges.first() {
                None => Err(CoreError::configuration(
                    "stepped repricing needs at least one surcharge",
                )),
                Some(first) if first.is_zero() => Err(CoreError::configuration(
                    "first stepped repricing surcharge must be positive",
                )),
                Some(_) if surcharges.windows(2).any(|pair| pair[1] < pair[0]) => Err(
                    CoreError::configuration("stepped repricing surcharges must be non-decreasing"),
                ),
                Some(_) => Ok(()),
            },
            _ => Ok(()),
        }
    }
}

impl Default for RepricingCurve {
    fn default() -> Self {
        RepricingCurve::Proportional {
            loading: Rate::from_percentage(rust_decimal_macros::dec!(10))
                .unwrap_or_else(|_| Rate::zero()),
        }
    }
}
