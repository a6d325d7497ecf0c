//! Monetary arithmetic helpers
//!
//! All monetary figures flow through `rust_decimal::Decimal`, which keeps
//! 28-29 significant digits during intermediate computation. Rounding to
//! 2 decimal places (half-up) happens only when a figure is finalized for
//! a report or for storage, never between intermediate steps.
//!
//! Amounts are persisted as integer minor units (cents) so SQL SUM/COUNT
//! aggregation stays exact; `from_minor`/`to_minor` convert at the
//! storage boundary.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{Error, Result};

/// Stored/displayed amounts carry exactly this many decimal places.
pub const MONEY_DP: u32 = 2;

/// Convert integer minor units (cents) to a decimal amount.
pub fn from_minor(minor: i64) -> Decimal {
    Decimal::new(minor, MONEY_DP)
}

/// Convert a decimal amount to integer minor units, rounding half-up.
pub fn to_minor(amount: Decimal) -> i64 {
    use rust_decimal::prelude::ToPrimitive;
    // After round_money the value is exact at 2dp, so scaling by 100
    // yields a whole number.
    (round_money(amount) * Decimal::ONE_HUNDRED)
        .to_i64()
        .unwrap_or(0)
}

/// Round to 2 decimal places using round-half-up (midpoint away from zero).
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Parse an amount from string input, normalizing into `Decimal`.
///
/// Rejects negative and non-numeric input; amounts are unsigned and the
/// transaction kind carries the sign.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let amount: Decimal = s
        .trim()
        .parse()
        .map_err(|_| Error::InvalidAmount(format!("Not a number: {}", s)))?;
    if amount < Decimal::ZERO {
        return Err(Error::InvalidAmount(format!(
            "Amount must not be negative: {}",
            s
        )));
    }
    Ok(amount)
}

/// Guarded division: `None` when the divisor is zero or negative.
///
/// Divisors derived from user input (planned months, category counts)
/// go through this so a bad divisor degrades to a neutral result at the
/// caller instead of propagating a fault.
pub fn safe_div(numerator: Decimal, divisor: Decimal) -> Option<Decimal> {
    if divisor <= Decimal::ZERO {
        return None;
    }
    numerator.checked_div(divisor)
}

/// `numerator / denominator * 100`, or `None` for a non-positive denominator.
pub fn ratio_pct(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    safe_div(numerator, denominator).map(|r| r * Decimal::ONE_HUNDRED)
}
