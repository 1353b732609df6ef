//! Helpers shared by the calculators.
//!
//! Every operation on entered amounts goes through the checked helpers here,
//! so a figure outside the range of [`Decimal`] surfaces as [`Overflow`]
//! instead of a panic.

use rust_decimal::Decimal;
use thiserror::Error;

/// A checked operation left the range of [`Decimal`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("the result is too large to represent")]
pub struct Overflow;

/// Why a [`checked_quotient`] has no value.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum QuotientError {
    #[error("division by zero")]
    DivisionByZero,

    #[error(transparent)]
    Overflow(#[from] Overflow),
}

/// Converts a 0-100 percentage to a ratio.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use acct_core::calculations::common::percent_to_ratio;
///
/// assert_eq!(percent_to_ratio(dec!(60)), dec!(0.60));
/// assert_eq!(percent_to_ratio(dec!(12.5)), dec!(0.125));
/// ```
pub fn percent_to_ratio(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// Divides `numerator` by `divisor`.
///
/// # Errors
///
/// [`QuotientError::DivisionByZero`] when the divisor is zero, and
/// [`QuotientError::Overflow`] when the quotient does not fit.
pub fn checked_quotient(
    numerator: Decimal,
    divisor: Decimal,
) -> Result<Decimal, QuotientError> {
    if divisor.is_zero() {
        return Err(QuotientError::DivisionByZero);
    }
    Ok(numerator.checked_div(divisor).ok_or(Overflow)?)
}

pub fn multiply(
    a: Decimal,
    b: Decimal,
) -> Result<Decimal, Overflow> {
    a.checked_mul(b).ok_or(Overflow)
}

pub fn add(
    a: Decimal,
    b: Decimal,
) -> Result<Decimal, Overflow> {
    a.checked_add(b).ok_or(Overflow)
}

pub fn subtract(
    a: Decimal,
    b: Decimal,
) -> Result<Decimal, Overflow> {
    a.checked_sub(b).ok_or(Overflow)
}

/// Sums `values`, failing on the first partial sum that overflows.
pub fn total<I>(values: I) -> Result<Decimal, Overflow>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, add)
}

/// Applies a percentage change to a base value (`base * (1 + percent/100)`).
pub fn apply_percent(
    base: Decimal,
    percent: Decimal,
) -> Result<Decimal, Overflow> {
    add(base, multiply(base, percent_to_ratio(percent))?)
}
