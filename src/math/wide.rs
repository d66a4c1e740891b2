//! 256-bit intermediates for ratio math.
//!
//! Reserves are bounded to a fixed width (112 bits by default) and inputs to
//! `u128`, but products such as `amount_in * reserve_out` or
//! `reserve * 10^18` do not fit in `u128`.  Every multiply-then-divide in the
//! ledger goes through [`mul_div`] / [`mul_div_wide`], which widen to
//! [`U256`], divide, and only then narrow back with an explicit check.

use alloy_primitives::U256;

use crate::domain::{Amount, Rounding};
use crate::error::{LedgerError, Result};

/// Widens a `u128` into a [`U256`].
#[inline]
#[must_use]
pub fn widen(value: u128) -> U256 {
    U256::from(value)
}

/// Narrows a [`U256`] back into an [`Amount`].
///
/// # Errors
///
/// Returns [`LedgerError::Overflow`] with `context` if `value` does not fit.
#[inline]
pub fn narrow(value: U256, context: &'static str) -> Result<Amount> {
    u128::try_from(value)
        .map(Amount::new)
        .map_err(|_| LedgerError::Overflow(context))
}

/// Computes `a * b / denominator` in 256 bits.
///
/// # Errors
///
/// Returns [`LedgerError::DivisionByZero`] if `denominator` is zero.
pub fn mul_div_wide(a: u128, b: u128, denominator: U256, rounding: Rounding) -> Result<U256> {
    if denominator.is_zero() {
        return Err(LedgerError::DivisionByZero);
    }
    // (2^128 - 1)^2 < 2^256: the product cannot overflow.
    let product = widen(a) * widen(b);
    let quotient = product / denominator;
    if rounding.is_up() && !(product % denominator).is_zero() {
        return Ok(quotient + U256::from(1u8));
    }
    Ok(quotient)
}

/// Computes `a * b / denominator` and narrows the result to an [`Amount`].
///
/// # Errors
///
/// - [`LedgerError::DivisionByZero`] if `denominator` is zero.
/// - [`LedgerError::Overflow`] if the quotient exceeds `u128`.
pub fn mul_div(a: Amount, b: Amount, denominator: Amount, rounding: Rounding) -> Result<Amount> {
    let q = mul_div_wide(a.get(), b.get(), widen(denominator.get()), rounding)?;
    narrow(q, "mul_div quotient exceeds u128")
}

/// Integer square root (floor) via Newton's method.
#[must_use]
pub fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return U256::ZERO;
    }
    let two = U256::from(2u8);
    let mut x = n;
    let mut y = n / two + U256::from(1u8);
    while y < x {
        x = y;
        y = (x + n / x) / two;
    }
    x
}

/// `floor(sqrt(a * b))`, the geometric mean used to bootstrap pool shares.
///
/// The result is at most `max(a, b)` and therefore always fits in `u128`.
///
/// # Errors
///
/// Returns [`LedgerError::Overflow`] only if that bound is somehow violated.
pub fn sqrt_product(a: Amount, b: Amount) -> Result<Amount> {
    let product = widen(a.get()) * widen(b.get());
    narrow(isqrt(product), "sqrt product exceeds u128")
}
