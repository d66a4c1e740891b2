//! Stateless constant-product pricing.
//!
//! The curve is fee-less: for reserves `(x, y)` and an input `dx`, the
//! output is
//!
//! ```text
//! dy = floor(dx · y / (x + dx))
//! ```
//!
//! which keeps `(x + dx) · (y − dy) >= x · y`.  Spot prices are the reserve
//! ratio `y / x` expressed as a fixed-point integer scaled by
//! [`PRICE_SCALE`].  All intermediates are 256 bits wide.

use tracing::debug;

use crate::config::DEFAULT_PRICE_SCALE;
use crate::domain::{Amount, Price, Rounding};
use crate::error::{LedgerError, Result};
use crate::math::{mul_div_wide, narrow, widen};

/// Fixed-point scale of [`Price`] values under the default configuration
/// (`10^18`).
pub const PRICE_SCALE: u128 = DEFAULT_PRICE_SCALE;

/// Output of an exact-input trade against reserves `(reserve_in, reserve_out)`.
///
/// A zero result is returned as-is; callers decide whether it is acceptable.
///
/// # Errors
///
/// - [`LedgerError::ZeroInput`] if `amount_in` is zero.
/// - [`LedgerError::IlliquidPool`] if `reserve_in` is zero.
///
/// # Examples
///
/// ```
/// use swap_ledger::domain::Amount;
/// use swap_ledger::engine::quote_out;
///
/// let out = quote_out(Amount::new(100), Amount::new(1_000), Amount::new(1_000));
/// assert_eq!(out, Ok(Amount::new(90)));
/// ```
pub fn quote_out(amount_in: Amount, reserve_in: Amount, reserve_out: Amount) -> Result<Amount> {
    if amount_in.is_zero() {
        debug!("quote rejected: zero input");
        return Err(LedgerError::ZeroInput);
    }
    if reserve_in.is_zero() {
        debug!("quote rejected: zero input reserve");
        return Err(LedgerError::IlliquidPool);
    }
    // reserve_in + amount_in may exceed u128; add in 256 bits.
    let denominator = widen(reserve_in.get()) + widen(amount_in.get());
    let out = mul_div_wide(
        amount_in.get(),
        reserve_out.get(),
        denominator,
        Rounding::Down,
    )?;
    // out < reserve_out, so this never fails.
    narrow(out, "quote exceeds output reserve")
}

/// Spot price of `a` in units of `b`: `reserve_b · scale / reserve_a`.
///
/// # Errors
///
/// Returns [`LedgerError::IlliquidPool`] if either reserve is zero.
pub fn quote_price(reserve_a: Amount, reserve_b: Amount, scale: u128) -> Result<Price> {
    if reserve_a.is_zero() || reserve_b.is_zero() {
        debug!("price rejected: empty reserve");
        return Err(LedgerError::IlliquidPool);
    }
    let raw = mul_div_wide(
        reserve_b.get(),
        scale,
        widen(reserve_a.get()),
        Rounding::Down,
    )?;
    Ok(Price::from_raw(raw))
}

/// Best-effort quote for display purposes.
///
/// Same curve as [`quote_out`], but never fails: inputs that `quote_out`
/// would reject estimate to zero.
#[must_use]
pub fn estimate_swap_out(amount_in: Amount, reserve_in: Amount, reserve_out: Amount) -> Amount {
    quote_out(amount_in, reserve_in, reserve_out).unwrap_or(Amount::ZERO)
}
