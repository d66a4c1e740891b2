//! Checked arithmetic trait for domain wrapper types.
//!
//! [`CheckedArithmetic`] turns the `Option`-returning checked operations on
//! [`Amount`] and [`Shares`] into [`Result`]s carrying a specific
//! [`LedgerError`], so ledger code can use `?` instead of matching on
//! `None` at every call site.
//!
//! # Examples
//!
//! ```
//! use swap_ledger::domain::Amount;
//! use swap_ledger::math::CheckedArithmetic;
//!
//! let a = Amount::new(100);
//! assert!(a.safe_add(&Amount::new(200)).is_ok());
//! assert!(Amount::MAX.safe_add(&a).is_err());
//! ```

use crate::domain::{Amount, Rounding, Shares};
use crate::error::{LedgerError, Result};

/// Fallible arithmetic for domain wrapper types.
///
/// - **No panics**: every error condition produces `Err`.
/// - **No saturation**: saturation hides bugs; errors propagate instead.
pub trait CheckedArithmetic: Sized {
    /// Checked addition.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] on overflow.
    fn safe_add(&self, other: &Self) -> Result<Self>;

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Underflow`] if the result would be negative.
    fn safe_sub(&self, other: &Self) -> Result<Self>;

    /// Checked division with explicit [`Rounding`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DivisionByZero`] if `other` is zero.
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self>;
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Amount {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self> {
        self.checked_add(other)
            .ok_or(LedgerError::Overflow("amount addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self> {
        self.checked_sub(other)
            .ok_or(LedgerError::Underflow("amount subtraction underflow"))
    }

    #[inline]
    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self> {
        self.checked_div(other, rounding)
            .ok_or(LedgerError::DivisionByZero)
    }
}

// ---------------------------------------------------------------------------
// Shares
// ---------------------------------------------------------------------------

impl CheckedArithmetic for Shares {
    #[inline]
    fn safe_add(&self, other: &Self) -> Result<Self> {
        self.checked_add(other)
            .ok_or(LedgerError::Overflow("share addition overflow"))
    }

    #[inline]
    fn safe_sub(&self, other: &Self) -> Result<Self> {
        self.checked_sub(other)
            .ok_or(LedgerError::Underflow("share subtraction underflow"))
    }

    fn safe_div(&self, other: &Self, rounding: Rounding) -> Result<Self> {
        self.as_amount()
            .checked_div(&other.as_amount(), rounding)
            .map(Shares::from)
            .ok_or(LedgerError::DivisionByZero)
    }
}
