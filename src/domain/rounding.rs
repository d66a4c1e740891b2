//! Explicit rounding direction for division.

/// Rounding direction for division on domain types.
///
/// Every division in the ledger names its rounding.  Amounts paid out by a
/// pool and shares minted by it always round [`Rounding::Down`] so that
/// truncation favours the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}
