//! Fixed-point spot price.

use core::fmt;

use alloy_primitives::U256;

/// Spot price of one asset in units of another, as a fixed-point integer.
///
/// The raw value is `reserve_quote * scale / reserve_base`; with the default
/// scale of 10^18 a balanced pool prices at exactly `10^18`.  The value is
/// held in 256 bits because `reserve * scale` exceeds `u128` for large
/// reserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(U256);

impl Price {
    /// Wraps a raw scaled value.
    #[must_use]
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Returns the raw scaled value.
    #[must_use]
    pub const fn raw(&self) -> U256 {
        self.0
    }

    /// Returns the raw value if it fits in a `u128`.
    #[must_use]
    pub fn to_u128(&self) -> Option<u128> {
        u128::try_from(self.0).ok()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
