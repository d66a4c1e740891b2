//! Canonical, order-independent pool key.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::AssetId;
use crate::error::{LedgerError, Result};

/// Canonical key of a pool: the two assets sorted ascending.
///
/// `PoolKey::resolve(x, y) == PoolKey::resolve(y, x)` for every valid pair,
/// so a pool is addressed by the same key whatever order callers supply.
///
/// # Examples
///
/// ```
/// use swap_ledger::domain::{AssetId, PoolKey};
///
/// let a = AssetId::from_index(1);
/// let b = AssetId::from_index(2);
///
/// let key = PoolKey::resolve(b, a).expect("distinct, non-null");
/// assert_eq!(key.low(), a);
/// assert_eq!(key.high(), b);
/// assert_eq!(Some(key), PoolKey::resolve(a, b).ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    low: AssetId,
    high: AssetId,
}

impl PoolKey {
    /// Resolves an unordered pair into its canonical key.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::IdenticalAssets`] if `a == b`.
    /// - [`LedgerError::ZeroAsset`] if either side is [`AssetId::NULL`].
    pub fn resolve(a: AssetId, b: AssetId) -> Result<Self> {
        if a == b {
            return Err(LedgerError::IdenticalAssets);
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        if low.is_null() {
            return Err(LedgerError::ZeroAsset);
        }
        Ok(Self { low, high })
    }

    /// The lower-ordered asset.
    #[must_use]
    pub const fn low(&self) -> AssetId {
        self.low
    }

    /// The higher-ordered asset.
    #[must_use]
    pub const fn high(&self) -> AssetId {
        self.high
    }

    /// Returns `true` if `asset` is one of the two assets.
    #[must_use]
    pub fn contains(&self, asset: &AssetId) -> bool {
        self.low == *asset || self.high == *asset
    }

    /// Returns `true` if `asset` is the low side of the key.
    #[must_use]
    pub fn is_low(&self, asset: &AssetId) -> bool {
        self.low == *asset
    }

    /// Returns the counterpart of `asset`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ZeroAsset`] if `asset` is not in the key.
    pub fn other(&self, asset: &AssetId) -> Result<AssetId> {
        if *asset == self.low {
            Ok(self.high)
        } else if *asset == self.high {
            Ok(self.low)
        } else {
            Err(LedgerError::ZeroAsset)
        }
    }

    /// Reorders a `(low, high)` pair into the caller's order, where `first`
    /// is the asset the caller named first.
    #[must_use]
    pub fn orient<T>(&self, first: &AssetId, low_value: T, high_value: T) -> (T, T) {
        if self.is_low(first) {
            (low_value, high_value)
        } else {
            (high_value, low_value)
        }
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.low, self.high)
    }
}
