//! Opaque asset identifier.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a fungible asset handled by the ledger.
///
/// Wraps a 160-bit (20-byte) value.  Ordering is lexicographic over the
/// bytes, which is the ordering used to canonicalise pool keys.  The
/// all-zero identifier is the null sentinel and is rejected wherever an
/// asset is required.
///
/// # Examples
///
/// ```
/// use swap_ledger::domain::AssetId;
///
/// let usdc = AssetId::from_index(1);
/// let weth = AssetId::from_index(2);
/// assert!(usdc < weth);
/// assert!(AssetId::NULL.is_null());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetId([u8; 20]);

impl AssetId {
    /// The null sentinel.
    pub const NULL: Self = Self([0u8; 20]);

    /// Creates an `AssetId` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Builds an identifier whose low eight bytes hold `index` (big-endian).
    ///
    /// Handy for tests and simulations; `from_index(0)` is [`AssetId::NULL`].
    #[must_use]
    pub const fn from_index(index: u64) -> Self {
        let be = index.to_be_bytes();
        let mut bytes = [0u8; 20];
        let mut i = 0;
        while i < 8 {
            bytes[12 + i] = be[i];
            i += 1;
        }
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 20] {
        self.0
    }

    /// Returns `true` for the null sentinel.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}
