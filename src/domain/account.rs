//! Account identifier for callers, recipients and the custody account.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An account that holds assets and liquidity shares.
///
/// Same 160-bit layout as [`AssetId`](super::AssetId) but a distinct type,
/// so an asset can never be passed where a recipient is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Account([u8; 20]);

impl Account {
    /// The null account.  Never a valid recipient.
    pub const NULL: Self = Self([0u8; 20]);

    /// Creates an `Account` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Builds an account whose low eight bytes hold `index` (big-endian).
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

    /// Returns `true` for the null account.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_account() {
        assert!(Account::NULL.is_null());
        assert!(!Account::from_index(3).is_null());
    }

    #[test]
    fn from_index_is_big_endian() {
        let acct = Account::from_index(0x0102);
        let bytes = acct.as_bytes();
        assert_eq!(bytes[18], 0x01);
        assert_eq!(bytes[19], 0x02);
    }
}
