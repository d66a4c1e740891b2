//! Ledger-wide configuration.

use std::env;

use serde::Deserialize;

use crate::domain::Amount;
use crate::error::{LedgerError, Result};

/// Default reserve width in bits.
pub const DEFAULT_RESERVE_BITS: u32 = 112;

/// Default fixed-point scale for spot prices (`10^18`).
pub const DEFAULT_PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Environment variable overriding [`LedgerConfig::reserve_bits`].
pub const ENV_RESERVE_BITS: &str = "SWAP_LEDGER_RESERVE_BITS";

/// Environment variable overriding [`LedgerConfig::price_scale`].
pub const ENV_PRICE_SCALE: &str = "SWAP_LEDGER_PRICE_SCALE";

/// Immutable parameters shared by every pool in a ledger.
///
/// # Validation
///
/// - `reserve_bits` must lie in `1..=128`.
/// - `price_scale` must be non-zero.
///
/// Deserialisation fills missing fields with the defaults and runs the same
/// validation as [`LedgerConfig::new`].
///
/// # Examples
///
/// ```
/// use swap_ledger::config::LedgerConfig;
///
/// let config = LedgerConfig::default();
/// assert_eq!(config.reserve_bits(), 112);
/// assert_eq!(config.max_reserve().get(), (1u128 << 112) - 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawLedgerConfig")]
pub struct LedgerConfig {
    reserve_bits: u32,
    price_scale: u128,
}

#[derive(Deserialize)]
#[serde(default)]
struct RawLedgerConfig {
    reserve_bits: u32,
    price_scale: u128,
}

impl Default for RawLedgerConfig {
    fn default() -> Self {
        Self {
            reserve_bits: DEFAULT_RESERVE_BITS,
            price_scale: DEFAULT_PRICE_SCALE,
        }
    }
}

impl TryFrom<RawLedgerConfig> for LedgerConfig {
    type Error = LedgerError;

    fn try_from(raw: RawLedgerConfig) -> Result<Self> {
        Self::new(raw.reserve_bits, raw.price_scale)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            reserve_bits: DEFAULT_RESERVE_BITS,
            price_scale: DEFAULT_PRICE_SCALE,
        }
    }
}

impl LedgerConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidConfiguration`] if `reserve_bits` is
    /// outside `1..=128` or `price_scale` is zero.
    pub fn new(reserve_bits: u32, price_scale: u128) -> Result<Self> {
        let config = Self {
            reserve_bits,
            price_scale,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads the configuration from the process environment, falling back
    /// to the defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidConfiguration`] if a variable is set
    /// but unparseable, or the resulting values fail validation.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// See [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reserve_bits = match lookup(ENV_RESERVE_BITS) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| LedgerError::InvalidConfiguration("reserve_bits is not a u32"))?,
            None => DEFAULT_RESERVE_BITS,
        };
        let price_scale = match lookup(ENV_PRICE_SCALE) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| LedgerError::InvalidConfiguration("price_scale is not a u128"))?,
            None => DEFAULT_PRICE_SCALE,
        };
        Self::new(reserve_bits, price_scale)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidConfiguration`] on the first violated
    /// invariant.
    pub fn validate(&self) -> Result<()> {
        if self.reserve_bits == 0 || self.reserve_bits > u128::BITS {
            return Err(LedgerError::InvalidConfiguration(
                "reserve_bits must be in 1..=128",
            ));
        }
        if self.price_scale == 0 {
            return Err(LedgerError::InvalidConfiguration(
                "price_scale must be non-zero",
            ));
        }
        Ok(())
    }

    /// Width of each pool reserve in bits.
    #[must_use]
    pub const fn reserve_bits(&self) -> u32 {
        self.reserve_bits
    }

    /// Fixed-point scale applied to spot prices.
    #[must_use]
    pub const fn price_scale(&self) -> u128 {
        self.price_scale
    }

    /// Largest representable reserve, `2^reserve_bits - 1`.
    #[must_use]
    pub const fn max_reserve(&self) -> Amount {
        if self.reserve_bits >= u128::BITS {
            Amount::MAX
        } else {
            Amount::new((1u128 << self.reserve_bits) - 1)
        }
    }
}
