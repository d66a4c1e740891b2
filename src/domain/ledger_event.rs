//! Records emitted by committed ledger operations.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Account, Amount, AssetId, Shares};

/// A committed state transition, emitted after the operation succeeds.
///
/// Amounts are reported in the caller's asset order (`token_a`, `token_b`),
/// not in canonical key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Liquidity deposited and shares minted.
    LiquidityAdded {
        /// Account that supplied the assets.
        provider: Account,
        /// First asset as named by the caller.
        token_a: AssetId,
        /// Second asset as named by the caller.
        token_b: AssetId,
        /// Amount of `token_a` deposited.
        amount_a: Amount,
        /// Amount of `token_b` deposited.
        amount_b: Amount,
        /// Shares minted.
        shares: Shares,
        /// Account credited with the shares.
        to: Account,
    },
    /// Shares burned and liquidity withdrawn.
    LiquidityRemoved {
        /// Account whose shares were burned.
        provider: Account,
        /// First asset as named by the caller.
        token_a: AssetId,
        /// Second asset as named by the caller.
        token_b: AssetId,
        /// Amount of `token_a` withdrawn.
        amount_a: Amount,
        /// Amount of `token_b` withdrawn.
        amount_b: Amount,
        /// Shares burned.
        shares: Shares,
        /// Account receiving the assets.
        to: Account,
    },
    /// A single-hop exact-input swap.
    Swap {
        /// Account that sold `token_in`.
        caller: Account,
        /// Asset sold.
        token_in: AssetId,
        /// Asset bought.
        token_out: AssetId,
        /// Amount sold.
        amount_in: Amount,
        /// Amount bought.
        amount_out: Amount,
        /// Account receiving `token_out`.
        to: Account,
    },
}

impl LedgerEvent {
    /// Short event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LiquidityAdded { .. } => "LiquidityAdded",
            Self::LiquidityRemoved { .. } => "LiquidityRemoved",
            Self::Swap { .. } => "Swap",
        }
    }
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LiquidityAdded {
                amount_a,
                amount_b,
                shares,
                ..
            } => write!(f, "LiquidityAdded({amount_a}, {amount_b}) -> {shares} shares"),
            Self::LiquidityRemoved {
                amount_a,
                amount_b,
                shares,
                ..
            } => write!(f, "LiquidityRemoved({shares} shares) -> ({amount_a}, {amount_b})"),
            Self::Swap {
                amount_in,
                amount_out,
                ..
            } => write!(f, "Swap({amount_in} -> {amount_out})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_display() {
        let ev = LedgerEvent::Swap {
            caller: Account::from_index(1),
            token_in: AssetId::from_index(2),
            token_out: AssetId::from_index(3),
            amount_in: Amount::new(100),
            amount_out: Amount::new(90),
            to: Account::from_index(1),
        };
        assert_eq!(ev.name(), "Swap");
        assert_eq!(ev.to_string(), "Swap(100 -> 90)");
    }
}
