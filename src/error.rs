//! Unified error types for the swap ledger.
//!
//! Every fallible operation in the crate returns [`LedgerError`].  Each
//! variant maps to a short, stable failure code (see [`LedgerError::code`])
//! and to one of four [`ErrorCategory`] buckets so callers can tell a
//! caller mistake from an economic rejection, an arithmetic guard, or a
//! custody failure in the asset collaborator.
//!
//! A failed call never leaves partial state behind: pool reserves, share
//! balances and external balances are exactly as they were before the call.
//! The one exception is [`LedgerError::SettlementIncomplete`], where the
//! collaborator refused to reverse a transfer; the pool then keeps exactly
//! the effect of the transfers that stayed in place.

use thiserror::Error;

use crate::domain::{Amount, AssetId};
use crate::gateway::TransferError;

/// Broad classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed request: deadline, identical/null assets, path shape.
    InputValidation,
    /// Expected rejection the caller can fix by adjusting parameters.
    Economic,
    /// Arithmetic guard tripped; never silently truncated.
    Arithmetic,
    /// The asset collaborator failed to move funds.
    ExternalDependency,
}

/// Error type for all ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The caller-supplied deadline is already in the past.
    #[error("deadline expired")]
    Expired,

    /// Both sides of the pair are the same asset.
    #[error("identical assets")]
    IdenticalAssets,

    /// An asset identifier is the null sentinel.
    #[error("zero asset address")]
    ZeroAsset,

    /// The recipient account is the null sentinel.
    #[error("invalid recipient")]
    InvalidRecipient,

    /// `amount_a_desired` is zero.
    #[error("insufficient amount of token A desired")]
    InsufficientADesired,

    /// `amount_b_desired` is zero.
    #[error("insufficient amount of token B desired")]
    InsufficientBDesired,

    /// The computed token A amount is below the caller's minimum.
    #[error("token A amount below minimum")]
    InsufficientAAmount,

    /// The computed token B amount is below the caller's minimum.
    #[error("token B amount below minimum")]
    InsufficientBAmount,

    /// The pool has never received a successful deposit.
    #[error("pool not initialized")]
    PoolUninitialized,

    /// The pool has no outstanding shares to burn.
    #[error("pool has zero total liquidity")]
    PoolEmpty,

    /// The caller holds fewer shares than requested.
    #[error("insufficient liquidity share balance")]
    InsufficientShareBalance,

    /// Zero shares were requested for removal.
    #[error("liquidity amount is zero")]
    ZeroLiquidity,

    /// A zero input amount was supplied to the pricing curve.
    #[error("input amount is zero")]
    ZeroInput,

    /// The input-side reserve is zero; no price can be quoted.
    #[error("illiquid pool")]
    IlliquidPool,

    /// A swap path must contain exactly two assets.
    #[error("invalid path length {0}, expected 2")]
    InvalidPathLength(usize),

    /// The swap output is zero or below the caller's minimum.
    #[error("insufficient output amount: got {amount_out}, minimum {minimum}")]
    InsufficientOutput {
        /// Output the curve would have paid.
        amount_out: Amount,
        /// Caller's minimum.
        minimum: Amount,
    },

    /// A reserve would exceed the configured fixed width.
    #[error("reserve overflow")]
    ReserveOverflow,

    /// The bootstrap or proportional mint rounds down to zero shares.
    #[error("deposit too small to mint liquidity shares")]
    DegenerateMint,

    /// Arithmetic overflow in an intermediate computation.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow in an intermediate computation.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A mutating call re-entered a pool that already has one in flight.
    #[error("pool locked by an in-flight operation")]
    Reentrancy,

    /// The asset collaborator rejected a transfer.
    #[error("transfer of asset {asset} failed: {source}")]
    TransferFailed {
        /// Asset whose transfer failed.
        asset: AssetId,
        /// Underlying gateway failure.
        source: TransferError,
    },

    /// A transfer failed and compensating one or more earlier transfers
    /// of the same operation also failed.
    ///
    /// The pool keeps the effect of the transfers that could not be
    /// reversed, so its reserves still match what custody holds.
    #[error("transfer of asset {asset} failed and {stranded} earlier transfer(s) could not be reversed: {source}")]
    SettlementIncomplete {
        /// Asset whose transfer failed first.
        asset: AssetId,
        /// Underlying gateway failure.
        source: TransferError,
        /// Number of transfers left in place.
        stranded: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
}

impl LedgerError {
    /// Short failure code, stable across releases.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Expired => "EXP",
            Self::IdenticalAssets => "IA",
            Self::ZeroAsset => "IZA",
            Self::InvalidRecipient => "IR",
            Self::InsufficientADesired | Self::InsufficientAAmount => "INA",
            Self::InsufficientBDesired | Self::InsufficientBAmount => "INB",
            Self::PoolUninitialized => "RNI",
            Self::PoolEmpty => "ITL",
            Self::InsufficientShareBalance => "ILB",
            Self::ZeroLiquidity | Self::ZeroInput | Self::IlliquidPool => "IL",
            Self::InvalidPathLength(_) => "IPL",
            Self::InsufficientOutput { .. } => "IOA",
            Self::ReserveOverflow | Self::Overflow(_) => "OVERFLOW",
            Self::Underflow(_) => "UNDERFLOW",
            Self::DivisionByZero => "DIV0",
            Self::DegenerateMint => "ILM",
            Self::Reentrancy => "LOCKED",
            Self::TransferFailed { .. } => "TRANSFER",
            Self::SettlementIncomplete { .. } => "UNWIND",
            Self::InvalidConfiguration(_) => "CONFIG",
        }
    }

    /// Classifies the error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Expired
            | Self::IdenticalAssets
            | Self::ZeroAsset
            | Self::InvalidRecipient
            | Self::InsufficientADesired
            | Self::InsufficientBDesired
            | Self::InvalidPathLength(_)
            | Self::ZeroLiquidity
            | Self::ZeroInput
            | Self::InvalidConfiguration(_) => ErrorCategory::InputValidation,
            Self::InsufficientAAmount
            | Self::InsufficientBAmount
            | Self::PoolUninitialized
            | Self::PoolEmpty
            | Self::InsufficientShareBalance
            | Self::IlliquidPool
            | Self::InsufficientOutput { .. }
            | Self::DegenerateMint
            | Self::Reentrancy => ErrorCategory::Economic,
            Self::ReserveOverflow
            | Self::Overflow(_)
            | Self::Underflow(_)
            | Self::DivisionByZero => ErrorCategory::Arithmetic,
            Self::TransferFailed { .. } | Self::SettlementIncomplete { .. } => {
                ErrorCategory::ExternalDependency
            }
        }
    }

    /// Returns `true` if the asset collaborator caused the failure.
    #[must_use]
    pub const fn is_transfer_failure(&self) -> bool {
        matches!(
            self,
            Self::TransferFailed { .. } | Self::SettlementIncomplete { .. }
        )
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_reference_table() {
        assert_eq!(LedgerError::Expired.code(), "EXP");
        assert_eq!(LedgerError::IdenticalAssets.code(), "IA");
        assert_eq!(LedgerError::ZeroAsset.code(), "IZA");
        assert_eq!(LedgerError::InvalidRecipient.code(), "IR");
        assert_eq!(LedgerError::InsufficientADesired.code(), "INA");
        assert_eq!(LedgerError::InsufficientAAmount.code(), "INA");
        assert_eq!(LedgerError::InsufficientBDesired.code(), "INB");
        assert_eq!(LedgerError::InsufficientBAmount.code(), "INB");
        assert_eq!(LedgerError::PoolUninitialized.code(), "RNI");
        assert_eq!(LedgerError::PoolEmpty.code(), "ITL");
        assert_eq!(LedgerError::InsufficientShareBalance.code(), "ILB");
        assert_eq!(LedgerError::ZeroLiquidity.code(), "IL");
        assert_eq!(LedgerError::ZeroInput.code(), "IL");
        assert_eq!(LedgerError::InvalidPathLength(1).code(), "IPL");
        assert_eq!(LedgerError::ReserveOverflow.code(), "OVERFLOW");
    }

    #[test]
    fn transfer_failure_is_distinct() {
        let err = LedgerError::TransferFailed {
            asset: AssetId::from_index(7),
            source: TransferError::FalsyReturn,
        };
        assert!(err.is_transfer_failure());
        assert_eq!(err.category(), ErrorCategory::ExternalDependency);
        assert!(!LedgerError::PoolEmpty.is_transfer_failure());

        let partial = LedgerError::SettlementIncomplete {
            asset: AssetId::from_index(7),
            source: TransferError::FalsyReturn,
            stranded: 1,
        };
        assert!(partial.is_transfer_failure());
        assert_eq!(partial.code(), "UNWIND");
    }

    #[test]
    fn categories() {
        assert_eq!(
            LedgerError::Expired.category(),
            ErrorCategory::InputValidation
        );
        assert_eq!(
            LedgerError::InsufficientShareBalance.category(),
            ErrorCategory::Economic
        );
        assert_eq!(
            LedgerError::ReserveOverflow.category(),
            ErrorCategory::Arithmetic
        );
    }

    #[test]
    fn display_mentions_amounts() {
        let err = LedgerError::InsufficientOutput {
            amount_out: Amount::new(89),
            minimum: Amount::new(90),
        };
        let msg = err.to_string();
        assert!(msg.contains("89"));
        assert!(msg.contains("90"));
    }
}
