//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use swap_ledger::prelude::*;
//! ```

pub use crate::config::LedgerConfig;
pub use crate::domain::{
    Account, AddLiquidityRequest, Amount, AssetId, LedgerEvent, PoolKey, Price,
    RemoveLiquidityRequest, Shares, SwapRequest, Timestamp,
};
pub use crate::engine::{estimate_swap_out, quote_out, quote_price, PRICE_SCALE};
pub use crate::error::{LedgerError, Result};
pub use crate::exchange::Exchange;
pub use crate::gateway::{AssetTransfer, InMemoryAssets, TransferError};
pub use crate::store::PoolSnapshot;
pub use crate::traits::{Clock, ManualClock, SystemClock};
