//! Value types used throughout the ledger.
//!
//! Identifiers ([`AssetId`], [`Account`], [`PoolKey`]), quantities
//! ([`Amount`], [`Shares`], [`Price`]), time ([`Timestamp`]), the request
//! structs for the mutating operations and the [`LedgerEvent`] records they
//! emit.  Quantities are newtypes with checked arithmetic.

mod account;
mod amount;
mod asset_id;
mod ledger_event;
mod pool_key;
mod price;
mod requests;
mod rounding;
mod shares;
mod timestamp;

pub use account::Account;
pub use amount::Amount;
pub use asset_id::AssetId;
pub use ledger_event::LedgerEvent;
pub use pool_key::PoolKey;
pub use price::Price;
pub use requests::{AddLiquidityRequest, RemoveLiquidityRequest, SwapRequest};
pub use rounding::Rounding;
pub use shares::Shares;
pub use timestamp::Timestamp;
