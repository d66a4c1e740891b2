//! Ledger configuration.
//!
//! [`LedgerConfig`] carries the reserve width and the price scale.  It can
//! be built directly, deserialised, or read from the environment.

mod ledger_config;

pub use ledger_config::{
    LedgerConfig, DEFAULT_PRICE_SCALE, DEFAULT_RESERVE_BITS, ENV_PRICE_SCALE, ENV_RESERVE_BITS,
};
