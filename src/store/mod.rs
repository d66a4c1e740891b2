//! Pool state and its concurrent store.

mod pool;
mod pool_store;

pub use pool::{Pool, PoolSnapshot};
pub use pool_store::{PoolSlot, PoolStore};

pub(crate) use pool::Checkpoint;
pub(crate) use pool_store::PoolGuard;
