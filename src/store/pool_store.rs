//! Concurrent map of pools.
//!
//! Each pool lives in its own [`PoolSlot`] behind a re-entrant lock, so
//! operations on unrelated pools never contend while operations on the same
//! pool serialise.  A slot also carries a *busy* flag: a mutating call that
//! arrives while another mutation of the same pool is in flight on the same
//! thread (an asset callback re-entering the ledger) is rejected with
//! [`LedgerError::Reentrancy`] instead of deadlocking.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use tracing::{debug, warn};

use super::{Pool, PoolSnapshot};
use crate::domain::PoolKey;
use crate::error::{LedgerError, Result};

#[derive(Debug)]
struct PoolCell {
    busy: Cell<bool>,
    pool: RefCell<Pool>,
}

/// Lock-protected home of one [`Pool`].
#[derive(Debug)]
pub struct PoolSlot {
    cell: ReentrantMutex<PoolCell>,
}

impl PoolSlot {
    fn new(key: PoolKey) -> Self {
        Self {
            cell: ReentrantMutex::new(PoolCell {
                busy: Cell::new(false),
                pool: RefCell::new(Pool::new(key)),
            }),
        }
    }

    /// Runs `f` against the committed pool state.
    ///
    /// Blocks while another thread mutates the pool.  Calls from inside an
    /// in-flight mutation on the same thread are allowed and observe the
    /// state as of the last commit.
    pub fn read<R>(&self, f: impl FnOnce(&Pool) -> R) -> R {
        let guard = self.cell.lock();
        let pool = guard.pool.borrow();
        f(&pool)
    }

    /// Convenience wrapper over [`read`](Self::read).
    #[must_use]
    pub fn snapshot(&self) -> PoolSnapshot {
        self.read(Pool::snapshot)
    }

    /// Claims the slot for a mutating operation.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Reentrancy`] if this thread already holds the
    /// slot for another mutation.
    pub(crate) fn enter(&self) -> Result<PoolGuard<'_>> {
        let guard = self.cell.lock();
        if guard.busy.get() {
            let key = guard.pool.borrow().key();
            warn!(%key, "re-entrant mutation rejected");
            return Err(LedgerError::Reentrancy);
        }
        guard.busy.set(true);
        Ok(PoolGuard { guard })
    }
}

/// Exclusive claim on a [`PoolSlot`] for the duration of one mutation.
///
/// Dropping the guard releases the claim.
pub(crate) struct PoolGuard<'a> {
    guard: ReentrantMutexGuard<'a, PoolCell>,
}

impl PoolGuard<'_> {
    /// Reads the pool; the borrow ends when `f` returns.
    pub(crate) fn read<R>(&self, f: impl FnOnce(&Pool) -> R) -> R {
        let pool = self.guard.pool.borrow();
        f(&pool)
    }

    /// Mutates the pool; the borrow ends when `f` returns, so no borrow is
    /// ever held across a transfer.
    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut Pool) -> R) -> R {
        let mut pool = self.guard.pool.borrow_mut();
        f(&mut pool)
    }
}

impl Drop for PoolGuard<'_> {
    fn drop(&mut self) {
        self.guard.busy.set(false);
    }
}

/// All pools of a ledger, keyed by canonical [`PoolKey`].
#[derive(Debug, Default)]
pub struct PoolStore {
    pools: DashMap<PoolKey, Arc<PoolSlot>>,
}

impl PoolStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for `key`, if one was ever created.
    ///
    /// The returned slot may hold an uninitialized pool left behind by a
    /// failed first deposit; callers treat that like a missing pool.
    #[must_use]
    pub fn get(&self, key: &PoolKey) -> Option<Arc<PoolSlot>> {
        self.pools.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Slot for `key`, creating an empty pool if needed.
    pub fn get_or_create(&self, key: PoolKey) -> Arc<PoolSlot> {
        self.pools
            .entry(key)
            .or_insert_with(|| {
                debug!(%key, "pool slot created");
                Arc::new(PoolSlot::new(key))
            })
            .value()
            .clone()
    }

    /// Keys of all initialized pools, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<PoolKey> {
        // Collect first so no map shard stays locked while slots are read.
        let slots: Vec<Arc<PoolSlot>> = self.pools.iter().map(|e| Arc::clone(e.value())).collect();
        let mut keys: Vec<PoolKey> = slots
            .iter()
            .filter_map(|slot| slot.read(|p| p.is_initialized().then_some(p.key())))
            .collect();
        keys.sort();
        keys
    }

    /// Number of initialized pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    /// `true` if no pool has been initialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
