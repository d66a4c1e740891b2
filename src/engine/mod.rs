//! Pricing and the two state-changing components.
//!
//! [`LiquidityManager`] and [`SwapExecutor`] are thin, short-lived views
//! over an [`EngineContext`]: the shared pool store, transfer gateway,
//! clock, configuration and event log.  Each public method performs one
//! atomic transition of one pool: validate, resolve, price, move assets,
//! commit, record.

mod event_log;
mod liquidity;
mod pricing;
mod swap;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

use tracing::{debug, error, warn};

use crate::config::LedgerConfig;
use crate::domain::{Amount, Timestamp};
use crate::error::{LedgerError, Result};
use crate::gateway::{Leg, TransferGateway};
use crate::store::{PoolGuard, PoolStore};
use crate::traits::Clock;

pub use event_log::EventLog;
pub use liquidity::LiquidityManager;
pub use pricing::{estimate_swap_out, quote_out, quote_price, PRICE_SCALE};
pub use swap::SwapExecutor;

/// Borrowed collaborators shared by the engine components.
#[derive(Debug)]
pub struct EngineContext<'a, T, C> {
    store: &'a PoolStore,
    gateway: &'a TransferGateway<T>,
    clock: &'a C,
    config: &'a LedgerConfig,
    events: &'a EventLog,
}

impl<T, C> Clone for EngineContext<'_, T, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, C> Copy for EngineContext<'_, T, C> {}

impl<'a, T, C: Clock> EngineContext<'a, T, C> {
    /// Bundles the collaborators.
    #[must_use]
    pub const fn new(
        store: &'a PoolStore,
        gateway: &'a TransferGateway<T>,
        clock: &'a C,
        config: &'a LedgerConfig,
        events: &'a EventLog,
    ) -> Self {
        Self {
            store,
            gateway,
            clock,
            config,
            events,
        }
    }

    /// Fails with [`LedgerError::Expired`] once `deadline` has passed.
    fn ensure_live(&self, deadline: Timestamp) -> Result<()> {
        let now = self.clock.now();
        if deadline.has_passed(now) {
            debug!(%deadline, %now, "rejected: deadline expired");
            return Err(LedgerError::Expired);
        }
        Ok(())
    }
}

/// Applies the transfers a failed operation could not reverse to the
/// pool's reserves and turns `failure` into the error to report.
///
/// A stranded `In` leg is still held by custody and is credited; a stranded
/// `Out` leg has left custody and is debited.  Afterwards the reserves
/// again match what custody holds for this pool.
fn absorb_stranded(
    guard: &PoolGuard<'_>,
    stranded: &[Leg],
    max_reserve: Amount,
    failure: LedgerError,
) -> LedgerError {
    for leg in stranded {
        let applied = guard.update(|p| match *leg {
            Leg::In { asset, amount, .. } => p.credit(&asset, amount, max_reserve),
            Leg::Out { asset, amount, .. } => p.debit(&asset, amount),
        });
        if let Err(e) = applied {
            error!(?leg, error = %e, "stranded transfer not reflected in reserves");
        }
    }
    match failure {
        LedgerError::TransferFailed { asset, source } => {
            warn!(%asset, stranded = stranded.len(), "operation left transfers in place");
            LedgerError::SettlementIncomplete {
                asset,
                source,
                stranded: stranded.len(),
            }
        }
        other => other,
    }
}
