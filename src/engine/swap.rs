//! Exact-input, single-hop swaps.

use tracing::{debug, info};

use super::{absorb_stranded, quote_out, EngineContext};
use crate::domain::{Account, Amount, AssetId, LedgerEvent, PoolKey, SwapRequest};
use crate::error::{LedgerError, Result};
use crate::gateway::{AssetTransfer, Settlement};
use crate::traits::Clock;

/// Executes swaps against the pool of a pair.
#[derive(Debug)]
pub struct SwapExecutor<'a, T, C> {
    ctx: EngineContext<'a, T, C>,
}

impl<'a, T: AssetTransfer, C: Clock> SwapExecutor<'a, T, C> {
    /// Creates an executor over `ctx`.
    #[must_use]
    pub const fn new(ctx: EngineContext<'a, T, C>) -> Self {
        Self { ctx }
    }

    /// Sells exactly `req.amount_in` of `path[0]` for at least
    /// `req.amount_out_min` of `path[1]`, delivered to `req.to`.
    ///
    /// Returns `[amount_in, amount_out]`.
    ///
    /// # Errors
    ///
    /// In check order: [`LedgerError::InvalidPathLength`],
    /// [`LedgerError::ZeroAsset`], [`LedgerError::InvalidRecipient`],
    /// [`LedgerError::Expired`], [`LedgerError::IdenticalAssets`],
    /// [`LedgerError::PoolUninitialized`], [`LedgerError::Reentrancy`],
    /// [`LedgerError::ZeroInput`], [`LedgerError::IlliquidPool`],
    /// [`LedgerError::InsufficientOutput`], [`LedgerError::ReserveOverflow`],
    /// [`LedgerError::TransferFailed`], or
    /// [`LedgerError::SettlementIncomplete`] if the input cannot be refunded
    /// after a failed payout (the input then stays in the pool).
    pub fn swap_exact_in(&self, caller: Account, req: &SwapRequest) -> Result<[Amount; 2]> {
        let (token_in, token_out) = route(&req.path)?;
        if req.to.is_null() {
            return Err(LedgerError::InvalidRecipient);
        }
        self.ctx.ensure_live(req.deadline)?;
        let key = PoolKey::resolve(token_in, token_out)?;

        let Some(slot) = self.ctx.store.get(&key) else {
            debug!(%key, "swap rejected: no such pool");
            return Err(LedgerError::PoolUninitialized);
        };
        let guard = slot.enter()?;
        let (live, reserve_in, reserve_out) = guard.read(|p| {
            let (r_in, r_out) = p.reserves_from(&token_in);
            (p.is_initialized(), r_in, r_out)
        });
        if !live {
            debug!(%key, "swap rejected: pool never funded");
            return Err(LedgerError::PoolUninitialized);
        }

        let amount_in = req.amount_in;
        let amount_out = quote_out(amount_in, reserve_in, reserve_out)?;
        if amount_out.is_zero() || amount_out < req.amount_out_min {
            debug!(%key, %amount_in, %amount_out, min = %req.amount_out_min, "swap rejected: output too low");
            return Err(LedgerError::InsufficientOutput {
                amount_out,
                minimum: req.amount_out_min,
            });
        }
        let max_reserve = self.ctx.config.max_reserve();
        guard.read(|p| p.check_swap(&token_in, amount_in, amount_out, max_reserve))?;

        let mut settlement = Settlement::new(self.ctx.gateway);
        settlement.pull(token_in, caller, amount_in)?;

        let checkpoint = guard.read(|p| p.checkpoint(caller));
        let settled = guard
            .update(|p| p.apply_swap(&token_in, amount_in, amount_out, max_reserve))
            .and_then(|()| settlement.push(token_out, req.to, amount_out));
        if let Err(e) = settled {
            guard.update(|p| p.restore(checkpoint));
            let stranded = settlement.unwind();
            if stranded.is_empty() {
                return Err(e);
            }
            return Err(absorb_stranded(&guard, &stranded, max_reserve, e));
        }

        info!(%key, %caller, to = %req.to, %token_in, %amount_in, %amount_out, "swap executed");
        self.ctx.events.record(LedgerEvent::Swap {
            caller,
            token_in,
            token_out,
            amount_in,
            amount_out,
            to: req.to,
        });
        Ok([amount_in, amount_out])
    }
}

/// Splits a two-asset path into `(token_in, token_out)`.
fn route(path: &[AssetId]) -> Result<(AssetId, AssetId)> {
    let &[token_in, token_out] = path else {
        debug!(len = path.len(), "swap rejected: path length");
        return Err(LedgerError::InvalidPathLength(path.len()));
    };
    if token_in.is_null() || token_out.is_null() {
        return Err(LedgerError::ZeroAsset);
    }
    Ok((token_in, token_out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_requires_two_hops() {
        let a = AssetId::from_index(1);
        let b = AssetId::from_index(2);
        assert_eq!(route(&[a]), Err(LedgerError::InvalidPathLength(1)));
        assert_eq!(route(&[a, b, a]), Err(LedgerError::InvalidPathLength(3)));
        assert_eq!(route(&[a, AssetId::NULL]), Err(LedgerError::ZeroAsset));
        assert_eq!(route(&[b, a]), Ok((b, a)));
    }
}
