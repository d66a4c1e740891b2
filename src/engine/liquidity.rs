//! Share minting and burning.
//!
//! # Deposits
//!
//! The first deposit into a pool (zero outstanding shares) takes the
//! desired amounts as-is and mints the geometric mean
//! `floor(sqrt(a · b))`.  Later deposits are trimmed to the current reserve
//! ratio on whichever side binds:
//!
//! ```text
//! b_opt = a_desired · r_b / r_a       if b_opt <= b_desired
//! a_opt = b_desired · r_a / r_b       otherwise
//! minted = min(a · T / r_a, b · T / r_b)
//! ```
//!
//! so a deposit never moves the spot price.
//!
//! # Withdrawals
//!
//! Burning `s` of `T` shares returns `floor(r · s / T)` of each reserve.
//! Reserves and shares are committed before the assets are pushed out.

use alloy_primitives::U256;
use tracing::{debug, info};

use super::{absorb_stranded, EngineContext};
use crate::domain::{
    Account, AddLiquidityRequest, Amount, LedgerEvent, PoolKey, RemoveLiquidityRequest, Rounding,
    Shares,
};
use crate::error::{LedgerError, Result};
use crate::gateway::{AssetTransfer, Settlement};
use crate::math::{mul_div, mul_div_wide, narrow, sqrt_product, widen};
use crate::traits::Clock;

/// Adds and removes liquidity.
#[derive(Debug)]
pub struct LiquidityManager<'a, T, C> {
    ctx: EngineContext<'a, T, C>,
}

impl<'a, T: AssetTransfer, C: Clock> LiquidityManager<'a, T, C> {
    /// Creates a manager over `ctx`.
    #[must_use]
    pub const fn new(ctx: EngineContext<'a, T, C>) -> Self {
        Self { ctx }
    }

    /// Deposits both assets of a pair and mints shares to `req.to`.
    ///
    /// Returns `(amount_a, amount_b, shares_minted)` in the caller's asset
    /// order.  The pool is created on first use.
    ///
    /// # Errors
    ///
    /// In check order: [`LedgerError::Expired`],
    /// [`LedgerError::IdenticalAssets`], [`LedgerError::ZeroAsset`],
    /// [`LedgerError::InvalidRecipient`],
    /// [`LedgerError::InsufficientADesired`],
    /// [`LedgerError::InsufficientBDesired`], [`LedgerError::Reentrancy`],
    /// [`LedgerError::DegenerateMint`] (bootstrap),
    /// [`LedgerError::InsufficientAAmount`],
    /// [`LedgerError::InsufficientBAmount`],
    /// [`LedgerError::DegenerateMint`] (proportional),
    /// [`LedgerError::ReserveOverflow`], [`LedgerError::TransferFailed`].
    pub fn add(&self, caller: Account, req: &AddLiquidityRequest) -> Result<(Amount, Amount, Shares)> {
        self.ctx.ensure_live(req.deadline)?;
        let key = PoolKey::resolve(req.token_a, req.token_b)?;
        if req.to.is_null() {
            debug!(%key, "add rejected: null recipient");
            return Err(LedgerError::InvalidRecipient);
        }
        if req.amount_a_desired.is_zero() {
            return Err(LedgerError::InsufficientADesired);
        }
        if req.amount_b_desired.is_zero() {
            return Err(LedgerError::InsufficientBDesired);
        }

        let slot = self.ctx.store.get_or_create(key);
        let guard = slot.enter()?;
        let (reserve_a, reserve_b, total) = guard.read(|p| {
            let (ra, rb) = p.reserves_from(&req.token_a);
            (ra, rb, p.total_shares())
        });

        let (amount_a, amount_b, bootstrap_mint) = if total.is_zero() {
            let minted = sqrt_product(req.amount_a_desired, req.amount_b_desired)?;
            if minted.is_zero() {
                debug!(%key, "add rejected: bootstrap mints zero shares");
                return Err(LedgerError::DegenerateMint);
            }
            (req.amount_a_desired, req.amount_b_desired, Some(Shares::from(minted)))
        } else {
            let (a, b) = optimal_amounts(
                req.amount_a_desired,
                req.amount_b_desired,
                reserve_a,
                reserve_b,
            )?;
            (a, b, None)
        };

        if amount_a < req.amount_a_min {
            debug!(%key, %amount_a, min = %req.amount_a_min, "add rejected: A below minimum");
            return Err(LedgerError::InsufficientAAmount);
        }
        if amount_b < req.amount_b_min {
            debug!(%key, %amount_b, min = %req.amount_b_min, "add rejected: B below minimum");
            return Err(LedgerError::InsufficientBAmount);
        }

        let minted = match bootstrap_mint {
            Some(minted) => minted,
            None => {
                let minted = proportional_mint(amount_a, amount_b, reserve_a, reserve_b, total)?;
                if minted.is_zero() {
                    debug!(%key, "add rejected: deposit mints zero shares");
                    return Err(LedgerError::DegenerateMint);
                }
                minted
            }
        };

        let (low_in, high_in) = key.orient(&req.token_a, amount_a, amount_b);
        let max_reserve = self.ctx.config.max_reserve();
        guard.read(|p| p.check_deposit(low_in, high_in, minted, max_reserve))?;

        let mut settlement = Settlement::new(self.ctx.gateway);
        let pulled = settlement
            .pull(req.token_a, caller, amount_a)
            .and_then(|()| settlement.pull(req.token_b, caller, amount_b));
        let committed = pulled.and_then(|()| {
            guard.update(|p| p.deposit(low_in, high_in, req.to, minted, max_reserve))
        });
        if let Err(e) = committed {
            let stranded = settlement.unwind();
            if stranded.is_empty() {
                return Err(e);
            }
            return Err(absorb_stranded(&guard, &stranded, max_reserve, e));
        }

        info!(%key, %caller, to = %req.to, %amount_a, %amount_b, shares = %minted, "liquidity added");
        self.ctx.events.record(LedgerEvent::LiquidityAdded {
            provider: caller,
            token_a: req.token_a,
            token_b: req.token_b,
            amount_a,
            amount_b,
            shares: minted,
            to: req.to,
        });
        Ok((amount_a, amount_b, minted))
    }

    /// Burns `req.liquidity` of the caller's shares and sends the
    /// proportional reserves to `req.to`.
    ///
    /// Returns `(amount_a, amount_b)` in the caller's asset order.
    ///
    /// # Errors
    ///
    /// In check order: [`LedgerError::Expired`],
    /// [`LedgerError::InvalidRecipient`], [`LedgerError::IdenticalAssets`],
    /// [`LedgerError::ZeroAsset`], [`LedgerError::PoolEmpty`],
    /// [`LedgerError::Reentrancy`], [`LedgerError::ZeroLiquidity`],
    /// [`LedgerError::InsufficientShareBalance`],
    /// [`LedgerError::InsufficientAAmount`],
    /// [`LedgerError::InsufficientBAmount`], [`LedgerError::TransferFailed`].
    ///
    /// If a payout fails and an earlier payout cannot be pulled back, the
    /// shares stay burned, the reserves drop by what actually left custody,
    /// and [`LedgerError::SettlementIncomplete`] is returned.
    pub fn remove(&self, caller: Account, req: &RemoveLiquidityRequest) -> Result<(Amount, Amount)> {
        self.ctx.ensure_live(req.deadline)?;
        if req.to.is_null() {
            return Err(LedgerError::InvalidRecipient);
        }
        let key = PoolKey::resolve(req.token_a, req.token_b)?;
        let Some(slot) = self.ctx.store.get(&key) else {
            debug!(%key, "remove rejected: no such pool");
            return Err(LedgerError::PoolEmpty);
        };
        let guard = slot.enter()?;
        let (reserve_a, reserve_b, total, held, live) = guard.read(|p| {
            let (ra, rb) = p.reserves_from(&req.token_a);
            (ra, rb, p.total_shares(), p.shares_of(&caller), p.is_initialized())
        });
        if !live || total.is_zero() {
            debug!(%key, "remove rejected: pool has no shares");
            return Err(LedgerError::PoolEmpty);
        }
        if req.liquidity.is_zero() {
            return Err(LedgerError::ZeroLiquidity);
        }
        if held < req.liquidity {
            debug!(%key, %caller, %held, wanted = %req.liquidity, "remove rejected: share balance");
            return Err(LedgerError::InsufficientShareBalance);
        }

        let amount_a = mul_div(reserve_a, req.liquidity.as_amount(), total.as_amount(), Rounding::Down)?;
        let amount_b = mul_div(reserve_b, req.liquidity.as_amount(), total.as_amount(), Rounding::Down)?;
        if amount_a < req.amount_a_min {
            debug!(%key, %amount_a, min = %req.amount_a_min, "remove rejected: A below minimum");
            return Err(LedgerError::InsufficientAAmount);
        }
        if amount_b < req.amount_b_min {
            debug!(%key, %amount_b, min = %req.amount_b_min, "remove rejected: B below minimum");
            return Err(LedgerError::InsufficientBAmount);
        }

        let (low_out, high_out) = key.orient(&req.token_a, amount_a, amount_b);
        let max_reserve = self.ctx.config.max_reserve();
        let checkpoint = guard.read(|p| p.checkpoint(caller));
        guard.update(|p| p.withdraw(caller, req.liquidity, low_out, high_out))?;

        let mut settlement = Settlement::new(self.ctx.gateway);
        let pushed = settlement
            .push(req.token_a, req.to, amount_a)
            .and_then(|()| settlement.push(req.token_b, req.to, amount_b));
        if let Err(e) = pushed {
            let stranded = settlement.unwind();
            if stranded.is_empty() {
                guard.update(|p| p.restore(checkpoint));
                return Err(e);
            }
            // A payout could not be pulled back: the burn stands and only
            // what custody still holds returns to the reserves.
            guard.update(|p| p.restore_reserves(&checkpoint));
            return Err(absorb_stranded(&guard, &stranded, max_reserve, e));
        }

        info!(%key, %caller, to = %req.to, %amount_a, %amount_b, shares = %req.liquidity, "liquidity removed");
        self.ctx.events.record(LedgerEvent::LiquidityRemoved {
            provider: caller,
            token_a: req.token_a,
            token_b: req.token_b,
            amount_a,
            amount_b,
            shares: req.liquidity,
            to: req.to,
        });
        Ok((amount_a, amount_b))
    }
}

/// Trims the desired amounts to the reserve ratio on the binding side.
fn optimal_amounts(
    a_desired: Amount,
    b_desired: Amount,
    reserve_a: Amount,
    reserve_b: Amount,
) -> Result<(Amount, Amount)> {
    let b_optimal = mul_div_wide(
        a_desired.get(),
        reserve_b.get(),
        widen(reserve_a.get()),
        Rounding::Down,
    )?;
    if b_optimal <= widen(b_desired.get()) {
        return Ok((a_desired, narrow(b_optimal, "optimal B amount")?));
    }
    let a_optimal = mul_div_wide(
        b_desired.get(),
        reserve_a.get(),
        widen(reserve_b.get()),
        Rounding::Down,
    )?;
    Ok((narrow(a_optimal, "optimal A amount")?, b_desired))
}

/// `min(a · T / r_a, b · T / r_b)`, floored.
fn proportional_mint(
    amount_a: Amount,
    amount_b: Amount,
    reserve_a: Amount,
    reserve_b: Amount,
    total: Shares,
) -> Result<Shares> {
    let via_a: U256 = mul_div_wide(
        amount_a.get(),
        total.get(),
        widen(reserve_a.get()),
        Rounding::Down,
    )?;
    let via_b: U256 = mul_div_wide(
        amount_b.get(),
        total.get(),
        widen(reserve_b.get()),
        Rounding::Down,
    )?;
    narrow(via_a.min(via_b), "minted shares exceed u128").map(Shares::from)
}
