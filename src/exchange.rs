//! Public entry point.
//!
//! [`Exchange`] owns every pool, the transfer gateway, the clock, the
//! configuration and the event log.  It is `Send + Sync` whenever the asset
//! collaborator and clock are, and all methods take `&self`, so one
//! instance can be shared across threads behind an `Arc`.

use tracing::debug;

use crate::config::LedgerConfig;
use crate::domain::{
    Account, AddLiquidityRequest, Amount, AssetId, LedgerEvent, PoolKey, Price,
    RemoveLiquidityRequest, Shares, SwapRequest,
};
use crate::engine::{
    quote_out, quote_price, EngineContext, EventLog, LiquidityManager, SwapExecutor,
};
use crate::error::{LedgerError, Result};
use crate::gateway::{AssetTransfer, TransferGateway};
use crate::store::{Pool, PoolSnapshot, PoolStore};
use crate::traits::{Clock, SystemClock};

/// A multi-pool constant-product exchange.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use swap_ledger::config::LedgerConfig;
/// use swap_ledger::domain::{Account, AddLiquidityRequest, Amount, AssetId, SwapRequest, Timestamp};
/// use swap_ledger::exchange::Exchange;
/// use swap_ledger::gateway::{AssetTransfer, InMemoryAssets};
/// use swap_ledger::traits::ManualClock;
///
/// let custody = Account::from_index(1_000);
/// let alice = Account::from_index(1);
/// let (usd, eur) = (AssetId::from_index(1), AssetId::from_index(2));
///
/// let assets = Arc::new(InMemoryAssets::new());
/// for asset in [usd, eur] {
///     assets.mint(asset, alice, Amount::new(10_000));
///     assets.approve(asset, alice, custody, Amount::new(10_000)).unwrap();
/// }
///
/// let clock = ManualClock::new(Timestamp::from_secs(0));
/// let ex = Exchange::new(Arc::clone(&assets), custody, clock, LedgerConfig::default());
///
/// let deadline = Timestamp::from_secs(60);
/// ex.add_liquidity(alice, &AddLiquidityRequest {
///     token_a: usd,
///     token_b: eur,
///     amount_a_desired: Amount::new(1_000),
///     amount_b_desired: Amount::new(1_000),
///     amount_a_min: Amount::ZERO,
///     amount_b_min: Amount::ZERO,
///     to: alice,
///     deadline,
/// }).unwrap();
///
/// let req = SwapRequest::single_hop(Amount::new(100), Amount::new(90), usd, eur, alice, deadline);
/// let [_, out] = ex.swap_exact_tokens_for_tokens(alice, &req).unwrap();
/// assert_eq!(out, Amount::new(90));
/// ```
#[derive(Debug)]
pub struct Exchange<T, C = SystemClock> {
    store: PoolStore,
    gateway: TransferGateway<T>,
    clock: C,
    config: LedgerConfig,
    events: EventLog,
}

impl<T: AssetTransfer> Exchange<T, SystemClock> {
    /// Creates an exchange on the wall clock with the default configuration.
    #[must_use]
    pub fn with_defaults(assets: T, custody: Account) -> Self {
        Self::new(assets, custody, SystemClock, LedgerConfig::default())
    }
}

impl<T: AssetTransfer, C: Clock> Exchange<T, C> {
    /// Creates an exchange holding reserves under `custody`.
    #[must_use]
    pub fn new(assets: T, custody: Account, clock: C, config: LedgerConfig) -> Self {
        Self {
            store: PoolStore::new(),
            gateway: TransferGateway::new(assets, custody),
            clock,
            config,
            events: EventLog::new(),
        }
    }

    fn context(&self) -> EngineContext<'_, T, C> {
        EngineContext::new(
            &self.store,
            &self.gateway,
            &self.clock,
            &self.config,
            &self.events,
        )
    }

    // -- mutations -----------------------------------------------------------

    /// Deposits liquidity; see [`LiquidityManager::add`].
    ///
    /// # Errors
    ///
    /// See [`LiquidityManager::add`].
    pub fn add_liquidity(
        &self,
        caller: Account,
        req: &AddLiquidityRequest,
    ) -> Result<(Amount, Amount, Shares)> {
        LiquidityManager::new(self.context()).add(caller, req)
    }

    /// Withdraws liquidity; see [`LiquidityManager::remove`].
    ///
    /// # Errors
    ///
    /// See [`LiquidityManager::remove`].
    pub fn remove_liquidity(
        &self,
        caller: Account,
        req: &RemoveLiquidityRequest,
    ) -> Result<(Amount, Amount)> {
        LiquidityManager::new(self.context()).remove(caller, req)
    }

    /// Swaps an exact input; see [`SwapExecutor::swap_exact_in`].
    ///
    /// # Errors
    ///
    /// See [`SwapExecutor::swap_exact_in`].
    pub fn swap_exact_tokens_for_tokens(
        &self,
        caller: Account,
        req: &SwapRequest,
    ) -> Result<[Amount; 2]> {
        SwapExecutor::new(self.context()).swap_exact_in(caller, req)
    }

    // -- queries -------------------------------------------------------------

    /// Runs `f` on the initialized pool of a pair.
    fn with_pool<R>(
        &self,
        token_a: AssetId,
        token_b: AssetId,
        f: impl FnOnce(&Pool) -> R,
    ) -> Result<R> {
        let key = PoolKey::resolve(token_a, token_b)?;
        let slot = self.store.get(&key).ok_or(LedgerError::PoolUninitialized)?;
        slot.read(|pool| {
            if pool.is_initialized() {
                Ok(f(pool))
            } else {
                debug!(%key, "query on uninitialized pool");
                Err(LedgerError::PoolUninitialized)
            }
        })
    }

    /// Reserves of a pair in the caller's order `(reserve_a, reserve_b)`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::IdenticalAssets`], [`LedgerError::ZeroAsset`], or
    /// [`LedgerError::PoolUninitialized`].
    pub fn get_reserves(&self, token_a: AssetId, token_b: AssetId) -> Result<(Amount, Amount)> {
        self.with_pool(token_a, token_b, |p| p.reserves_from(&token_a))
    }

    /// Share balance of `user` in the pool of a pair.
    ///
    /// # Errors
    ///
    /// [`LedgerError::IdenticalAssets`], [`LedgerError::ZeroAsset`], or
    /// [`LedgerError::PoolUninitialized`].
    pub fn get_liquidity(&self, token_a: AssetId, token_b: AssetId, user: Account) -> Result<Shares> {
        self.with_pool(token_a, token_b, |p| p.shares_of(&user))
    }

    /// Spot price of `token_a` in units of `token_b`, scaled by the
    /// configured price scale.
    ///
    /// # Errors
    ///
    /// [`LedgerError::IdenticalAssets`], [`LedgerError::ZeroAsset`],
    /// [`LedgerError::PoolUninitialized`], or [`LedgerError::IlliquidPool`]
    /// once every share has been burned.
    pub fn get_price(&self, token_a: AssetId, token_b: AssetId) -> Result<Price> {
        let (reserve_a, reserve_b) = self.get_reserves(token_a, token_b)?;
        quote_price(reserve_a, reserve_b, self.config.price_scale())
    }

    /// Pure quote; see [`quote_out`].
    ///
    /// # Errors
    ///
    /// [`LedgerError::ZeroInput`] or [`LedgerError::IlliquidPool`].
    pub fn get_amount_out(
        &self,
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
    ) -> Result<Amount> {
        quote_out(amount_in, reserve_in, reserve_out)
    }

    /// Consistent view of a pair's pool.
    ///
    /// # Errors
    ///
    /// [`LedgerError::IdenticalAssets`], [`LedgerError::ZeroAsset`], or
    /// [`LedgerError::PoolUninitialized`].
    pub fn pool_snapshot(&self, token_a: AssetId, token_b: AssetId) -> Result<PoolSnapshot> {
        self.with_pool(token_a, token_b, Pool::snapshot)
    }

    /// Keys of every initialized pool, sorted.
    #[must_use]
    pub fn pools(&self) -> Vec<PoolKey> {
        self.store.keys()
    }

    /// Events recorded so far, in commit order.
    #[must_use]
    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.snapshot()
    }

    /// Removes and returns the recorded events.
    pub fn drain_events(&self) -> Vec<LedgerEvent> {
        self.events.drain()
    }

    // -- accessors -----------------------------------------------------------

    /// Transfer gateway, for allowance management through
    /// [`TransferGateway::force_approve`].
    #[must_use]
    pub const fn gateway(&self) -> &TransferGateway<T> {
        &self.gateway
    }

    /// Account holding the pooled reserves.
    #[must_use]
    pub const fn custody(&self) -> Account {
        self.gateway.custody()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Injected clock.
    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }
}
