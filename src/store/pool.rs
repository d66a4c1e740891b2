//! State of a single constant-product pool.
//!
//! A [`Pool`] holds the two reserves in canonical key order, the total
//! share supply and each provider's balance.  The mutators validate the
//! complete next state before touching anything, so a rejected call leaves
//! the pool exactly as it was.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Account, Amount, AssetId, PoolKey, Shares};
use crate::error::{LedgerError, Result};
use crate::math::CheckedArithmetic;

/// Reserves and share ledger of one pool.
///
/// # Invariants
///
/// - The provider balances sum to `total_shares`.
/// - Neither reserve exceeds the `max_reserve` passed to the mutators.
/// - `initialized` flips to `true` on the first successful deposit and
///   never back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    key: PoolKey,
    reserve_low: Amount,
    reserve_high: Amount,
    total_shares: Shares,
    shares: HashMap<Account, Shares>,
    initialized: bool,
}

/// Point-in-time view of a pool for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolSnapshot {
    /// Canonical pool key.
    pub key: PoolKey,
    /// Reserve of `key.low()`.
    pub reserve_low: Amount,
    /// Reserve of `key.high()`.
    pub reserve_high: Amount,
    /// Outstanding shares.
    pub total_shares: Shares,
    /// Accounts holding a non-zero share balance.
    pub providers: usize,
}

/// Saved fields needed to roll back one operation that touched `account`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    reserve_low: Amount,
    reserve_high: Amount,
    total_shares: Shares,
    account: Account,
    account_shares: Option<Shares>,
    initialized: bool,
}

impl Pool {
    /// Creates an empty, uninitialized pool.
    #[must_use]
    pub fn new(key: PoolKey) -> Self {
        Self {
            key,
            reserve_low: Amount::ZERO,
            reserve_high: Amount::ZERO,
            total_shares: Shares::ZERO,
            shares: HashMap::new(),
            initialized: false,
        }
    }

    /// Canonical key.
    #[must_use]
    pub const fn key(&self) -> PoolKey {
        self.key
    }

    /// Reserves in canonical order `(low, high)`.
    #[must_use]
    pub const fn reserves(&self) -> (Amount, Amount) {
        (self.reserve_low, self.reserve_high)
    }

    /// Reserves ordered as `(first, other)`.
    #[must_use]
    pub fn reserves_from(&self, first: &AssetId) -> (Amount, Amount) {
        self.key.orient(first, self.reserve_low, self.reserve_high)
    }

    /// Total outstanding shares.
    #[must_use]
    pub const fn total_shares(&self) -> Shares {
        self.total_shares
    }

    /// Share balance of `account` (zero if unset).
    #[must_use]
    pub fn shares_of(&self, account: &Account) -> Shares {
        self.shares.get(account).copied().unwrap_or(Shares::ZERO)
    }

    /// `true` once a deposit has succeeded.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of accounts with a non-zero share balance.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.shares.len()
    }

    /// Reporting view.
    #[must_use]
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            key: self.key,
            reserve_low: self.reserve_low,
            reserve_high: self.reserve_high,
            total_shares: self.total_shares,
            providers: self.shares.len(),
        }
    }

    /// Adds `(low_in, high_in)` to the reserves and credits `minted` shares
    /// to `to`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ReserveOverflow`] if either reserve would exceed
    ///   `max_reserve`.
    /// - [`LedgerError::Overflow`] if the share supply would overflow.
    pub fn deposit(
        &mut self,
        low_in: Amount,
        high_in: Amount,
        to: Account,
        minted: Shares,
        max_reserve: Amount,
    ) -> Result<()> {
        let (reserve_low, reserve_high, total_shares) =
            self.deposit_outcome(low_in, high_in, minted, max_reserve)?;
        let balance = self.shares_of(&to).safe_add(&minted)?;

        self.reserve_low = reserve_low;
        self.reserve_high = reserve_high;
        self.total_shares = total_shares;
        self.set_shares(to, balance);
        self.initialized = true;
        Ok(())
    }

    /// Burns `burned` shares from `from` and removes `(low_out, high_out)`
    /// from the reserves.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientShareBalance`] if `from` holds fewer
    ///   than `burned` shares.
    /// - [`LedgerError::Underflow`] if a reserve would go negative.
    pub fn withdraw(
        &mut self,
        from: Account,
        burned: Shares,
        low_out: Amount,
        high_out: Amount,
    ) -> Result<()> {
        let balance = self
            .shares_of(&from)
            .checked_sub(&burned)
            .ok_or(LedgerError::InsufficientShareBalance)?;
        let total_shares = self.total_shares.safe_sub(&burned)?;
        let reserve_low = self.reserve_low.safe_sub(&low_out)?;
        let reserve_high = self.reserve_high.safe_sub(&high_out)?;

        self.reserve_low = reserve_low;
        self.reserve_high = reserve_high;
        self.total_shares = total_shares;
        self.set_shares(from, balance);
        Ok(())
    }

    /// Credits `amount_in` of `token_in` and debits `amount_out` of the
    /// other asset.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ZeroAsset`] if `token_in` is not in the pool.
    /// - [`LedgerError::ReserveOverflow`] if the input reserve would exceed
    ///   `max_reserve`.
    /// - [`LedgerError::Underflow`] if `amount_out` exceeds the output
    ///   reserve.
    pub fn apply_swap(
        &mut self,
        token_in: &AssetId,
        amount_in: Amount,
        amount_out: Amount,
        max_reserve: Amount,
    ) -> Result<()> {
        let (reserve_low, reserve_high) =
            self.swap_outcome(token_in, amount_in, amount_out, max_reserve)?;
        self.reserve_low = reserve_low;
        self.reserve_high = reserve_high;
        Ok(())
    }

    /// Runs the checks of [`deposit`](Self::deposit) without changing
    /// anything.
    ///
    /// # Errors
    ///
    /// Same as [`deposit`](Self::deposit).
    pub fn check_deposit(
        &self,
        low_in: Amount,
        high_in: Amount,
        minted: Shares,
        max_reserve: Amount,
    ) -> Result<()> {
        self.deposit_outcome(low_in, high_in, minted, max_reserve)
            .map(|_| ())
    }

    /// Runs the checks of [`apply_swap`](Self::apply_swap) without changing
    /// anything.
    ///
    /// # Errors
    ///
    /// Same as [`apply_swap`](Self::apply_swap).
    pub fn check_swap(
        &self,
        token_in: &AssetId,
        amount_in: Amount,
        amount_out: Amount,
        max_reserve: Amount,
    ) -> Result<()> {
        self.swap_outcome(token_in, amount_in, amount_out, max_reserve)
            .map(|_| ())
    }

    pub(crate) fn checkpoint(&self, account: Account) -> Checkpoint {
        Checkpoint {
            reserve_low: self.reserve_low,
            reserve_high: self.reserve_high,
            total_shares: self.total_shares,
            account,
            account_shares: self.shares.get(&account).copied(),
            initialized: self.initialized,
        }
    }

    pub(crate) fn restore(&mut self, cp: Checkpoint) {
        self.reserve_low = cp.reserve_low;
        self.reserve_high = cp.reserve_high;
        self.total_shares = cp.total_shares;
        self.initialized = cp.initialized;
        match cp.account_shares {
            Some(s) => {
                self.shares.insert(cp.account, s);
            }
            None => {
                self.shares.remove(&cp.account);
            }
        }
    }

    /// Restores only the reserves saved in `cp`, leaving shares as they are.
    pub(crate) fn restore_reserves(&mut self, cp: &Checkpoint) {
        self.reserve_low = cp.reserve_low;
        self.reserve_high = cp.reserve_high;
    }

    /// Adds `amount` of `asset` to its reserve without minting shares.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ZeroAsset`] if `asset` is not in the pool.
    /// - [`LedgerError::ReserveOverflow`] if the reserve would exceed
    ///   `max_reserve`.
    pub(crate) fn credit(&mut self, asset: &AssetId, amount: Amount, max_reserve: Amount) -> Result<()> {
        let reserve = self.reserve_mut(asset)?;
        *reserve = grow(*reserve, amount, max_reserve)?;
        Ok(())
    }

    /// Removes `amount` of `asset` from its reserve without burning shares.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ZeroAsset`] if `asset` is not in the pool.
    /// - [`LedgerError::Underflow`] if the reserve holds less than `amount`.
    pub(crate) fn debit(&mut self, asset: &AssetId, amount: Amount) -> Result<()> {
        let reserve = self.reserve_mut(asset)?;
        *reserve = reserve.safe_sub(&amount)?;
        Ok(())
    }

    fn reserve_mut(&mut self, asset: &AssetId) -> Result<&mut Amount> {
        if !self.key.contains(asset) {
            return Err(LedgerError::ZeroAsset);
        }
        if self.key.is_low(asset) {
            Ok(&mut self.reserve_low)
        } else {
            Ok(&mut self.reserve_high)
        }
    }

    fn deposit_outcome(
        &self,
        low_in: Amount,
        high_in: Amount,
        minted: Shares,
        max_reserve: Amount,
    ) -> Result<(Amount, Amount, Shares)> {
        let reserve_low = grow(self.reserve_low, low_in, max_reserve)?;
        let reserve_high = grow(self.reserve_high, high_in, max_reserve)?;
        let total_shares = self.total_shares.safe_add(&minted)?;
        Ok((reserve_low, reserve_high, total_shares))
    }

    /// Next `(low, high)` reserves after a swap.
    fn swap_outcome(
        &self,
        token_in: &AssetId,
        amount_in: Amount,
        amount_out: Amount,
        max_reserve: Amount,
    ) -> Result<(Amount, Amount)> {
        if !self.key.contains(token_in) {
            return Err(LedgerError::ZeroAsset);
        }
        let (reserve_in, reserve_out) = self.reserves_from(token_in);
        let next_in = grow(reserve_in, amount_in, max_reserve)?;
        let next_out = reserve_out.safe_sub(&amount_out)?;
        Ok(self.key.orient(token_in, next_in, next_out))
    }

    fn set_shares(&mut self, account: Account, balance: Shares) {
        if balance.is_zero() {
            self.shares.remove(&account);
        } else {
            self.shares.insert(account, balance);
        }
    }
}

/// `reserve + delta`, bounded by `max_reserve`.
fn grow(reserve: Amount, delta: Amount, max_reserve: Amount) -> Result<Amount> {
    reserve
        .checked_add(&delta)
        .filter(|next| next.fits_within(&max_reserve))
        .ok_or(LedgerError::ReserveOverflow)
}
