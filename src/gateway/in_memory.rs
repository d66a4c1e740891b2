//! In-memory fungible assets.
//!
//! [`InMemoryAssets`] keeps balances and allowances for any number of
//! assets behind one lock and implements [`AssetTransfer`] with the usual
//! balance/allowance semantics.  Per-asset [`AssetBehavior`] switches let
//! tests and simulations model assets that misbehave.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::{AssetTransfer, TransferError};
use crate::domain::{Account, Amount, AssetId};

/// How an asset responds to calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetBehavior {
    /// Moves funds and returns `true`.
    #[default]
    Standard,
    /// Returns `false` from every call without moving anything.
    Falsy,
    /// Returns `false` when asked to change a non-zero allowance to another
    /// non-zero value; the allowance must be reset to zero first.
    RequireReset,
}

#[derive(Debug, Default)]
struct Books {
    balances: HashMap<(AssetId, Account), Amount>,
    allowances: HashMap<(AssetId, Account, Account), Amount>,
    behaviors: HashMap<AssetId, AssetBehavior>,
}

impl Books {
    fn behavior(&self, asset: AssetId) -> AssetBehavior {
        self.behaviors.get(&asset).copied().unwrap_or_default()
    }

    fn balance(&self, asset: AssetId, holder: Account) -> Amount {
        self.balances
            .get(&(asset, holder))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    fn allowance(&self, asset: AssetId, owner: Account, spender: Account) -> Amount {
        self.allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Moves funds after checking both sides, so a failure changes nothing.
    fn move_funds(
        &mut self,
        asset: AssetId,
        from: Account,
        to: Account,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let available = self.balance(asset, from);
        let debited = available
            .checked_sub(&amount)
            .ok_or(TransferError::InsufficientBalance {
                available,
                required: amount,
            })?;
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance(asset, to)
            .checked_add(&amount)
            .ok_or(TransferError::BalanceOverflow)?;
        self.balances.insert((asset, from), debited);
        self.balances.insert((asset, to), credited);
        Ok(())
    }
}

/// Thread-safe in-memory balances and allowances for many assets.
///
/// # Examples
///
/// ```
/// use swap_ledger::domain::{Account, Amount, AssetId};
/// use swap_ledger::gateway::{AssetTransfer, InMemoryAssets};
///
/// let assets = InMemoryAssets::new();
/// let usd = AssetId::from_index(1);
/// let (alice, bob) = (Account::from_index(1), Account::from_index(2));
///
/// assets.mint(usd, alice, Amount::new(100));
/// assert_eq!(assets.transfer(usd, alice, bob, Amount::new(40)), Ok(true));
/// assert_eq!(assets.balance_of(usd, bob), Amount::new(40));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryAssets {
    books: Mutex<Books>,
}

impl InMemoryAssets {
    /// Creates an empty set of books.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` of `asset` to `holder`, saturating at `u128::MAX`.
    pub fn mint(&self, asset: AssetId, holder: Account, amount: Amount) {
        let mut books = self.books.lock();
        let next = books
            .balance(asset, holder)
            .get()
            .saturating_add(amount.get());
        books.balances.insert((asset, holder), Amount::new(next));
    }

    /// Balance of `holder` in `asset`.
    #[must_use]
    pub fn balance_of(&self, asset: AssetId, holder: Account) -> Amount {
        self.books.lock().balance(asset, holder)
    }

    /// Allowance `owner` granted to `spender` over `asset`.
    #[must_use]
    pub fn allowance(&self, asset: AssetId, owner: Account, spender: Account) -> Amount {
        self.books.lock().allowance(asset, owner, spender)
    }

    /// Changes how `asset` responds to subsequent calls.
    pub fn set_behavior(&self, asset: AssetId, behavior: AssetBehavior) {
        self.books.lock().behaviors.insert(asset, behavior);
    }
}

impl AssetTransfer for InMemoryAssets {
    fn transfer_from(
        &self,
        asset: AssetId,
        spender: Account,
        from: Account,
        to: Account,
        amount: Amount,
    ) -> Result<bool, TransferError> {
        let mut books = self.books.lock();
        if books.behavior(asset) == AssetBehavior::Falsy {
            return Ok(false);
        }
        let available = books.allowance(asset, from, spender);
        let remaining = available
            .checked_sub(&amount)
            .ok_or(TransferError::InsufficientAllowance {
                available,
                required: amount,
            })?;
        books.move_funds(asset, from, to, amount)?;
        books.allowances.insert((asset, from, spender), remaining);
        Ok(true)
    }

    fn transfer(
        &self,
        asset: AssetId,
        from: Account,
        to: Account,
        amount: Amount,
    ) -> Result<bool, TransferError> {
        let mut books = self.books.lock();
        if books.behavior(asset) == AssetBehavior::Falsy {
            return Ok(false);
        }
        books.move_funds(asset, from, to, amount)?;
        Ok(true)
    }

    fn approve(
        &self,
        asset: AssetId,
        owner: Account,
        spender: Account,
        amount: Amount,
    ) -> Result<bool, TransferError> {
        let mut books = self.books.lock();
        match books.behavior(asset) {
            AssetBehavior::Falsy => return Ok(false),
            AssetBehavior::RequireReset
                if !amount.is_zero() && !books.allowance(asset, owner, spender).is_zero() =>
            {
                return Ok(false);
            }
            _ => {}
        }
        books.allowances.insert((asset, owner, spender), amount);
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const A: AssetId = AssetId::from_index(1);
    const ALICE: Account = Account::from_index(1);
    const BOB: Account = Account::from_index(2);
    const CUSTODY: Account = Account::from_index(3);

    #[test]
    fn transfer_checks_balance() {
        let assets = InMemoryAssets::new();
        assets.mint(A, ALICE, Amount::new(10));
        let Err(TransferError::InsufficientBalance {
            available,
            required,
        }) = assets.transfer(A, ALICE, BOB, Amount::new(11))
        else {
            panic!("expected InsufficientBalance");
        };
        assert_eq!(available, Amount::new(10));
        assert_eq!(required, Amount::new(11));
        assert_eq!(assets.balance_of(A, ALICE), Amount::new(10));
    }

    #[test]
    fn transfer_from_spends_allowance() {
        let assets = InMemoryAssets::new();
        assets.mint(A, ALICE, Amount::new(100));
        assert_eq!(assets.approve(A, ALICE, CUSTODY, Amount::new(60)), Ok(true));
        assert_eq!(
            assets.transfer_from(A, CUSTODY, ALICE, CUSTODY, Amount::new(50)),
            Ok(true)
        );
        assert_eq!(assets.allowance(A, ALICE, CUSTODY), Amount::new(10));
        assert_eq!(assets.balance_of(A, CUSTODY), Amount::new(50));
    }

    #[test]
    fn failed_transfer_from_keeps_allowance() {
        let assets = InMemoryAssets::new();
        assets.mint(A, ALICE, Amount::new(5));
        assert_eq!(assets.approve(A, ALICE, CUSTODY, Amount::new(60)), Ok(true));
        let Err(TransferError::InsufficientBalance { .. }) =
            assets.transfer_from(A, CUSTODY, ALICE, CUSTODY, Amount::new(50))
        else {
            panic!("expected InsufficientBalance");
        };
        assert_eq!(assets.allowance(A, ALICE, CUSTODY), Amount::new(60));
    }

    #[test]
    fn self_transfer_is_noop() {
        let assets = InMemoryAssets::new();
        assets.mint(A, ALICE, Amount::new(5));
        assert_eq!(assets.transfer(A, ALICE, ALICE, Amount::new(5)), Ok(true));
        assert_eq!(assets.balance_of(A, ALICE), Amount::new(5));
    }

    #[test]
    fn falsy_asset_moves_nothing() {
        let assets = InMemoryAssets::new();
        assets.mint(A, ALICE, Amount::new(5));
        assets.set_behavior(A, AssetBehavior::Falsy);
        assert_eq!(assets.transfer(A, ALICE, BOB, Amount::new(5)), Ok(false));
        assert_eq!(assets.approve(A, ALICE, BOB, Amount::new(5)), Ok(false));
        assert_eq!(assets.balance_of(A, BOB), Amount::ZERO);
    }

    #[test]
    fn require_reset_refuses_nonzero_to_nonzero() {
        let assets = InMemoryAssets::new();
        assets.set_behavior(A, AssetBehavior::RequireReset);
        assert_eq!(assets.approve(A, ALICE, BOB, Amount::new(5)), Ok(true));
        assert_eq!(assets.approve(A, ALICE, BOB, Amount::new(7)), Ok(false));
        assert_eq!(assets.approve(A, ALICE, BOB, Amount::ZERO), Ok(true));
        assert_eq!(assets.approve(A, ALICE, BOB, Amount::new(7)), Ok(true));
    }
}
