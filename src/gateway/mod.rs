//! Asset custody boundary.
//!
//! The ledger owns no asset balances of its own.  It moves funds through an
//! [`AssetTransfer`] collaborator and holds pooled reserves under a single
//! custody [`Account`].  [`TransferGateway`] adapts a collaborator for the
//! ledger: it treats a `false` return exactly like an error and exposes the
//! three movements the engine needs ([`pull`](TransferGateway::pull),
//! [`push`](TransferGateway::push) and
//! [`force_approve`](TransferGateway::force_approve)).
//!
//! [`Settlement`] journals the transfers of one ledger operation so that a
//! failure half-way through can be compensated.

mod in_memory;
mod settlement;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Account, Amount, AssetId};

pub use in_memory::{AssetBehavior, InMemoryAssets};
pub(crate) use settlement::{Leg, Settlement};

/// Failure reported by an [`AssetTransfer`] collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The source account holds too little of the asset.
    #[error("insufficient balance: available {available}, required {required}")]
    InsufficientBalance {
        /// Balance held by the source.
        available: Amount,
        /// Amount requested.
        required: Amount,
    },

    /// The spender's allowance is too small.
    #[error("insufficient allowance: available {available}, required {required}")]
    InsufficientAllowance {
        /// Allowance granted to the spender.
        available: Amount,
        /// Amount requested.
        required: Amount,
    },

    /// The collaborator returned `false` instead of succeeding.
    #[error("asset returned false")]
    FalsyReturn,

    /// The recipient balance would overflow.
    #[error("recipient balance overflow")]
    BalanceOverflow,

    /// The collaborator rejected the call for its own reasons.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Fungible-asset operations consumed by the ledger.
///
/// Each method returns `Ok(true)` on success.  `Ok(false)` is a *falsy*
/// return: the call did not fail loudly but moved nothing, and the ledger
/// treats it as a failure.
///
/// Implementations may call back into the ledger (as a hostile asset
/// would); the ledger rejects such re-entrant mutations.
pub trait AssetTransfer: Send + Sync {
    /// Moves `amount` of `asset` from `from` to `to` using `spender`'s
    /// allowance.
    ///
    /// # Errors
    ///
    /// Any [`TransferError`] the collaborator reports.
    fn transfer_from(
        &self,
        asset: AssetId,
        spender: Account,
        from: Account,
        to: Account,
        amount: Amount,
    ) -> Result<bool, TransferError>;

    /// Moves `amount` of `asset` from `from` to `to` on `from`'s authority.
    ///
    /// # Errors
    ///
    /// Any [`TransferError`] the collaborator reports.
    fn transfer(
        &self,
        asset: AssetId,
        from: Account,
        to: Account,
        amount: Amount,
    ) -> Result<bool, TransferError>;

    /// Sets `spender`'s allowance over `owner`'s `asset` to `amount`.
    ///
    /// # Errors
    ///
    /// Any [`TransferError`] the collaborator reports.
    fn approve(
        &self,
        asset: AssetId,
        owner: Account,
        spender: Account,
        amount: Amount,
    ) -> Result<bool, TransferError>;
}

impl<T: AssetTransfer + ?Sized> AssetTransfer for Arc<T> {
    fn transfer_from(
        &self,
        asset: AssetId,
        spender: Account,
        from: Account,
        to: Account,
        amount: Amount,
    ) -> Result<bool, TransferError> {
        (**self).transfer_from(asset, spender, from, to, amount)
    }

    fn transfer(
        &self,
        asset: AssetId,
        from: Account,
        to: Account,
        amount: Amount,
    ) -> Result<bool, TransferError> {
        (**self).transfer(asset, from, to, amount)
    }

    fn approve(
        &self,
        asset: AssetId,
        owner: Account,
        spender: Account,
        amount: Amount,
    ) -> Result<bool, TransferError> {
        (**self).approve(asset, owner, spender, amount)
    }
}

/// Turns a collaborator's boolean return into a plain result.
fn succeeded(outcome: Result<bool, TransferError>) -> Result<(), TransferError> {
    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => Err(TransferError::FalsyReturn),
        Err(e) => Err(e),
    }
}

/// Ledger-side adapter over an [`AssetTransfer`] collaborator.
#[derive(Debug)]
pub struct TransferGateway<T> {
    inner: T,
    custody: Account,
}

impl<T: AssetTransfer> TransferGateway<T> {
    /// Wraps `inner`, holding pooled reserves under `custody`.
    #[must_use]
    pub const fn new(inner: T, custody: Account) -> Self {
        Self { inner, custody }
    }

    /// Account that holds pooled reserves.
    #[must_use]
    pub const fn custody(&self) -> Account {
        self.custody
    }

    /// The wrapped collaborator.
    #[must_use]
    pub const fn inner(&self) -> &T {
        &self.inner
    }

    /// Moves `amount` of `asset` from `from` into custody, spending the
    /// allowance `from` granted to the custody account.
    ///
    /// # Errors
    ///
    /// The collaborator's [`TransferError`], or
    /// [`TransferError::FalsyReturn`] on a `false` return.
    pub fn pull(&self, asset: AssetId, from: Account, amount: Amount) -> Result<(), TransferError> {
        let result = succeeded(self.inner.transfer_from(
            asset,
            self.custody,
            from,
            self.custody,
            amount,
        ));
        if let Err(ref e) = result {
            warn!(%asset, %from, %amount, error = %e, "pull failed");
        }
        result
    }

    /// Moves `amount` of `asset` out of custody to `to`.
    ///
    /// # Errors
    ///
    /// The collaborator's [`TransferError`], or
    /// [`TransferError::FalsyReturn`] on a `false` return.
    pub fn push(&self, asset: AssetId, to: Account, amount: Amount) -> Result<(), TransferError> {
        let result = succeeded(self.inner.transfer(asset, self.custody, to, amount));
        if let Err(ref e) = result {
            warn!(%asset, %to, %amount, error = %e, "push failed");
        }
        result
    }

    /// Pulls `amount` of `asset` from `holder` back into custody, spending
    /// the allowance `holder` granted to the custody account.  Only used to
    /// compensate a push of the same operation.
    pub(crate) fn reclaim(
        &self,
        asset: AssetId,
        holder: Account,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let result = succeeded(self.inner.transfer_from(
            asset,
            self.custody,
            holder,
            self.custody,
            amount,
        ));
        if let Err(ref e) = result {
            warn!(%asset, %holder, %amount, error = %e, "reclaim failed");
        }
        result
    }

    /// Sets an allowance, tolerating assets that refuse to change a
    /// non-zero allowance directly.
    ///
    /// Tries a plain `approve(amount)` first.  If that returns `false` or
    /// fails, resets the allowance to zero and approves `amount` again.
    ///
    /// # Errors
    ///
    /// The error of the fallback sequence if it also fails.
    pub fn force_approve(
        &self,
        asset: AssetId,
        owner: Account,
        spender: Account,
        amount: Amount,
    ) -> Result<(), TransferError> {
        match succeeded(self.inner.approve(asset, owner, spender, amount)) {
            Ok(()) => Ok(()),
            Err(first) => {
                debug!(%asset, %owner, %spender, error = %first, "approve refused, resetting to zero");
                succeeded(self.inner.approve(asset, owner, spender, Amount::ZERO))?;
                succeeded(self.inner.approve(asset, owner, spender, amount))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn asset() -> AssetId {
        AssetId::from_index(1)
    }

    fn alice() -> Account {
        Account::from_index(10)
    }

    fn custody() -> Account {
        Account::from_index(999)
    }

    fn funded() -> TransferGateway<InMemoryAssets> {
        let assets = InMemoryAssets::new();
        assets.mint(asset(), alice(), Amount::new(1_000));
        TransferGateway::new(assets, custody())
    }

    #[test]
    fn pull_requires_allowance() {
        let gw = funded();
        let Err(TransferError::InsufficientAllowance { .. }) =
            gw.pull(asset(), alice(), Amount::new(100))
        else {
            panic!("expected InsufficientAllowance");
        };
        let Ok(true) = gw.inner().approve(asset(), alice(), custody(), Amount::new(100)) else {
            panic!("approve");
        };
        assert!(gw.pull(asset(), alice(), Amount::new(100)).is_ok());
        assert_eq!(gw.inner().balance_of(asset(), custody()), Amount::new(100));
        assert_eq!(gw.inner().allowance(asset(), alice(), custody()), Amount::ZERO);
    }

    #[test]
    fn push_moves_out_of_custody() {
        let gw = funded();
        gw.inner().mint(asset(), custody(), Amount::new(50));
        assert!(gw.push(asset(), alice(), Amount::new(50)).is_ok());
        assert_eq!(gw.inner().balance_of(asset(), alice()), Amount::new(1_050));
        let Err(TransferError::InsufficientBalance { .. }) =
            gw.push(asset(), alice(), Amount::new(1))
        else {
            panic!("custody is empty");
        };
    }

    #[test]
    fn falsy_return_is_failure() {
        let gw = funded();
        gw.inner().set_behavior(asset(), AssetBehavior::Falsy);
        gw.inner().mint(asset(), custody(), Amount::new(50));
        assert_eq!(
            gw.push(asset(), alice(), Amount::new(50)),
            Err(TransferError::FalsyReturn)
        );
        assert_eq!(gw.inner().balance_of(asset(), custody()), Amount::new(50));
    }

    // -- force_approve -------------------------------------------------------

    #[test]
    fn force_approve_plain_path() {
        let gw = funded();
        assert!(gw
            .force_approve(asset(), alice(), custody(), Amount::new(10))
            .is_ok());
        assert_eq!(gw.inner().allowance(asset(), alice(), custody()), Amount::new(10));
    }

    #[test]
    fn force_approve_resets_sticky_allowance() {
        let gw = funded();
        gw.inner().set_behavior(asset(), AssetBehavior::RequireReset);
        assert!(gw
            .force_approve(asset(), alice(), custody(), Amount::new(10))
            .is_ok());
        // A second non-zero approve is refused directly; the fallback resets.
        assert!(gw
            .force_approve(asset(), alice(), custody(), Amount::new(25))
            .is_ok());
        assert_eq!(gw.inner().allowance(asset(), alice(), custody()), Amount::new(25));
    }

    #[test]
    fn force_approve_fails_on_falsy_asset() {
        let gw = funded();
        gw.inner().set_behavior(asset(), AssetBehavior::Falsy);
        assert_eq!(
            gw.force_approve(asset(), alice(), custody(), Amount::new(10)),
            Err(TransferError::FalsyReturn)
        );
    }
}
