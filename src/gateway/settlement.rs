//! Transfer journal for a single ledger operation.

use tracing::error;

use super::{AssetTransfer, TransferGateway};
use crate::domain::{Account, Amount, AssetId};
use crate::error::{LedgerError, Result};

/// One completed transfer of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Leg {
    /// Pulled into custody from `from`.
    In {
        asset: AssetId,
        from: Account,
        amount: Amount,
    },
    /// Pushed out of custody to `to`.
    Out {
        asset: AssetId,
        to: Account,
        amount: Amount,
    },
}

/// Records the transfers an operation has completed so they can be
/// reversed if a later step fails.
///
/// Successful operations simply drop the settlement.  A failed one calls
/// [`unwind`](Settlement::unwind), which replays the journal backwards:
/// pulled funds are pushed back, pushed funds are pulled back through the
/// recipient's allowance to custody.
pub(crate) struct Settlement<'g, T> {
    gateway: &'g TransferGateway<T>,
    legs: Vec<Leg>,
}

impl<'g, T: AssetTransfer> Settlement<'g, T> {
    pub(crate) fn new(gateway: &'g TransferGateway<T>) -> Self {
        Self {
            gateway,
            legs: Vec::with_capacity(2),
        }
    }

    /// Pulls `amount` of `asset` from `from` into custody.
    pub(crate) fn pull(&mut self, asset: AssetId, from: Account, amount: Amount) -> Result<()> {
        self.gateway
            .pull(asset, from, amount)
            .map_err(|source| LedgerError::TransferFailed { asset, source })?;
        self.legs.push(Leg::In {
            asset,
            from,
            amount,
        });
        Ok(())
    }

    /// Pushes `amount` of `asset` from custody to `to`.
    pub(crate) fn push(&mut self, asset: AssetId, to: Account, amount: Amount) -> Result<()> {
        self.gateway
            .push(asset, to, amount)
            .map_err(|source| LedgerError::TransferFailed { asset, source })?;
        self.legs.push(Leg::Out { asset, to, amount });
        Ok(())
    }

    /// Reverses every recorded transfer, most recent first.
    ///
    /// Returns the legs whose compensating transfer failed, in the order
    /// they were attempted.  An empty result means custody holds exactly
    /// what it held before the operation.  A stranded `In` leg is still in
    /// custody; a stranded `Out` leg has left it for good.
    #[must_use]
    pub(crate) fn unwind(self) -> Vec<Leg> {
        let mut stranded = Vec::new();
        for leg in self.legs.into_iter().rev() {
            let outcome = match leg {
                Leg::In {
                    asset,
                    from,
                    amount,
                } => self.gateway.push(asset, from, amount),
                Leg::Out { asset, to, amount } => self.gateway.reclaim(asset, to, amount),
            };
            if let Err(e) = outcome {
                error!(?leg, error = %e, "failed to unwind transfer");
                stranded.push(leg);
            }
        }
        stranded
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::gateway::{AssetBehavior, InMemoryAssets};

    const A: AssetId = AssetId::from_index(1);
    const B: AssetId = AssetId::from_index(2);
    const ALICE: Account = Account::from_index(1);
    const CUSTODY: Account = Account::from_index(99);

    fn gateway() -> TransferGateway<InMemoryAssets> {
        let assets = InMemoryAssets::new();
        assets.mint(A, ALICE, Amount::new(100));
        assets.mint(B, ALICE, Amount::new(100));
        let Ok(true) = assets.approve(A, ALICE, CUSTODY, Amount::new(100)) else {
            panic!("approve A");
        };
        let Ok(true) = assets.approve(B, ALICE, CUSTODY, Amount::new(100)) else {
            panic!("approve B");
        };
        TransferGateway::new(assets, CUSTODY)
    }

    #[test]
    fn unwind_returns_pulled_funds() {
        let gw = gateway();
        gw.inner().set_behavior(B, AssetBehavior::Falsy);
        let mut settlement = Settlement::new(&gw);
        assert!(settlement.pull(A, ALICE, Amount::new(40)).is_ok());
        let Err(LedgerError::TransferFailed { asset, .. }) =
            settlement.pull(B, ALICE, Amount::new(40))
        else {
            panic!("falsy asset must fail");
        };
        assert_eq!(asset, B);
        assert!(settlement.unwind().is_empty());
        assert_eq!(gw.inner().balance_of(A, ALICE), Amount::new(100));
        assert_eq!(gw.inner().balance_of(A, CUSTODY), Amount::ZERO);
    }

    #[test]
    fn unwind_reclaims_pushed_funds() {
        let gw = gateway();
        gw.inner().mint(A, CUSTODY, Amount::new(30));
        let mut settlement = Settlement::new(&gw);
        assert!(settlement.push(A, ALICE, Amount::new(30)).is_ok());
        assert_eq!(gw.inner().balance_of(A, ALICE), Amount::new(130));
        assert!(settlement.unwind().is_empty());
        assert_eq!(gw.inner().balance_of(A, ALICE), Amount::new(100));
        assert_eq!(gw.inner().balance_of(A, CUSTODY), Amount::new(30));
        // The reclaim spent ALICE's allowance to custody.
        assert_eq!(gw.inner().allowance(A, ALICE, CUSTODY), Amount::new(70));
    }

    #[test]
    fn unwind_reports_unreclaimable_push() {
        let gw = gateway();
        let carol = Account::from_index(3);
        gw.inner().mint(A, CUSTODY, Amount::new(30));
        let mut settlement = Settlement::new(&gw);
        assert!(settlement.push(A, carol, Amount::new(30)).is_ok());
        // CAROL never approved custody, so the payout cannot be pulled back.
        let stranded = settlement.unwind();
        assert_eq!(
            stranded,
            vec![Leg::Out {
                asset: A,
                to: carol,
                amount: Amount::new(30),
            }]
        );
        assert_eq!(gw.inner().balance_of(A, carol), Amount::new(30));
        assert_eq!(gw.inner().balance_of(A, CUSTODY), Amount::ZERO);
    }
}
