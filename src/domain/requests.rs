//! Caller requests for the three mutating ledger operations.
//!
//! Requests are plain data: they carry exactly the parameters of the public
//! operations, in the same order, and are validated by the component that
//! executes them.  Validation is deliberately *not* done at construction
//! because the failure precedence (deadline first, then assets, then
//! recipient, then amounts) is part of the operation's contract.

use serde::{Deserialize, Serialize};

use super::{Account, Amount, AssetId, Shares, Timestamp};

/// Parameters of `add_liquidity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityRequest {
    /// First asset of the pair, as named by the caller.
    pub token_a: AssetId,
    /// Second asset of the pair.
    pub token_b: AssetId,
    /// Upper bound on the amount of `token_a` to deposit.
    pub amount_a_desired: Amount,
    /// Upper bound on the amount of `token_b` to deposit.
    pub amount_b_desired: Amount,
    /// Slippage floor for `token_a`.
    pub amount_a_min: Amount,
    /// Slippage floor for `token_b`.
    pub amount_b_min: Amount,
    /// Account credited with the minted shares.
    pub to: Account,
    /// Last valid timestamp for the call.
    pub deadline: Timestamp,
}

/// Parameters of `remove_liquidity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityRequest {
    /// First asset of the pair, as named by the caller.
    pub token_a: AssetId,
    /// Second asset of the pair.
    pub token_b: AssetId,
    /// Shares to burn from the caller's balance.
    pub liquidity: Shares,
    /// Slippage floor for `token_a`.
    pub amount_a_min: Amount,
    /// Slippage floor for `token_b`.
    pub amount_b_min: Amount,
    /// Account receiving both withdrawn assets.
    pub to: Account,
    /// Last valid timestamp for the call.
    pub deadline: Timestamp,
}

/// Parameters of `swap_exact_tokens_for_tokens`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Exact amount of `path[0]` to sell.
    pub amount_in: Amount,
    /// Minimum acceptable amount of `path[1]`.
    pub amount_out_min: Amount,
    /// `[token_in, token_out]`; any other length is rejected.
    pub path: Vec<AssetId>,
    /// Account receiving the output.
    pub to: Account,
    /// Last valid timestamp for the call.
    pub deadline: Timestamp,
}

impl SwapRequest {
    /// Builds a single-hop request from `token_in` to `token_out`.
    #[must_use]
    pub fn single_hop(
        amount_in: Amount,
        amount_out_min: Amount,
        token_in: AssetId,
        token_out: AssetId,
        to: Account,
        deadline: Timestamp,
    ) -> Self {
        Self {
            amount_in,
            amount_out_min,
            path: vec![token_in, token_out],
            to,
            deadline,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn single_hop_builds_two_element_path() {
        let req = SwapRequest::single_hop(
            Amount::new(100),
            Amount::new(90),
            AssetId::from_index(1),
            AssetId::from_index(2),
            Account::from_index(7),
            Timestamp::from_secs(1_000),
        );
        assert_eq!(req.path, vec![AssetId::from_index(1), AssetId::from_index(2)]);
    }

    #[test]
    fn requests_deserialize_from_json() {
        let json = r#"{
            "token_a": [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1],
            "token_b": [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,2],
            "liquidity": 50,
            "amount_a_min": 1,
            "amount_b_min": 1,
            "to": [0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,9],
            "deadline": 1000
        }"#;
        let Ok(req) = serde_json::from_str::<RemoveLiquidityRequest>(json) else {
            panic!("valid request json");
        };
        assert_eq!(req.liquidity, Shares::new(50));
        assert_eq!(req.to, Account::from_index(9));
        assert_eq!(req.deadline, Timestamp::from_secs(1_000));
    }
}
