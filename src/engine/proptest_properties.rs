//! Property-based tests for ledger invariants.
//!
//! 1. **Key symmetry**: both orderings of a pair resolve to one pool.
//! 2. **Quote bounds**: output stays below the out-reserve and `k` never
//!    decreases.
//! 3. **Quote monotonicity**: more input never yields less output.
//! 4. **Sole-provider exit**: burning every share returns the reserves.
//! 5. **Share accounting**: outstanding shares equal the sum of balances.
//! 6. **Swap reversibility**: a round trip A→B→A returns ≤ original.

use alloy_primitives::U256;
use proptest::prelude::*;

use super::{quote_out, PRICE_SCALE};
use crate::config::LedgerConfig;
use crate::domain::{
    Account, AddLiquidityRequest, Amount, AssetId, PoolKey, RemoveLiquidityRequest, Shares,
    SwapRequest, Timestamp,
};
use crate::exchange::Exchange;
use crate::gateway::{AssetTransfer, InMemoryAssets};
use crate::traits::ManualClock;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const CUSTODY: Account = Account::from_index(900);
const ALICE: Account = Account::from_index(1);
const CAROL: Account = Account::from_index(2);
const TOKEN_A: AssetId = AssetId::from_index(1);
const TOKEN_B: AssetId = AssetId::from_index(2);
const FUNDS: u128 = 1u128 << 100;

type TestExchange = Exchange<InMemoryAssets, ManualClock>;

fn deadline() -> Timestamp {
    Timestamp::from_secs(60)
}

fn exchange() -> TestExchange {
    let assets = InMemoryAssets::new();
    for who in [ALICE, CAROL] {
        for token in [TOKEN_A, TOKEN_B] {
            assets.mint(token, who, Amount::new(FUNDS));
            let Ok(true) = assets.approve(token, who, CUSTODY, Amount::new(FUNDS)) else {
                panic!("in-memory approve");
            };
        }
    }
    Exchange::new(
        assets,
        CUSTODY,
        ManualClock::new(Timestamp::from_secs(0)),
        LedgerConfig::default(),
    )
}

fn deposit(ex: &TestExchange, who: Account, a: u128, b: u128) -> (Amount, Amount, Shares) {
    let req = AddLiquidityRequest {
        token_a: TOKEN_A,
        token_b: TOKEN_B,
        amount_a_desired: Amount::new(a),
        amount_b_desired: Amount::new(b),
        amount_a_min: Amount::ZERO,
        amount_b_min: Amount::ZERO,
        to: who,
        deadline: deadline(),
    };
    let Ok(result) = ex.add_liquidity(who, &req) else {
        panic!("deposit of ({a}, {b}) should succeed");
    };
    result
}

fn withdraw(ex: &TestExchange, who: Account, shares: Shares) -> (Amount, Amount) {
    let req = RemoveLiquidityRequest {
        token_a: TOKEN_A,
        token_b: TOKEN_B,
        liquidity: shares,
        amount_a_min: Amount::ZERO,
        amount_b_min: Amount::ZERO,
        to: who,
        deadline: deadline(),
    };
    let Ok(result) = ex.remove_liquidity(who, &req) else {
        panic!("withdrawal of {shares} shares should succeed");
    };
    result
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserve values in [1_000, 10^15], well inside the 112-bit bound.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000u128..=1_000_000_000_000_000u128
}

fn asset_index_strategy() -> impl Strategy<Value = u64> {
    1u64..=10_000u64
}

// ---------------------------------------------------------------------------
// Property 1: Key symmetry
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_pool_key_is_order_independent(
        x in asset_index_strategy(),
        y in asset_index_strategy(),
    ) {
        prop_assume!(x != y);
        let (a, b) = (AssetId::from_index(x), AssetId::from_index(y));
        let Ok(forward) = PoolKey::resolve(a, b) else {
            panic!("distinct non-null assets resolve");
        };
        prop_assert_eq!(PoolKey::resolve(b, a), Ok(forward));
        prop_assert!(forward.low() < forward.high());
        prop_assert!(forward.contains(&a) && forward.contains(&b));
    }
}

// ---------------------------------------------------------------------------
// Property 2 and 3: Quote bounds and monotonicity
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_quote_keeps_k_non_decreasing(
        amount_in in 1u128..=1_000_000_000_000_000_000u128,
        reserve_in in reserve_strategy(),
        reserve_out in reserve_strategy(),
    ) {
        let Ok(out) = quote_out(
            Amount::new(amount_in),
            Amount::new(reserve_in),
            Amount::new(reserve_out),
        ) else {
            panic!("non-zero inputs always quote");
        };
        prop_assert!(out.get() < reserve_out, "output {} drains reserve {}", out, reserve_out);

        let k_before = U256::from(reserve_in) * U256::from(reserve_out);
        let k_after = (U256::from(reserve_in) + U256::from(amount_in))
            * U256::from(reserve_out - out.get());
        prop_assert!(k_after >= k_before);
    }

    #[test]
    fn prop_quote_is_monotone_in_input(
        amount_in in 1u128..=1_000_000_000_000u128,
        extra in 0u128..=1_000_000_000u128,
        reserve_in in reserve_strategy(),
        reserve_out in reserve_strategy(),
    ) {
        let (r_in, r_out) = (Amount::new(reserve_in), Amount::new(reserve_out));
        let Ok(small) = quote_out(Amount::new(amount_in), r_in, r_out) else {
            panic!("quote");
        };
        let Ok(large) = quote_out(Amount::new(amount_in + extra), r_in, r_out) else {
            panic!("quote");
        };
        prop_assert!(small <= large);
    }
}

// ---------------------------------------------------------------------------
// Property 4 and 5: Liquidity accounting
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_sole_provider_exits_with_reserves(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
    ) {
        let ex = exchange();
        let (_, _, shares) = deposit(&ex, ALICE, ra, rb);
        let (out_a, out_b) = withdraw(&ex, ALICE, shares);

        prop_assert_eq!((out_a.get(), out_b.get()), (ra, rb));
        prop_assert_eq!(ex.get_reserves(TOKEN_A, TOKEN_B), Ok((Amount::ZERO, Amount::ZERO)));
        prop_assert_eq!(ex.gateway().inner().balance_of(TOKEN_A, CUSTODY), Amount::ZERO);
    }

    #[test]
    fn prop_outstanding_shares_match_balances(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        xa in reserve_strategy(),
        xb in reserve_strategy(),
    ) {
        let ex = exchange();
        deposit(&ex, ALICE, ra, rb);
        let Ok(before) = ex.pool_snapshot(TOKEN_A, TOKEN_B) else {
            panic!("pool exists");
        };
        let total_before = before.total_shares.get();
        let req = AddLiquidityRequest {
            token_a: TOKEN_A,
            token_b: TOKEN_B,
            amount_a_desired: Amount::new(xa),
            amount_b_desired: Amount::new(xb),
            amount_a_min: Amount::ZERO,
            amount_b_min: Amount::ZERO,
            to: CAROL,
            deadline: deadline(),
        };
        // Lopsided deposits can trim to a zero-share mint.
        let Ok((paid_a, paid_b, minted)) = ex.add_liquidity(CAROL, &req) else {
            return Ok(());
        };

        let Ok(snapshot) = ex.pool_snapshot(TOKEN_A, TOKEN_B) else {
            panic!("pool exists");
        };
        let Ok(alice) = ex.get_liquidity(TOKEN_A, TOKEN_B, ALICE) else {
            panic!("pool exists");
        };
        let Ok(carol) = ex.get_liquidity(TOKEN_A, TOKEN_B, CAROL) else {
            panic!("pool exists");
        };
        prop_assert_eq!(carol, minted);
        prop_assert_eq!(alice.get() + carol.get(), snapshot.total_shares.get());

        // A later provider never withdraws more than it paid in.
        let (back_a, back_b) = withdraw(&ex, CAROL, minted);
        prop_assert!(back_a <= paid_a && back_b <= paid_b);

        // Add then remove of the minted shares restores the supply exactly
        // and the reserves up to floor-rounding dust left in the pool.
        let Ok(after) = ex.pool_snapshot(TOKEN_A, TOKEN_B) else {
            panic!("pool exists");
        };
        prop_assert_eq!(after.total_shares.get(), total_before);
        let Ok((after_a, after_b)) = ex.get_reserves(TOKEN_A, TOKEN_B) else {
            panic!("pool exists");
        };
        prop_assert!(after_a.get() >= ra && after_b.get() >= rb);
        // Under one unit of the other asset plus one share, converted.
        let dust_a = ra / rb + ra / total_before + 3;
        let dust_b = rb / ra + rb / total_before + 3;
        prop_assert!(after_a.get() - ra <= dust_a, "A dust {} > {}", after_a.get() - ra, dust_a);
        prop_assert!(after_b.get() - rb <= dust_b, "B dust {} > {}", after_b.get() - rb, dust_b);
    }
}

// ---------------------------------------------------------------------------
// Property 6: Swap reversibility
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_swap_round_trip_loses_value(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        divisor in 10u128..=1_000u128,
    ) {
        let ex = exchange();
        deposit(&ex, ALICE, ra, rb);
        let swap_in = (ra / divisor).max(1);

        let there = SwapRequest::single_hop(
            Amount::new(swap_in), Amount::ZERO, TOKEN_A, TOKEN_B, CAROL, deadline(),
        );
        let Ok([_, received]) = ex.swap_exact_tokens_for_tokens(CAROL, &there) else {
            return Ok(());
        };
        let back = SwapRequest::single_hop(
            received, Amount::ZERO, TOKEN_B, TOKEN_A, CAROL, deadline(),
        );
        let Ok([_, final_a]) = ex.swap_exact_tokens_for_tokens(CAROL, &back) else {
            return Ok(());
        };
        prop_assert!(
            final_a.get() <= swap_in,
            "round-trip should lose value: final={} > original={}",
            final_a, swap_in
        );
    }

    #[test]
    fn prop_price_tracks_reserve_ratio(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
    ) {
        let ex = exchange();
        deposit(&ex, ALICE, ra, rb);
        let Ok(price) = ex.get_price(TOKEN_A, TOKEN_B) else {
            panic!("funded pool has a price");
        };
        let expected = U256::from(rb) * U256::from(PRICE_SCALE) / U256::from(ra);
        prop_assert_eq!(price.raw(), expected);
    }
}
