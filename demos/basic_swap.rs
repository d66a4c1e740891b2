//! Two-provider pool walkthrough.
//!
//! Seeds a USD/EUR pool, adds a second provider, swaps in both directions,
//! reads prices and reserves, then withdraws everything.  Set `RUST_LOG`
//! to `debug` to see each rejected check as well.
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_swap
//! ```

use std::sync::Arc;

use swap_ledger::config::LedgerConfig;
use swap_ledger::domain::{
    Account, AddLiquidityRequest, Amount, AssetId, RemoveLiquidityRequest, SwapRequest, Timestamp,
};
use swap_ledger::exchange::Exchange;
use swap_ledger::gateway::{AssetTransfer, InMemoryAssets};
use swap_ledger::traits::ManualClock;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    // ── 1. Accounts, assets and balances ───────────────────────────────
    let custody = Account::from_index(1_000);
    let alice = Account::from_index(1);
    let bob = Account::from_index(2);
    let usd = AssetId::from_index(1);
    let eur = AssetId::from_index(2);

    let assets = Arc::new(InMemoryAssets::new());
    for who in [alice, bob] {
        for asset in [usd, eur] {
            assets.mint(asset, who, Amount::new(1_000_000));
            assets.approve(asset, who, custody, Amount::new(1_000_000))?;
        }
    }

    // ── 2. Exchange with configuration from the environment ────────────
    let config = LedgerConfig::from_env()?;
    let clock = ManualClock::new(Timestamp::from_secs(0));
    let ex = Exchange::new(Arc::clone(&assets), custody, clock, config);
    let deadline = Timestamp::from_secs(3_600);

    // ── 3. Alice bootstraps, Bob joins at the pool ratio ───────────────
    let deposit = |who, a: u128, b: u128| AddLiquidityRequest {
        token_a: usd,
        token_b: eur,
        amount_a_desired: Amount::new(a),
        amount_b_desired: Amount::new(b),
        amount_a_min: Amount::ZERO,
        amount_b_min: Amount::ZERO,
        to: who,
        deadline,
    };
    let (a, b, shares) = ex.add_liquidity(alice, &deposit(alice, 100_000, 80_000))?;
    println!("alice deposited {a} USD + {b} EUR for {shares} shares");
    let (a, b, shares) = ex.add_liquidity(bob, &deposit(bob, 10_000, 10_000))?;
    println!("bob deposited   {a} USD + {b} EUR for {shares} shares");

    let price = ex.get_price(usd, eur)?;
    println!("spot price USD→EUR: {price}");

    // ── 4. Swaps in both directions ────────────────────────────────────
    let (reserve_usd, reserve_eur) = ex.get_reserves(usd, eur)?;
    let quote = ex.get_amount_out(Amount::new(5_000), reserve_usd, reserve_eur)?;
    println!("quoted 5000 USD → {quote} EUR");

    let req = SwapRequest::single_hop(Amount::new(5_000), Amount::ZERO, usd, eur, bob, deadline);
    let [sold, bought] = ex.swap_exact_tokens_for_tokens(bob, &req)?;
    println!("bob swapped {sold} USD for {bought} EUR");

    let req = SwapRequest::single_hop(bought, Amount::ZERO, eur, usd, bob, deadline);
    let [sold, bought] = ex.swap_exact_tokens_for_tokens(bob, &req)?;
    println!("bob swapped {sold} EUR back for {bought} USD");

    let (reserve_usd, reserve_eur) = ex.get_reserves(usd, eur)?;
    println!("reserves: {reserve_usd} USD / {reserve_eur} EUR");

    // ── 5. Everyone leaves ─────────────────────────────────────────────
    for who in [alice, bob] {
        let liquidity = ex.get_liquidity(usd, eur, who)?;
        let (a, b) = ex.remove_liquidity(
            who,
            &RemoveLiquidityRequest {
                token_a: usd,
                token_b: eur,
                liquidity,
                amount_a_min: Amount::ZERO,
                amount_b_min: Amount::ZERO,
                to: who,
                deadline,
            },
        )?;
        println!("{who} withdrew {a} USD + {b} EUR");
    }

    // ── 6. Event log ───────────────────────────────────────────────────
    for event in ex.drain_events() {
        println!("  {event}");
    }
    Ok(())
}
