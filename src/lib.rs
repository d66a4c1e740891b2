//! # Swap Ledger
//!
//! A multi-pool constant-product exchange ledger: any two fungible assets
//! can be pooled, priced and traded against each other while each liquidity
//! provider's proportional claim on the pool is tracked exactly.
//!
//! - **Canonical pool keys**: a pair maps to the same pool whatever order
//!   the assets are named in.
//! - **Integer-exact pricing**: fee-less `x · y = k` with 256-bit
//!   intermediates; nothing is truncated silently.
//! - **Proportional shares**: square-root bootstrap, ratio-preserving
//!   deposits, pro-rata withdrawals.
//! - **Bounded reserves**: every reserve fits a configurable width
//!   (112 bits by default); an overflowing operation is rejected whole.
//! - **Guarded transitions**: deadlines, slippage floors, a per-pool
//!   re-entrancy guard, and compensation of partial transfers.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use swap_ledger::prelude::*;
//!
//! let custody = Account::from_index(1_000);
//! let lp = Account::from_index(1);
//! let (usdc, weth) = (AssetId::from_index(1), AssetId::from_index(2));
//!
//! let assets = Arc::new(InMemoryAssets::new());
//! for asset in [usdc, weth] {
//!     assets.mint(asset, lp, Amount::new(1_000_000));
//!     assets
//!         .approve(asset, lp, custody, Amount::new(1_000_000))
//!         .expect("in-memory approve");
//! }
//!
//! let clock = ManualClock::new(Timestamp::from_secs(1_700_000_000));
//! let exchange = Exchange::new(assets, custody, clock, LedgerConfig::default());
//! let deadline = Timestamp::from_secs(1_700_000_060);
//!
//! let (_, _, shares) = exchange
//!     .add_liquidity(lp, &AddLiquidityRequest {
//!         token_a: usdc,
//!         token_b: weth,
//!         amount_a_desired: Amount::new(200),
//!         amount_b_desired: Amount::new(200),
//!         amount_a_min: Amount::new(150),
//!         amount_b_min: Amount::new(150),
//!         to: lp,
//!         deadline,
//!     })
//!     .expect("bootstrap deposit");
//! assert_eq!(shares, Shares::new(200));
//!
//! let price = exchange.get_price(usdc, weth).expect("funded pool");
//! assert_eq!(price.to_u128(), Some(PRICE_SCALE));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │   Exchange    │  public operations, owns everything below
//! └──────┬───────┘
//!        │ EngineContext
//!        ▼
//! ┌──────────────┐     ┌─────────────────┐
//! │ Liquidity /   │────▶│ TransferGateway │──▶ AssetTransfer (collaborator)
//! │ SwapExecutor  │     └─────────────────┘
//! └──────┬───────┘
//!        │ pricing, PoolStore
//!        ▼
//! ┌──────────────┐
//! │    Domain     │  AssetId, PoolKey, Amount, Shares, Price, …
//! └──────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types, requests and events |
//! | [`engine`] | Pricing, [`LiquidityManager`](engine::LiquidityManager), [`SwapExecutor`](engine::SwapExecutor) |
//! | [`store`] | [`Pool`](store::Pool) state and the concurrent [`PoolStore`](store::PoolStore) |
//! | [`gateway`] | [`AssetTransfer`](gateway::AssetTransfer) boundary and in-memory assets |
//! | [`exchange`] | The [`Exchange`](exchange::Exchange) facade |
//! | [`config`] | [`LedgerConfig`](config::LedgerConfig) |
//! | [`traits`] | [`Clock`](traits::Clock) and its implementations |
//! | [`math`] | Checked and 256-bit arithmetic |
//! | [`error`] | [`LedgerError`](error::LedgerError) and failure codes |
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (rejections at `debug`, commits at
//! `info`, transfer failures at `warn`) and installs no subscriber.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod gateway;
pub mod math;
pub mod prelude;
pub mod store;
pub mod traits;
