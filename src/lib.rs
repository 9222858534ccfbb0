//! # Simswap
//!
//! A constant-product automated market maker running on a simulated
//! ledger host.
//!
//! The crate models a complete two-asset exchange deployment: a
//! [`Ledger`](ledger::Ledger) holding fungible tokens, native value and
//! every contract's state; a [factory](factory) that registers one pool
//! per token pair at a deterministic address; [pools](pools) that keep
//! `reserve_a * reserve_b` from shrinking across swaps while issuing
//! proportional shares to liquidity providers; and a [`Router`](router::Router)
//! that turns user intents into multi-hop pool calls with slippage and
//! deadline protection.
//!
//! # Quick Start
//!
//! ```rust
//! use simswap::prelude::*;
//!
//! let mut ledger = Ledger::new(1_000);
//! let alice = Ledger::account("alice");
//!
//! // 1. Deploy the exchange
//! let factory = ledger
//!     .deploy_factory(alice, ExchangeConfig::default())
//!     .expect("default config is valid");
//! let weth = ledger.deploy_wrapped_native();
//! let router = Router::deploy(&mut ledger, factory, weth).expect("router");
//!
//! // 2. Two tokens, approved for the router
//! let usdc = ledger.deploy_token(alice, Amount::new(1_000_000_000)).expect("token");
//! let dai = ledger.deploy_token(alice, Amount::new(1_000_000_000)).expect("token");
//! ledger.approve(usdc, alice, router.address(), Amount::MAX);
//! ledger.approve(dai, alice, router.address(), Amount::MAX);
//!
//! // 3. Provide liquidity (creates the pool)
//! let deadline = ledger.now();
//! let (_, _, shares) = router
//!     .add_liquidity(
//!         &mut ledger, alice, usdc, dai,
//!         Amount::new(1_000_000), Amount::new(1_000_000),
//!         Amount::ZERO, Amount::ZERO, alice, deadline,
//!     )
//!     .expect("liquidity added");
//! assert_eq!(shares, Amount::new(999_000));
//!
//! // 4. Swap
//! let path = SwapPath::new(vec![usdc, dai]).expect("valid path");
//! let amounts = router
//!     .swap_exact_tokens_for_tokens(
//!         &mut ledger, alice, Amount::new(10_000), Amount::new(9_800),
//!         &path, alice, deadline,
//!     )
//!     .expect("swap");
//! assert_eq!(amounts[1], Amount::new(9_871));
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   transfer_from / swap per hop
//! │  Router  │ ─────────────────────────────┐
//! └────┬─────┘                              │
//!      │ quotes (math)                      ▼
//!      │                            ┌──────────────┐
//!      │ create_pool                │    Pools     │ mint / burn / swap
//!      ▼                            │ (PoolState)  │ skim / sync / oracle
//! ┌──────────┐  registers           └──────┬───────┘
//! │ Factory  │ ────────────────────────────┘
//! └────┬─────┘
//!      ▼
//! ┌──────────────────────────────────────────────┐
//! │ Ledger: tokens, native value, events, clock  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Address`](domain::Address), [`Amount`](domain::Amount), [`TokenPair`](domain::TokenPair), [`SwapPath`](domain::SwapPath), [`Event`](domain::Event) |
//! | [`math`] | Reserve math: quotes, chained quotes, invariant check, integer square root |
//! | [`config`] | [`ExchangeConfig`](config::ExchangeConfig) shared by every pool of a factory |
//! | [`ledger`] | Simulated host: balances, allowances, native value, event log, atomic calls |
//! | [`pools`] | Pool state and operations, price oracle, protocol fee |
//! | [`factory`] | Pool registry, deterministic pool addresses, fee governance |
//! | [`router`] | User-facing swaps and liquidity management |
//! | [`traits`] | [`FlashSwapCallee`](traits::FlashSwapCallee) for optimistic transfers |
//! | [`error`] | [`AmmError`](error::AmmError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |

pub mod config;
pub mod domain;
pub mod error;
pub mod factory;
pub mod ledger;
pub mod math;
pub mod pools;
pub mod prelude;
pub mod router;
pub mod traits;
