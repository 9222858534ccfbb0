//! Deterministic pool registry and protocol-fee governance.
//!
//! A [`Factory`] is deployed onto the [`Ledger`](crate::ledger::Ledger)
//! with an [`ExchangeConfig`](crate::config::ExchangeConfig) and a fee
//! controller. It creates at most one pool per unordered token pair, at
//! the address returned by [`pool_address`].
//!
//! ```
//! use simswap::config::ExchangeConfig;
//! use simswap::domain::{Amount, TokenPair};
//! use simswap::factory::pool_address;
//! use simswap::ledger::Ledger;
//!
//! let mut ledger = Ledger::new(0);
//! let admin = Ledger::account("admin");
//! let factory = ledger.deploy_factory(admin, ExchangeConfig::default()).expect("valid config");
//! let x = ledger.deploy_token(admin, Amount::new(1)).expect("token");
//! let y = ledger.deploy_token(admin, Amount::new(1)).expect("token");
//!
//! let pool = ledger.create_pool(factory, x, y).expect("new pair");
//! let pair = TokenPair::new(x, y).expect("distinct");
//! assert_eq!(pool, pool_address(factory, &pair));
//! ```

mod contract;
mod registry;

pub use registry::{pool_address, Factory};
