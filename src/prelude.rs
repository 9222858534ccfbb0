//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use simswap::prelude::*;
//! ```

pub use crate::domain::{
    Address, Amount, BasisPoints, Event, FeeTier, Rounding, SwapPath, TokenPair,
};

pub use crate::traits::FlashSwapCallee;

pub use crate::config::ExchangeConfig;

pub use crate::error::{AmmError, Result};

pub use crate::factory::{pool_address, Factory};

pub use crate::ledger::Ledger;

pub use crate::pools::PoolState;

pub use crate::router::Router;
