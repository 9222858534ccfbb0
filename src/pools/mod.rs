//! Constant-product pools hosted on the [`Ledger`](crate::ledger::Ledger).
//!
//! A pool holds two tokens and issues shares (its own address is the
//! share token). State lives in [`PoolState`]; the operations that move
//! tokens (`mint`, `burn`, `swap`, `skim`, `sync`) are methods on the
//! ledger because they need to read and move balances while holding the
//! pool's lock.
//!
//! | Operation | Input taken from | Output |
//! |-----------|------------------|--------|
//! | `mint` | tokens sent to the pool beforehand | shares to `to` |
//! | `burn` | shares sent to the pool beforehand | both tokens to `to` |
//! | `swap` | tokens sent beforehand or during the flash callback | requested outputs to `to` |
//! | `skim` | balance above reserves | excess to `to` |
//! | `sync` | balance above reserves | reserves raised to balances |

pub mod oracle;
mod operations;
mod protocol_fee;
mod state;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use state::PoolState;
