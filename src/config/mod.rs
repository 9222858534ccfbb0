//! Declarative exchange configuration.
//!
//! [`ExchangeConfig`] carries the parameters every pool of a deployment
//! shares: swap fee, locked minimum shares, protocol fee share and the
//! reserve bound. It validates on construction and deserializes with
//! defaults for any omitted field, so hosts can load it from JSON, TOML
//! or any other serde format.

mod exchange;

pub use exchange::{ExchangeConfig, MAX_RESERVE_LIMIT};
