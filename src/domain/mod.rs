//! Fundamental value types used throughout the exchange.
//!
//! Addresses, amounts, fees, token pairs, swap routes and events. Every
//! type with an invariant validates it in its constructor, so a value
//! that exists is a value that is valid.

mod address;
mod amount;
mod basis_points;
mod event;
mod fee_tier;
mod rounding;
mod swap_path;
mod token_pair;

pub use address::Address;
pub use amount::Amount;
pub use basis_points::{BasisPoints, BPS_DENOMINATOR};
pub use event::Event;
pub use fee_tier::FeeTier;
pub use rounding::Rounding;
pub use swap_path::SwapPath;
pub use token_pair::{Side, TokenPair};
