//! Trait seams between the pools and code outside the crate.
//!
//! [`FlashSwapCallee`] is the callback a pool invokes in the middle of a
//! flash swap, after paying out and before validating the invariant.

mod flash_swap_callee;

pub use flash_swap_callee::FlashSwapCallee;
