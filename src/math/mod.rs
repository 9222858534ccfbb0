//! Pure arithmetic for the constant-product curve.
//!
//! The quoting functions and the invariant check every swap is validated
//! against, plus [`isqrt`] for share issuance. Nothing here touches state.

mod reserve_math;
mod sqrt;

pub use reserve_math::{
    amounts_in, amounts_out, check_invariant, mul_div, quote_equivalent, quote_input,
    quote_output, SwapSettlement,
};
pub use sqrt::isqrt;
