//! Time-weighted average price accumulators.
//!
//! Each pool keeps two running sums of `price × seconds`, one per
//! direction, encoded as UQ112.112 fixed point (112 integer bits, 112
//! fractional bits). A consumer samples a cumulative at two points in
//! time and divides the difference by the elapsed seconds to get the
//! average price over that window. The sums are updated with the
//! reserves as they stood *before* each call, at most once per distinct
//! timestamp, which makes the average expensive to move within a single
//! block.
//!
//! Sums wrap modulo `2^256`; differences are taken with wrapping
//! subtraction, so a single wrap between two samples is harmless.

use primitive_types::U256;

use crate::domain::Amount;
use crate::error::AmmError;

/// Number of fractional bits in a UQ112.112 value.
pub const RESOLUTION: usize = 112;

/// `numerator / denominator` as UQ112.112, or zero if `denominator` is
/// zero.
///
/// # Examples
///
/// ```
/// use primitive_types::U256;
/// use simswap::domain::Amount;
/// use simswap::pools::oracle::{encode_price, RESOLUTION};
///
/// let p = encode_price(Amount::new(3), Amount::new(2));
/// assert_eq!(p, (U256::from(3u8) << RESOLUTION) / U256::from(2u8));
/// ```
#[must_use]
pub fn encode_price(numerator: Amount, denominator: Amount) -> U256 {
    if denominator.is_zero() {
        return U256::zero();
    }
    (numerator.widen() << RESOLUTION) / denominator.widen()
}

pub(crate) fn accumulate(
    cumulative: U256,
    numerator: Amount,
    denominator: Amount,
    elapsed: u64,
) -> U256 {
    let (weighted, _) = encode_price(numerator, denominator).overflowing_mul(U256::from(elapsed));
    let (sum, _) = cumulative.overflowing_add(weighted);
    sum
}

/// Average UQ112.112 price between two samples of the same cumulative.
///
/// Returns `None` if `elapsed` is zero.
#[must_use]
pub fn average_price(start: U256, end: U256, elapsed: u64) -> Option<U256> {
    if elapsed == 0 {
        return None;
    }
    let (delta, _) = end.overflowing_sub(start);
    Some(delta / U256::from(elapsed))
}

/// Applies a UQ112.112 price to `amount`, rounding down.
///
/// # Errors
///
/// Returns [`AmmError::Overflow`] if the product exceeds 256 bits or the
/// result does not fit in an [`Amount`].
pub fn apply_price(price: U256, amount: Amount) -> Result<Amount, AmmError> {
    let product = price
        .checked_mul(amount.widen())
        .ok_or(AmmError::Overflow("oracle price product"))?;
    Amount::narrow(product >> RESOLUTION, "oracle quote")
}
