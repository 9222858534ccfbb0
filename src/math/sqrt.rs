//! Integer square root.

use primitive_types::U256;

/// Floor square root via Newton's method.
///
/// Returns the largest `r` with `r * r <= n`. Used for first-mint shares
/// (`√(amount_a × amount_b)`) and for the protocol-fee growth of `√k`.
///
/// # Examples
///
/// ```
/// use primitive_types::U256;
/// use simswap::math::isqrt;
///
/// assert_eq!(isqrt(U256::from(4_000_000u64)), U256::from(2_000u64));
/// assert_eq!(isqrt(U256::from(15u8)), U256::from(3u8));
/// ```
#[must_use]
pub fn isqrt(n: U256) -> U256 {
    if n.is_zero() {
        return U256::zero();
    }
    // ceil(n / 2) without the `n + 1` overflow at U256::MAX
    let mut x = n;
    let mut y = (n >> 1) + (n & U256::one());
    while y < x {
        x = y;
        y = (x + n / x) >> 1;
    }
    x
}
