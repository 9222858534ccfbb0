//! Swap fee tiers built on [`BasisPoints`].

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{BasisPoints, BPS_DENOMINATOR};
use crate::error::AmmError;

/// The proportional fee charged on swap inputs.
///
/// A fee tier must be strictly below 100%, otherwise no input would ever
/// reach the pricing curve. The canonical tier is
/// [`TIER_0_30_PERCENT`](Self::TIER_0_30_PERCENT).
///
/// # Examples
///
/// ```
/// use simswap::domain::{BasisPoints, FeeTier};
///
/// let tier = FeeTier::new(BasisPoints::new(30)).expect("below 100%");
/// assert_eq!(tier, FeeTier::TIER_0_30_PERCENT);
/// assert_eq!(tier.retained(), 9_970);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "BasisPoints", into = "BasisPoints")]
pub struct FeeTier(BasisPoints);

impl FeeTier {
    /// No fee.
    pub const ZERO: Self = Self(BasisPoints::ZERO);

    /// 0.05%, for stable pairs.
    pub const TIER_0_05_PERCENT: Self = Self(BasisPoints::new(5));

    /// 0.30%, the standard constant-product fee.
    pub const TIER_0_30_PERCENT: Self = Self(BasisPoints::new(30));

    /// 1.00%, for exotic pairs.
    pub const TIER_1_00_PERCENT: Self = Self(BasisPoints::new(100));

    /// Creates a fee tier.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if the fee is 100% or more.
    pub const fn new(basis_points: BasisPoints) -> Result<Self, AmmError> {
        if basis_points.get() >= BPS_DENOMINATOR {
            return Err(AmmError::InvalidConfiguration(
                "swap fee must be below 100%",
            ));
        }
        Ok(Self(basis_points))
    }

    /// Returns the fee in basis points.
    #[must_use]
    pub const fn basis_points(&self) -> BasisPoints {
        self.0
    }

    /// Returns the fee numerator as a `u32` (`30` for 0.30%).
    #[must_use]
    pub const fn bps(&self) -> u32 {
        self.0.get()
    }

    /// Returns the share of the input that reaches the curve, in basis
    /// points (`9_970` for a 0.30% fee).
    #[must_use]
    pub const fn retained(&self) -> u32 {
        BPS_DENOMINATOR - self.0.get()
    }
}

impl Default for FeeTier {
    fn default() -> Self {
        Self::TIER_0_30_PERCENT
    }
}

impl TryFrom<BasisPoints> for FeeTier {
    type Error = AmmError;

    fn try_from(value: BasisPoints) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FeeTier> for BasisPoints {
    fn from(value: FeeTier) -> Self {
        value.0
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeeTier({})", self.0)
    }
}
