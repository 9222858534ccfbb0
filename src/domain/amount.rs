//! Raw token amount with checked arithmetic.

use core::fmt;

use primitive_types::U256;
use serde::{Deserialize, Serialize};

use super::Rounding;
use crate::error::AmmError;

/// A raw token quantity in the token's smallest unit.
///
/// Every `u128` is a valid amount. Arithmetic is checked and returns
/// `None` instead of wrapping; products that can exceed 128 bits go
/// through [`Amount::widen`] and are narrowed back with
/// [`Amount::narrow`].
///
/// # Examples
///
/// ```
/// use simswap::domain::{Amount, Rounding};
///
/// let a = Amount::new(10);
/// assert_eq!(a.checked_add(&Amount::new(5)), Some(Amount::new(15)));
/// assert_eq!(a.checked_div(&Amount::new(3), Rounding::Up), Some(Amount::new(4)));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[must_use]
pub struct Amount(u128);

impl Amount {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Largest representable amount.
    pub const MAX: Self = Self(u128::MAX);

    /// Wraps a raw `u128`.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Subtraction clamped at zero.
    pub const fn saturating_sub(&self, other: &Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Checked division with an explicit rounding direction.
    ///
    /// Returns `None` if `divisor` is zero.
    #[must_use]
    pub const fn checked_div(&self, divisor: &Self, rounding: Rounding) -> Option<Self> {
        if divisor.0 == 0 {
            return None;
        }
        let q = self.0 / divisor.0;
        match rounding {
            Rounding::Up if self.0 % divisor.0 != 0 => Some(Self(q + 1)),
            _ => Some(Self(q)),
        }
    }

    /// Returns the smaller of two amounts.
    pub fn min(self, other: Self) -> Self {
        if self <= other {
            self
        } else {
            other
        }
    }

    /// Lifts the amount into 256-bit space for overflow-free products.
    #[must_use]
    pub fn widen(&self) -> U256 {
        U256::from(self.0)
    }

    /// Narrows a 256-bit intermediate back to an amount.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] tagged with `context` if `value`
    /// does not fit in 128 bits.
    pub fn narrow(value: U256, context: &'static str) -> Result<Self, AmmError> {
        if value.bits() > 128 {
            return Err(AmmError::Overflow(context));
        }
        Ok(Self(value.low_u128()))
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
