//! Canonically ordered pair of distinct token addresses.

use serde::{Deserialize, Serialize};

use super::Address;
use crate::error::AmmError;

/// Two distinct, non-null tokens sorted by address.
///
/// `(x, y)` and `(y, x)` build the same pair, so a pair is a valid key
/// for "the one pool that trades these two assets". The lower address is
/// token A, the higher one token B.
///
/// # Examples
///
/// ```
/// use simswap::domain::{Address, TokenPair};
///
/// let x = Address::from_bytes([2u8; 32]);
/// let y = Address::from_bytes([1u8; 32]);
/// let pair = TokenPair::new(x, y).expect("distinct tokens");
/// assert_eq!(pair.token_a(), y);
/// assert_eq!(pair.token_b(), x);
/// assert_eq!(pair, TokenPair::new(y, x).expect("distinct tokens"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenPair {
    token_a: Address,
    token_b: Address,
}

/// Which side of a pair a token sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The lower-address token.
    A,
    /// The higher-address token.
    B,
}

impl TokenPair {
    /// Sorts two tokens into a pair.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAddresses`] if `x == y`.
    /// - [`AmmError::ZeroAddress`] if either token is the null address.
    pub fn new(x: Address, y: Address) -> Result<Self, AmmError> {
        if x == y {
            return Err(AmmError::IdenticalAddresses);
        }
        let (token_a, token_b) = if x < y { (x, y) } else { (y, x) };
        if token_a.is_zero() {
            return Err(AmmError::ZeroAddress);
        }
        Ok(Self { token_a, token_b })
    }

    /// Lower-address token.
    #[must_use]
    pub const fn token_a(&self) -> Address {
        self.token_a
    }

    /// Higher-address token.
    #[must_use]
    pub const fn token_b(&self) -> Address {
        self.token_b
    }

    /// Returns `true` if `token` is one of the two.
    #[must_use]
    pub fn contains(&self, token: &Address) -> bool {
        self.token_a == *token || self.token_b == *token
    }

    /// Locates `token` in the pair.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPath`] if `token` is not in the pair.
    pub fn side_of(&self, token: &Address) -> Result<Side, AmmError> {
        if *token == self.token_a {
            Ok(Side::A)
        } else if *token == self.token_b {
            Ok(Side::B)
        } else {
            Err(AmmError::InvalidPath)
        }
    }

    /// Returns the token on `side`.
    #[must_use]
    pub const fn token(&self, side: Side) -> Address {
        match side {
            Side::A => self.token_a,
            Side::B => self.token_b,
        }
    }

    /// Reorders a per-side tuple so that it follows `(first, other)`
    /// instead of `(A, B)`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPath`] if `first` is not in the pair.
    pub fn oriented<T>(&self, first: &Address, values: (T, T)) -> Result<(T, T), AmmError> {
        match self.side_of(first)? {
            Side::A => Ok(values),
            Side::B => Ok((values.1, values.0)),
        }
    }
}

impl Side {
    /// The opposite side.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}
