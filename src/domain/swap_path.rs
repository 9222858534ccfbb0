//! Validated multi-hop swap route.

use super::Address;
use crate::error::AmmError;

/// An ordered route of at least two tokens.
///
/// Each consecutive pair of tokens is one hop through the pool that
/// trades them. Consecutive duplicates are rejected because such a hop
/// has no pool.
///
/// # Examples
///
/// ```
/// use simswap::domain::{Address, SwapPath};
///
/// let t0 = Address::from_bytes([1u8; 32]);
/// let t1 = Address::from_bytes([2u8; 32]);
/// let t2 = Address::from_bytes([3u8; 32]);
/// let path = SwapPath::new(vec![t0, t1, t2]).expect("valid route");
/// assert_eq!(path.hop_count(), 2);
/// assert_eq!(path.hops().collect::<Vec<_>>(), vec![(t0, t1), (t1, t2)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SwapPath(Vec<Address>);

impl SwapPath {
    /// Validates a route.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidPath`] if the route has fewer than two
    /// tokens, or repeats a token in adjacent positions, and
    /// [`AmmError::ZeroAddress`] if it contains the null address.
    pub fn new(tokens: Vec<Address>) -> Result<Self, AmmError> {
        if tokens.len() < 2 {
            return Err(AmmError::InvalidPath);
        }
        if tokens.iter().any(Address::is_zero) {
            return Err(AmmError::ZeroAddress);
        }
        if tokens.windows(2).any(|w| w[0] == w[1]) {
            return Err(AmmError::InvalidPath);
        }
        Ok(Self(tokens))
    }

    /// All tokens in route order.
    #[must_use]
    pub fn tokens(&self) -> &[Address] {
        &self.0
    }

    /// Number of tokens (hops + 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A validated path is never empty; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of pools crossed.
    #[must_use]
    pub fn hop_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Token sold into the first hop.
    #[must_use]
    pub fn first(&self) -> Address {
        self.0[0]
    }

    /// Token bought out of the last hop.
    #[must_use]
    pub fn last(&self) -> Address {
        self.0[self.0.len() - 1]
    }

    /// `(token_in, token_out)` for every hop, in route order.
    pub fn hops(&self) -> impl DoubleEndedIterator<Item = (Address, Address)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }
}

impl TryFrom<Vec<Address>> for SwapPath {
    type Error = AmmError;

    fn try_from(tokens: Vec<Address>) -> Result<Self, Self::Error> {
        Self::new(tokens)
    }
}
