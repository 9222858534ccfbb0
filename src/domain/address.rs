//! Chain-agnostic account and contract address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A 32-byte address identifying an account, a token or a contract.
///
/// Tokens, pools, the factory, the router and user accounts all live in
/// the same address space. The all-zero address is the null identifier:
/// it is never a valid token, and it is the burn address that holds the
/// permanently locked minimum shares of every pool.
///
/// Ordering is lexicographic over the bytes, which is the canonical
/// ordering used for token pairs.
///
/// # Examples
///
/// ```
/// use simswap::domain::Address;
///
/// let addr = Address::from_bytes([1u8; 32]);
/// assert_eq!(addr.as_bytes(), [1u8; 32]);
/// assert!(!addr.is_zero());
/// assert!(Address::ZERO < addr);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Address([u8; 32]);

impl Address {
    /// The null / burn address.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns `true` for the null address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Derives an address from a domain tag and a list of byte strings.
    ///
    /// The result is the blake3 hash of the tag followed by every part,
    /// so equal inputs always give equal addresses and anyone can
    /// compute an address before the thing it names exists.
    #[must_use]
    pub fn derive(tag: &str, parts: &[&[u8]]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(tag.as_bytes());
        for part in parts {
            hasher.update(part);
        }
        Self(*hasher.finalize().as_bytes())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        f.write_str("…")
    }
}
