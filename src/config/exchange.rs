//! Exchange-wide parameters shared by the factory and every pool.

use serde::{Deserialize, Serialize};

use crate::domain::{Amount, FeeTier};
use crate::error::AmmError;

/// Largest reserve a pool may hold: `2^112 − 1`.
///
/// At this bound the fee-adjusted invariant product still fits in 256
/// bits.
pub const MAX_RESERVE_LIMIT: Amount = Amount::new((1u128 << 112) - 1);

/// Immutable parameters of one exchange deployment.
///
/// The configuration is owned by the [`Factory`](crate::factory::Factory)
/// and read by pools through the ledger; it is never copied into pool
/// state.
///
/// # Defaults
///
/// | Field | Default |
/// |-------|---------|
/// | `swap_fee` | 30 bp |
/// | `minimum_liquidity` | 1 000 shares |
/// | `protocol_fee_divisor` | 6 (one sixth of fee growth) |
/// | `max_reserve` | `2^112 − 1` |
///
/// # Examples
///
/// ```
/// use simswap::config::ExchangeConfig;
///
/// let cfg: ExchangeConfig = serde_json::from_str(r#"{ "swap_fee": 25 }"#).expect("json");
/// assert!(cfg.validate().is_ok());
/// assert_eq!(cfg.swap_fee().bps(), 25);
/// assert_eq!(cfg.minimum_liquidity().get(), 1_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExchangeConfig {
    swap_fee: FeeTier,
    minimum_liquidity: Amount,
    protocol_fee_divisor: u32,
    max_reserve: Amount,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            swap_fee: FeeTier::TIER_0_30_PERCENT,
            minimum_liquidity: Amount::new(1_000),
            protocol_fee_divisor: 6,
            max_reserve: MAX_RESERVE_LIMIT,
        }
    }
}

impl ExchangeConfig {
    /// Creates and validates a configuration.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn new(
        swap_fee: FeeTier,
        minimum_liquidity: Amount,
        protocol_fee_divisor: u32,
        max_reserve: Amount,
    ) -> Result<Self, AmmError> {
        let config = Self {
            swap_fee,
            minimum_liquidity,
            protocol_fee_divisor,
            max_reserve,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if
    /// - `minimum_liquidity` is zero,
    /// - `protocol_fee_divisor` is below 2,
    /// - `max_reserve` is zero, above [`MAX_RESERVE_LIMIT`], or not above
    ///   `minimum_liquidity`.
    pub fn validate(&self) -> Result<(), AmmError> {
        if self.minimum_liquidity.is_zero() {
            return Err(AmmError::InvalidConfiguration(
                "minimum liquidity must be non-zero",
            ));
        }
        if self.protocol_fee_divisor < 2 {
            return Err(AmmError::InvalidConfiguration(
                "protocol fee divisor must be at least 2",
            ));
        }
        if self.max_reserve > MAX_RESERVE_LIMIT {
            return Err(AmmError::InvalidConfiguration(
                "max reserve exceeds 2^112 - 1",
            ));
        }
        if self.max_reserve <= self.minimum_liquidity {
            return Err(AmmError::InvalidConfiguration(
                "max reserve must exceed minimum liquidity",
            ));
        }
        Ok(())
    }

    /// Fee charged on every swap input.
    #[must_use]
    pub const fn swap_fee(&self) -> FeeTier {
        self.swap_fee
    }

    /// Shares locked at the burn address on a pool's first mint.
    pub const fn minimum_liquidity(&self) -> Amount {
        self.minimum_liquidity
    }

    /// `d` such that the protocol receives `1/d` of fee growth when the
    /// protocol fee is on.
    #[must_use]
    pub const fn protocol_fee_divisor(&self) -> u32 {
        self.protocol_fee_divisor
    }

    /// Upper bound on each reserve.
    pub const fn max_reserve(&self) -> Amount {
        self.max_reserve
    }
}
