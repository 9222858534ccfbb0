//! Pool registry and protocol-fee settings of one exchange deployment.

use std::collections::HashMap;

use crate::config::ExchangeConfig;
use crate::domain::{Address, TokenPair};
use crate::error::AmmError;

/// Domain tag mixed into every pool address.
const POOL_ADDRESS_TAG: &str = "simswap.pool";

/// Address at which `factory` creates (or created) the pool for `pair`.
///
/// Depends only on its inputs, so routers and off-ledger tools can
/// compute it without looking anything up.
///
/// # Examples
///
/// ```
/// use simswap::domain::{Address, TokenPair};
/// use simswap::factory::pool_address;
///
/// let factory = Address::from_bytes([7u8; 32]);
/// let x = Address::from_bytes([1u8; 32]);
/// let y = Address::from_bytes([2u8; 32]);
/// let forward = TokenPair::new(x, y).expect("distinct");
/// let backward = TokenPair::new(y, x).expect("distinct");
/// assert_eq!(pool_address(factory, &forward), pool_address(factory, &backward));
/// ```
#[must_use]
pub fn pool_address(factory: Address, pair: &TokenPair) -> Address {
    Address::derive(
        POOL_ADDRESS_TAG,
        &[
            &factory.as_bytes(),
            &pair.token_a().as_bytes(),
            &pair.token_b().as_bytes(),
        ],
    )
}

/// Registry mapping each canonical token pair to its single pool.
///
/// Also owns the [`ExchangeConfig`] every pool reads, and the protocol
/// fee switch. Only the fee controller may change fee settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factory {
    address: Address,
    config: ExchangeConfig,
    fee_controller: Address,
    fee_recipient: Address,
    fee_on: bool,
    pools: HashMap<TokenPair, Address>,
    all_pools: Vec<Address>,
}

impl Factory {
    /// Creates an empty registry with the protocol fee off.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `config` fails
    /// validation.
    pub fn new(
        address: Address,
        fee_controller: Address,
        config: ExchangeConfig,
    ) -> Result<Self, AmmError> {
        config.validate()?;
        Ok(Self {
            address,
            config,
            fee_controller,
            fee_recipient: Address::ZERO,
            fee_on: false,
            pools: HashMap::new(),
            all_pools: Vec::new(),
        })
    }

    /// Address of the factory.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Parameters shared by every pool of this factory.
    #[must_use]
    pub const fn config(&self) -> ExchangeConfig {
        self.config
    }

    /// Account allowed to change fee settings.
    #[must_use]
    pub const fn fee_controller(&self) -> Address {
        self.fee_controller
    }

    /// Account that receives protocol fee shares while the fee is on.
    #[must_use]
    pub const fn fee_recipient(&self) -> Address {
        self.fee_recipient
    }

    /// Whether the protocol fee switch is on.
    #[must_use]
    pub const fn fee_on(&self) -> bool {
        self.fee_on
    }

    /// The recipient if the protocol fee is on and a recipient is set.
    #[must_use]
    pub fn fee_to(&self) -> Option<Address> {
        (self.fee_on && !self.fee_recipient.is_zero()).then_some(self.fee_recipient)
    }

    /// Pool trading `x` against `y`, in either order.
    #[must_use]
    pub fn pool(&self, x: Address, y: Address) -> Option<Address> {
        let pair = TokenPair::new(x, y).ok()?;
        self.pools.get(&pair).copied()
    }

    /// Every pool in creation order.
    #[must_use]
    pub fn all_pools(&self) -> &[Address] {
        &self.all_pools
    }

    /// Number of pools created.
    #[must_use]
    pub fn all_pools_len(&self) -> usize {
        self.all_pools.len()
    }

    /// Reserves the address for `pair` and records it.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolExists`] if `pair` already has a pool.
    pub(crate) fn register(&mut self, pair: TokenPair) -> Result<Address, AmmError> {
        if self.pools.contains_key(&pair) {
            return Err(AmmError::PoolExists);
        }
        let pool = pool_address(self.address, &pair);
        self.pools.insert(pair, pool);
        self.all_pools.push(pool);
        Ok(pool)
    }

    pub(crate) fn set_fee_recipient(
        &mut self,
        caller: Address,
        recipient: Address,
    ) -> Result<(), AmmError> {
        self.authorize(caller)?;
        self.fee_recipient = recipient;
        Ok(())
    }

    pub(crate) fn set_fee_on(&mut self, caller: Address, on: bool) -> Result<(), AmmError> {
        self.authorize(caller)?;
        self.fee_on = on;
        Ok(())
    }

    pub(crate) fn set_fee_controller(
        &mut self,
        caller: Address,
        controller: Address,
    ) -> Result<(), AmmError> {
        self.authorize(caller)?;
        self.fee_controller = controller;
        Ok(())
    }

    fn authorize(&self, caller: Address) -> Result<(), AmmError> {
        if caller == self.fee_controller {
            Ok(())
        } else {
            Err(AmmError::Forbidden)
        }
    }
}
