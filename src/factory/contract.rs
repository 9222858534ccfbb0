//! Ledger entry points of the factory.

use tracing::info;

use super::Factory;
use crate::config::ExchangeConfig;
use crate::domain::{Address, Event, TokenPair};
use crate::error::AmmError;
use crate::ledger::Ledger;
use crate::pools::PoolState;

impl Ledger {
    /// Deploys a factory governed by `fee_controller`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidConfiguration`] if `config` is invalid.
    pub fn deploy_factory(
        &mut self,
        fee_controller: Address,
        config: ExchangeConfig,
    ) -> Result<Address, AmmError> {
        let address = self.next_address("simswap.factory");
        let factory = Factory::new(address, fee_controller, config)?;
        self.factories.insert(address, factory);
        info!(%address, %fee_controller, swap_fee = %config.swap_fee(), "factory deployed");
        Ok(address)
    }

    /// The factory deployed at `factory`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::FactoryNotFound`] if there is none.
    pub fn factory(&self, factory: Address) -> Result<&Factory, AmmError> {
        self.factories
            .get(&factory)
            .ok_or(AmmError::FactoryNotFound)
    }

    fn factory_mut(&mut self, factory: Address) -> Result<&mut Factory, AmmError> {
        self.factories
            .get_mut(&factory)
            .ok_or(AmmError::FactoryNotFound)
    }

    /// Creates the pool for `x` and `y` and returns its address.
    ///
    /// Anyone may call this. The new pool is empty until its first mint.
    ///
    /// # Errors
    ///
    /// - [`AmmError::IdenticalAddresses`] if `x == y`.
    /// - [`AmmError::ZeroAddress`] if either token is the null address.
    /// - [`AmmError::PoolExists`] if the pair already has a pool.
    /// - [`AmmError::FactoryNotFound`] if `factory` is unknown.
    pub fn create_pool(
        &mut self,
        factory: Address,
        x: Address,
        y: Address,
    ) -> Result<Address, AmmError> {
        self.atomic(|ledger| {
            let pair = TokenPair::new(x, y)?;
            let registry = ledger.factory_mut(factory)?;
            let pool = registry.register(pair)?;
            let index = registry.all_pools_len();
            ledger
                .pools
                .insert(pool, PoolState::new(pool, factory, pair));
            ledger.emit(Event::PoolCreated {
                token_a: pair.token_a(),
                token_b: pair.token_b(),
                pool,
                index,
            });
            info!(%factory, %pool, token_a = %pair.token_a(), token_b = %pair.token_b(), index, "pool created");
            Ok(pool)
        })
    }

    /// Sets the protocol fee recipient.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the fee
    /// controller.
    pub fn set_fee_recipient(
        &mut self,
        caller: Address,
        factory: Address,
        recipient: Address,
    ) -> Result<(), AmmError> {
        self.factory_mut(factory)?
            .set_fee_recipient(caller, recipient)?;
        info!(%factory, %recipient, "fee recipient set");
        Ok(())
    }

    /// Turns the protocol fee on or off.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the fee
    /// controller.
    pub fn set_fee_on(&mut self, caller: Address, factory: Address, on: bool) -> Result<(), AmmError> {
        self.factory_mut(factory)?.set_fee_on(caller, on)?;
        info!(%factory, on, "protocol fee switched");
        Ok(())
    }

    /// Hands fee control to `controller`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Forbidden`] unless `caller` is the fee
    /// controller.
    pub fn set_fee_controller(
        &mut self,
        caller: Address,
        factory: Address,
        controller: Address,
    ) -> Result<(), AmmError> {
        self.factory_mut(factory)?
            .set_fee_controller(caller, controller)?;
        info!(%factory, %controller, "fee controller changed");
        Ok(())
    }
}
