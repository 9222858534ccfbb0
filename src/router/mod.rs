//! Stateless user-facing entry points over the factory's pools.
//!
//! The [`Router`] turns intents ("sell exactly this much along this path
//! for at least that much", "deposit at most these amounts") into the
//! low-level pool calls: it quotes with [`math`](crate::math), pulls
//! tokens from the caller with `transfer_from` (callers `approve` the
//! router first), sends the input to the first pool and drives each hop's
//! `swap`, routing every intermediate output straight into the next pool.
//!
//! Every entry point:
//!
//! - fails with [`AmmError::Expired`] when `now > deadline`;
//! - runs inside [`Ledger::atomic`], so a failing hop undoes the earlier
//!   ones;
//! - derives pool addresses locally with
//!   [`pool_address`](crate::factory::pool_address).
//!
//! Native-asset variants wrap and unwrap through the router's
//! wrapped-native contract, which must be the first (when paying native
//! value) or last (when receiving it) token of the path.

mod liquidity;
mod swap;

use tracing::info;

use crate::domain::{Address, Amount, FeeTier, SwapPath, TokenPair};
use crate::error::AmmError;
use crate::factory::pool_address;
use crate::ledger::Ledger;
use crate::math::{amounts_in, amounts_out, quote_equivalent, quote_input, quote_output};

/// Handle to a router deployed for one factory and one wrapped-native
/// contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Router {
    address: Address,
    factory: Address,
    wrapped_native: Address,
}

impl Router {
    /// Deploys a router onto `ledger`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::FactoryNotFound`] if `factory` is unknown.
    /// - [`AmmError::InvalidConfiguration`] if `wrapped_native` is not a
    ///   wrapped-native contract.
    pub fn deploy(
        ledger: &mut Ledger,
        factory: Address,
        wrapped_native: Address,
    ) -> Result<Self, AmmError> {
        ledger.factory(factory)?;
        if !ledger.is_wrapped_native(wrapped_native) {
            return Err(AmmError::InvalidConfiguration(
                "router needs a wrapped-native contract",
            ));
        }
        let address = ledger.next_address("simswap.router");
        info!(%address, %factory, %wrapped_native, "router deployed");
        Ok(Self {
            address,
            factory,
            wrapped_native,
        })
    }

    /// The router's own account, which callers approve as spender.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Factory whose pools the router trades against.
    #[must_use]
    pub const fn factory(&self) -> Address {
        self.factory
    }

    /// Wrapped-native contract used by the native variants.
    #[must_use]
    pub const fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    /// `amount_a` of one token expressed in the other at the ratio
    /// `reserve_a : reserve_b`, rounded down.
    ///
    /// # Errors
    ///
    /// See [`quote_equivalent`].
    pub fn quote(
        amount_a: Amount,
        reserve_a: Amount,
        reserve_b: Amount,
    ) -> Result<Amount, AmmError> {
        quote_equivalent(amount_a, reserve_a, reserve_b)
    }

    /// Single-hop exact-input quote at the factory's swap fee.
    ///
    /// # Errors
    ///
    /// See [`quote_output`]; also [`AmmError::FactoryNotFound`].
    pub fn get_amount_out(
        &self,
        ledger: &Ledger,
        amount_in: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
    ) -> Result<Amount, AmmError> {
        quote_output(amount_in, reserve_in, reserve_out, self.swap_fee(ledger)?)
    }

    /// Single-hop exact-output quote at the factory's swap fee.
    ///
    /// # Errors
    ///
    /// See [`quote_input`]; also [`AmmError::FactoryNotFound`].
    pub fn get_amount_in(
        &self,
        ledger: &Ledger,
        amount_out: Amount,
        reserve_in: Amount,
        reserve_out: Amount,
    ) -> Result<Amount, AmmError> {
        quote_input(amount_out, reserve_in, reserve_out, self.swap_fee(ledger)?)
    }

    /// Amounts entering each hop when selling `amount_in` along `path`;
    /// the last element is the final output.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] if a hop has no pool.
    /// - Any quoting error of a hop.
    pub fn get_amounts_out(
        &self,
        ledger: &Ledger,
        amount_in: Amount,
        path: &SwapPath,
    ) -> Result<Vec<Amount>, AmmError> {
        let reserves = self.path_reserves(ledger, path)?;
        amounts_out(amount_in, &reserves, self.swap_fee(ledger)?)
    }

    /// Amounts entering each hop to receive exactly `amount_out` at the
    /// end of `path`; the first element is the required input.
    ///
    /// # Errors
    ///
    /// - [`AmmError::PoolNotFound`] if a hop has no pool.
    /// - Any quoting error of a hop.
    pub fn get_amounts_in(
        &self,
        ledger: &Ledger,
        amount_out: Amount,
        path: &SwapPath,
    ) -> Result<Vec<Amount>, AmmError> {
        let reserves = self.path_reserves(ledger, path)?;
        amounts_in(amount_out, &reserves, self.swap_fee(ledger)?)
    }

    fn ensure(ledger: &Ledger, deadline: u64) -> Result<(), AmmError> {
        if ledger.now() > deadline {
            return Err(AmmError::Expired);
        }
        Ok(())
    }

    fn swap_fee(&self, ledger: &Ledger) -> Result<FeeTier, AmmError> {
        Ok(ledger.factory(self.factory)?.config().swap_fee())
    }

    fn pool_for(&self, x: Address, y: Address) -> Result<Address, AmmError> {
        Ok(pool_address(self.factory, &TokenPair::new(x, y)?))
    }

    /// `(reserve_in, reserve_out)` of the pool trading `input` for `output`.
    fn reserves(
        &self,
        ledger: &Ledger,
        input: Address,
        output: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        let pair = TokenPair::new(input, output)?;
        let state = ledger.pool_state(pool_address(self.factory, &pair))?;
        let (reserve_a, reserve_b, _) = state.reserves();
        pair.oriented(&input, (reserve_a, reserve_b))
    }

    fn path_reserves(
        &self,
        ledger: &Ledger,
        path: &SwapPath,
    ) -> Result<Vec<(Amount, Amount)>, AmmError> {
        path.hops()
            .map(|(input, output)| self.reserves(ledger, input, output))
            .collect()
    }
}
