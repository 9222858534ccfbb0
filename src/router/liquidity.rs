//! Adding and removing liquidity through the router.

use tracing::debug;

use super::Router;
use crate::domain::{Address, Amount, TokenPair};
use crate::error::AmmError;
use crate::ledger::Ledger;
use crate::math::quote_equivalent;

#[allow(clippy::too_many_arguments)]
impl Router {
    /// Deposits up to the desired amounts into the `token_a`/`token_b`
    /// pool at its current ratio and mints shares to `to`.
    ///
    /// Creates the pool if it does not exist; an empty pool takes the
    /// desired amounts as they are and sets the initial price.
    ///
    /// Returns `(amount_a, amount_b, shares)`.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if the deadline has passed.
    /// - [`AmmError::InsufficientAAmount`] / [`AmmError::InsufficientBAmount`]
    ///   if the ratio forces a side below its minimum.
    /// - Any error from pool creation, the transfers or `mint`.
    pub fn add_liquidity(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        token_a: Address,
        token_b: Address,
        amount_a_desired: Amount,
        amount_b_desired: Amount,
        amount_a_min: Amount,
        amount_b_min: Amount,
        to: Address,
        deadline: u64,
    ) -> Result<(Amount, Amount, Amount), AmmError> {
        ledger.atomic(|ledger| {
            Self::ensure(ledger, deadline)?;
            let (amount_a, amount_b) = self.deposit_amounts(
                ledger,
                (token_a, token_b),
                (amount_a_desired, amount_b_desired),
                (amount_a_min, amount_b_min),
            )?;
            let pool = self.pool_for(token_a, token_b)?;
            ledger.transfer_from(token_a, self.address, caller, pool, amount_a)?;
            ledger.transfer_from(token_b, self.address, caller, pool, amount_b)?;
            let shares = ledger.mint(self.address, pool, to)?;
            debug!(%pool, %caller, %amount_a, %amount_b, %shares, "liquidity added");
            Ok((amount_a, amount_b, shares))
        })
    }

    /// Like [`add_liquidity`](Self::add_liquidity) with native value on
    /// one side.
    ///
    /// `value` is the native amount sent along; whatever the ratio does
    /// not use is refunded to `caller`.
    ///
    /// Returns `(amount_token, amount_native, shares)`.
    ///
    /// # Errors
    ///
    /// As [`add_liquidity`](Self::add_liquidity), plus
    /// [`AmmError::TransferFailed`] if `caller` lacks `value`.
    pub fn add_liquidity_native(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        token: Address,
        value: Amount,
        amount_token_desired: Amount,
        amount_token_min: Amount,
        amount_native_min: Amount,
        to: Address,
        deadline: u64,
    ) -> Result<(Amount, Amount, Amount), AmmError> {
        ledger.atomic(|ledger| {
            Self::ensure(ledger, deadline)?;
            let wrapped = self.wrapped_native;
            let (amount_token, amount_native) = self.deposit_amounts(
                ledger,
                (token, wrapped),
                (amount_token_desired, value),
                (amount_token_min, amount_native_min),
            )?;
            let pool = self.pool_for(token, wrapped)?;
            ledger.transfer_from(token, self.address, caller, pool, amount_token)?;

            ledger.transfer_native(caller, self.address, value)?;
            let deposited = ledger.deposit_native(wrapped, self.address, amount_native)?;
            ledger.transfer(wrapped, self.address, pool, deposited)?;
            let shares = ledger.mint(self.address, pool, to)?;
            self.refund_native(ledger, caller, value, amount_native)?;
            debug!(%pool, %caller, %amount_token, %amount_native, %shares, "native liquidity added");
            Ok((amount_token, amount_native, shares))
        })
    }

    /// Burns `shares` of the `token_a`/`token_b` pool and sends the
    /// underlying tokens to `to`. Returns `(amount_a, amount_b)` in the
    /// caller's token order.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if the deadline has passed.
    /// - [`AmmError::InsufficientAAmount`] / [`AmmError::InsufficientBAmount`]
    ///   if a payout is below its minimum.
    /// - Any error from the share transfer or `burn`.
    pub fn remove_liquidity(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        token_a: Address,
        token_b: Address,
        shares: Amount,
        amount_a_min: Amount,
        amount_b_min: Amount,
        to: Address,
        deadline: u64,
    ) -> Result<(Amount, Amount), AmmError> {
        ledger.atomic(|ledger| {
            Self::ensure(ledger, deadline)?;
            self.withdraw(
                ledger,
                caller,
                (token_a, token_b),
                shares,
                (amount_a_min, amount_b_min),
                to,
            )
        })
    }

    /// Like [`remove_liquidity`](Self::remove_liquidity) for a
    /// token/wrapped-native pool, paying the native side out unwrapped.
    ///
    /// Returns `(amount_token, amount_native)`.
    ///
    /// # Errors
    ///
    /// As [`remove_liquidity`](Self::remove_liquidity).
    pub fn remove_liquidity_native(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        token: Address,
        shares: Amount,
        amount_token_min: Amount,
        amount_native_min: Amount,
        to: Address,
        deadline: u64,
    ) -> Result<(Amount, Amount), AmmError> {
        ledger.atomic(|ledger| {
            Self::ensure(ledger, deadline)?;
            let wrapped = self.wrapped_native;
            let (amount_token, amount_native) = self.withdraw(
                ledger,
                caller,
                (token, wrapped),
                shares,
                (amount_token_min, amount_native_min),
                self.address,
            )?;
            ledger.transfer(token, self.address, to, amount_token)?;
            let released = ledger.withdraw_native(wrapped, self.address, amount_native)?;
            ledger.transfer_native(self.address, to, released)?;
            Ok((amount_token, amount_native))
        })
    }

    /// Sizes a deposit to the pool's current ratio, creating the pool
    /// first if needed.
    fn deposit_amounts(
        &self,
        ledger: &mut Ledger,
        (token_a, token_b): (Address, Address),
        (desired_a, desired_b): (Amount, Amount),
        (min_a, min_b): (Amount, Amount),
    ) -> Result<(Amount, Amount), AmmError> {
        if ledger.factory(self.factory)?.pool(token_a, token_b).is_none() {
            ledger.create_pool(self.factory, token_a, token_b)?;
        }
        let (reserve_a, reserve_b) = self.reserves(ledger, token_a, token_b)?;
        if reserve_a.is_zero() && reserve_b.is_zero() {
            return Ok((desired_a, desired_b));
        }
        let optimal_b = quote_equivalent(desired_a, reserve_a, reserve_b)?;
        if optimal_b <= desired_b {
            if optimal_b < min_b {
                return Err(AmmError::InsufficientBAmount);
            }
            return Ok((desired_a, optimal_b));
        }
        let optimal_a = quote_equivalent(desired_b, reserve_b, reserve_a)?;
        if optimal_a > desired_a || optimal_a < min_a {
            return Err(AmmError::InsufficientAAmount);
        }
        Ok((optimal_a, desired_b))
    }

    fn withdraw(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        (token_a, token_b): (Address, Address),
        shares: Amount,
        (min_a, min_b): (Amount, Amount),
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        let pair = TokenPair::new(token_a, token_b)?;
        let pool = self.pool_for(token_a, token_b)?;
        ledger.transfer_from(pool, self.address, caller, pool, shares)?;
        let paid = ledger.burn(self.address, pool, to)?;
        let (amount_a, amount_b) = pair.oriented(&token_a, paid)?;
        if amount_a < min_a {
            return Err(AmmError::InsufficientAAmount);
        }
        if amount_b < min_b {
            return Err(AmmError::InsufficientBAmount);
        }
        debug!(%pool, %caller, %shares, %amount_a, %amount_b, "liquidity removed");
        Ok((amount_a, amount_b))
    }

    /// Returns the part of `value` that was not spent.
    pub(super) fn refund_native(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        value: Amount,
        spent: Amount,
    ) -> Result<(), AmmError> {
        let change = value.saturating_sub(&spent);
        if change.is_zero() {
            return Ok(());
        }
        ledger.transfer_native(self.address, caller, change)
    }
}
