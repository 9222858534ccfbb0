//! Multi-hop swaps through the router.

use tracing::debug;

use super::Router;
use crate::domain::{Address, Amount, SwapPath, TokenPair};
use crate::error::AmmError;
use crate::factory::pool_address;
use crate::ledger::Ledger;

#[allow(clippy::too_many_arguments)]
impl Router {
    /// Sells exactly `amount_in` of `path.first()` for as much of
    /// `path.last()` as the path yields, sent to `to`.
    ///
    /// Returns the amount entering each hop; the last element is the
    /// amount received.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if the deadline has passed.
    /// - [`AmmError::InsufficientOutputAmount`] if the output would be
    ///   below `amount_out_min`.
    /// - [`AmmError::PoolNotFound`] if a hop has no pool.
    /// - Any error from the transfers or a pool's `swap`.
    pub fn swap_exact_tokens_for_tokens(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        amount_in: Amount,
        amount_out_min: Amount,
        path: &SwapPath,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<Amount>, AmmError> {
        ledger.atomic(|ledger| {
            Self::ensure(ledger, deadline)?;
            let amounts = self.get_amounts_out(ledger, amount_in, path)?;
            if final_amount(&amounts) < amount_out_min {
                return Err(AmmError::InsufficientOutputAmount);
            }
            self.pull_input(ledger, caller, path, amounts[0])?;
            self.execute(ledger, &amounts, path, to)?;
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` of `path.last()` for at most
    /// `amount_in_max` of `path.first()`.
    ///
    /// Returns the amount entering each hop; the first element is the
    /// amount paid.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Expired`] if the deadline has passed.
    /// - [`AmmError::ExcessiveInputAmount`] if the required input exceeds
    ///   `amount_in_max`.
    /// - [`AmmError::PoolNotFound`] if a hop has no pool.
    /// - Any error from the transfers or a pool's `swap`.
    pub fn swap_tokens_for_exact_tokens(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        amount_out: Amount,
        amount_in_max: Amount,
        path: &SwapPath,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<Amount>, AmmError> {
        ledger.atomic(|ledger| {
            Self::ensure(ledger, deadline)?;
            let amounts = self.get_amounts_in(ledger, amount_out, path)?;
            if amounts[0] > amount_in_max {
                return Err(AmmError::ExcessiveInputAmount);
            }
            self.pull_input(ledger, caller, path, amounts[0])?;
            self.execute(ledger, &amounts, path, to)?;
            Ok(amounts)
        })
    }

    /// Sells all of `value` (native) along a path starting at the wrapped
    /// native token.
    ///
    /// # Errors
    ///
    /// As [`swap_exact_tokens_for_tokens`](Self::swap_exact_tokens_for_tokens),
    /// plus [`AmmError::InvalidPath`] if the path does not start at the
    /// wrapped native token.
    pub fn swap_exact_native_for_tokens(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        value: Amount,
        amount_out_min: Amount,
        path: &SwapPath,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<Amount>, AmmError> {
        ledger.atomic(|ledger| {
            Self::ensure(ledger, deadline)?;
            if path.first() != self.wrapped_native {
                return Err(AmmError::InvalidPath);
            }
            let amounts = self.get_amounts_out(ledger, value, path)?;
            if final_amount(&amounts) < amount_out_min {
                return Err(AmmError::InsufficientOutputAmount);
            }
            ledger.transfer_native(caller, self.address, value)?;
            self.wrap_into_first_pool(ledger, path, amounts[0])?;
            self.execute(ledger, &amounts, path, to)?;
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` of `path.last()` with native value,
    /// refunding whatever part of `value` is not needed.
    ///
    /// # Errors
    ///
    /// As [`swap_tokens_for_exact_tokens`](Self::swap_tokens_for_exact_tokens)
    /// with `value` as the maximum input, plus [`AmmError::InvalidPath`]
    /// if the path does not start at the wrapped native token.
    pub fn swap_native_for_exact_tokens(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        value: Amount,
        amount_out: Amount,
        path: &SwapPath,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<Amount>, AmmError> {
        ledger.atomic(|ledger| {
            Self::ensure(ledger, deadline)?;
            if path.first() != self.wrapped_native {
                return Err(AmmError::InvalidPath);
            }
            let amounts = self.get_amounts_in(ledger, amount_out, path)?;
            if amounts[0] > value {
                return Err(AmmError::ExcessiveInputAmount);
            }
            ledger.transfer_native(caller, self.address, value)?;
            self.wrap_into_first_pool(ledger, path, amounts[0])?;
            self.execute(ledger, &amounts, path, to)?;
            self.refund_native(ledger, caller, value, amounts[0])?;
            Ok(amounts)
        })
    }

    /// Sells exactly `amount_in` of a token for native value.
    ///
    /// # Errors
    ///
    /// As [`swap_exact_tokens_for_tokens`](Self::swap_exact_tokens_for_tokens),
    /// plus [`AmmError::InvalidPath`] if the path does not end at the
    /// wrapped native token.
    pub fn swap_exact_tokens_for_native(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        amount_in: Amount,
        amount_out_min: Amount,
        path: &SwapPath,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<Amount>, AmmError> {
        ledger.atomic(|ledger| {
            Self::ensure(ledger, deadline)?;
            if path.last() != self.wrapped_native {
                return Err(AmmError::InvalidPath);
            }
            let amounts = self.get_amounts_out(ledger, amount_in, path)?;
            let amount_out = final_amount(&amounts);
            if amount_out < amount_out_min {
                return Err(AmmError::InsufficientOutputAmount);
            }
            self.pull_input(ledger, caller, path, amounts[0])?;
            self.execute(ledger, &amounts, path, self.address)?;
            self.unwrap_to(ledger, amount_out, to)?;
            Ok(amounts)
        })
    }

    /// Buys exactly `amount_out` of native value for at most
    /// `amount_in_max` of a token.
    ///
    /// # Errors
    ///
    /// As [`swap_tokens_for_exact_tokens`](Self::swap_tokens_for_exact_tokens),
    /// plus [`AmmError::InvalidPath`] if the path does not end at the
    /// wrapped native token.
    pub fn swap_tokens_for_exact_native(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        amount_out: Amount,
        amount_in_max: Amount,
        path: &SwapPath,
        to: Address,
        deadline: u64,
    ) -> Result<Vec<Amount>, AmmError> {
        ledger.atomic(|ledger| {
            Self::ensure(ledger, deadline)?;
            if path.last() != self.wrapped_native {
                return Err(AmmError::InvalidPath);
            }
            let amounts = self.get_amounts_in(ledger, amount_out, path)?;
            if amounts[0] > amount_in_max {
                return Err(AmmError::ExcessiveInputAmount);
            }
            self.pull_input(ledger, caller, path, amounts[0])?;
            self.execute(ledger, &amounts, path, self.address)?;
            self.unwrap_to(ledger, amount_out, to)?;
            Ok(amounts)
        })
    }

    /// Moves the input from `caller` straight into the first pool.
    fn pull_input(
        &self,
        ledger: &mut Ledger,
        caller: Address,
        path: &SwapPath,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let (first_in, first_out) = first_hop(path)?;
        let pool = self.pool_for(first_in, first_out)?;
        ledger.transfer_from(path.first(), self.address, caller, pool, amount)
    }

    fn wrap_into_first_pool(
        &self,
        ledger: &mut Ledger,
        path: &SwapPath,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let (first_in, first_out) = first_hop(path)?;
        let pool = self.pool_for(first_in, first_out)?;
        let wrapped = ledger.deposit_native(self.wrapped_native, self.address, amount)?;
        ledger.transfer(self.wrapped_native, self.address, pool, wrapped)
    }

    fn unwrap_to(&self, ledger: &mut Ledger, amount: Amount, to: Address) -> Result<(), AmmError> {
        let released = ledger.withdraw_native(self.wrapped_native, self.address, amount)?;
        ledger.transfer_native(self.address, to, released)
    }

    /// Calls `swap` on every hop, sending each output to the next pool
    /// and the last one to `to`. The first pool must already hold
    /// `amounts[0]`.
    fn execute(
        &self,
        ledger: &mut Ledger,
        amounts: &[Amount],
        path: &SwapPath,
        to: Address,
    ) -> Result<(), AmmError> {
        let hops: Vec<(Address, Address)> = path.hops().collect();
        for (i, &(input, output)) in hops.iter().enumerate() {
            let pair = TokenPair::new(input, output)?;
            let amount_out = amounts.get(i + 1).copied().ok_or(AmmError::InvalidPath)?;
            let (amount_a_out, amount_b_out) = if input == pair.token_a() {
                (Amount::ZERO, amount_out)
            } else {
                (amount_out, Amount::ZERO)
            };
            let recipient = match hops.get(i + 1) {
                Some(&(next_in, next_out)) => self.pool_for(next_in, next_out)?,
                None => to,
            };
            let pool = pool_address(self.factory, &pair);
            ledger.swap(
                self.address,
                pool,
                amount_a_out,
                amount_b_out,
                recipient,
                &[],
                None,
            )?;
            debug!(hop = i, %pool, %input, %output, %amount_out, "hop settled");
        }
        Ok(())
    }
}

fn first_hop(path: &SwapPath) -> Result<(Address, Address), AmmError> {
    path.hops().next().ok_or(AmmError::InvalidPath)
}

fn final_amount(amounts: &[Amount]) -> Amount {
    amounts.last().copied().unwrap_or_default()
}
