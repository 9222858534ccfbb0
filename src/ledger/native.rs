//! Native value and the wrapped-native token contract.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::Ledger;
use crate::domain::{Address, Amount, Event};
use crate::error::AmmError;

#[derive(Debug, Clone, Default)]
pub(crate) struct NativeBalances {
    balances: HashMap<Address, Amount>,
    wrapped: HashSet<Address>,
}

impl NativeBalances {
    fn balance(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    fn credit(&mut self, account: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self
            .balance(account)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("native balance"))?;
        self.balances.insert(account, balance);
        Ok(())
    }

    fn debit(&mut self, account: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self
            .balance(account)
            .checked_sub(&amount)
            .ok_or(AmmError::TransferFailed)?;
        self.balances.insert(account, balance);
        Ok(())
    }
}

impl Ledger {
    /// Creates `amount` of native value out of thin air for `account`.
    ///
    /// Stands in for genesis allocations in test setups.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the balance would exceed `u128`.
    pub fn fund_native(&mut self, account: Address, amount: Amount) -> Result<(), AmmError> {
        self.native.credit(account, amount)
    }

    /// Native balance of `account`.
    pub fn native_balance(&self, account: Address) -> Amount {
        self.native.balance(account)
    }

    /// Sends native value.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TransferFailed`] if `from` holds less than
    /// `amount`. Nothing changes on failure.
    pub fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.atomic(|ledger| {
            ledger.native.debit(from, amount)?;
            ledger.native.credit(to, amount)
        })
    }

    /// Deploys a wrapped-native token contract. Its address is also the
    /// address of the wrapped token.
    pub fn deploy_wrapped_native(&mut self) -> Address {
        let wrapped = self.next_address("simswap.wrapped-native");
        self.native.wrapped.insert(wrapped);
        wrapped
    }

    /// Returns `true` if `address` is a wrapped-native contract.
    #[must_use]
    pub fn is_wrapped_native(&self, address: Address) -> bool {
        self.native.wrapped.contains(&address)
    }

    /// Locks `amount` of `caller`'s native value in `wrapped` and mints
    /// the same amount of wrapped tokens to `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TransferFailed`] if `wrapped` is not a
    /// wrapped-native contract or `caller` lacks the native value.
    pub fn deposit_native(
        &mut self,
        wrapped: Address,
        caller: Address,
        amount: Amount,
    ) -> Result<Amount, AmmError> {
        if !self.is_wrapped_native(wrapped) {
            return Err(AmmError::TransferFailed);
        }
        self.atomic(|ledger| {
            ledger.transfer_native(caller, wrapped, amount)?;
            ledger.mint_tokens(wrapped, caller, amount)?;
            ledger.emit(Event::Deposit {
                account: caller,
                amount,
            });
            debug!(%wrapped, %caller, %amount, "wrapped native value");
            Ok(amount)
        })
    }

    /// Burns `amount` of `caller`'s wrapped tokens and releases the same
    /// amount of native value to `caller`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TransferFailed`] if `wrapped` is not a
    /// wrapped-native contract or `caller` holds too few wrapped tokens.
    pub fn withdraw_native(
        &mut self,
        wrapped: Address,
        caller: Address,
        amount: Amount,
    ) -> Result<Amount, AmmError> {
        if !self.is_wrapped_native(wrapped) {
            return Err(AmmError::TransferFailed);
        }
        self.atomic(|ledger| {
            ledger.burn_tokens(wrapped, caller, amount)?;
            ledger.transfer_native(wrapped, caller, amount)?;
            ledger.emit(Event::Withdrawal {
                account: caller,
                amount,
            });
            debug!(%wrapped, %caller, %amount, "unwrapped native value");
            Ok(amount)
        })
    }
}
