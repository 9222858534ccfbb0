//! Fungible token balances, allowances and supplies.
//!
//! Any address can act as a token: plain tokens are deployed with
//! [`Ledger::deploy_token`], and every pool address is also the token
//! that denominates its shares.

use std::collections::HashMap;

use tracing::debug;

use super::Ledger;
use crate::domain::{Address, Amount, Event};
use crate::error::AmmError;

/// Raw bookkeeping for every fungible token on the ledger.
#[derive(Debug, Clone, Default)]
pub(crate) struct TokenBalances {
    /// `(token, holder) -> balance`
    balances: HashMap<(Address, Address), Amount>,
    /// `(token, owner, spender) -> allowance`
    allowances: HashMap<(Address, Address, Address), Amount>,
    supplies: HashMap<Address, Amount>,
}

impl TokenBalances {
    pub(crate) fn balance(&self, token: Address, holder: Address) -> Amount {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn allowance(&self, token: Address, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub(crate) fn supply(&self, token: Address) -> Amount {
        self.supplies.get(&token).copied().unwrap_or_default()
    }

    fn set_balance(&mut self, token: Address, holder: Address, amount: Amount) {
        if amount.is_zero() {
            self.balances.remove(&(token, holder));
        } else {
            self.balances.insert((token, holder), amount);
        }
    }

    fn move_balance(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let debited = self
            .balance(token, from)
            .checked_sub(&amount)
            .ok_or(AmmError::TransferFailed)?;
        self.set_balance(token, from, debited);
        // balances never exceed the supply, so this cannot overflow
        let credited = self
            .balance(token, to)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("token balance"))?;
        self.set_balance(token, to, credited);
        Ok(())
    }

    fn mint(&mut self, token: Address, to: Address, amount: Amount) -> Result<(), AmmError> {
        let supply = self
            .supply(token)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("token supply"))?;
        let balance = self
            .balance(token, to)
            .checked_add(&amount)
            .ok_or(AmmError::Overflow("token balance"))?;
        self.supplies.insert(token, supply);
        self.set_balance(token, to, balance);
        Ok(())
    }

    fn burn(&mut self, token: Address, from: Address, amount: Amount) -> Result<(), AmmError> {
        let balance = self
            .balance(token, from)
            .checked_sub(&amount)
            .ok_or(AmmError::TransferFailed)?;
        let supply = self.supply(token).saturating_sub(&amount);
        self.set_balance(token, from, balance);
        self.supplies.insert(token, supply);
        Ok(())
    }

    /// Infinite (`Amount::MAX`) allowances are never decremented.
    fn spend_allowance(
        &mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        let current = self.allowance(token, owner, spender);
        if current == Amount::MAX {
            return Ok(());
        }
        let remaining = current
            .checked_sub(&amount)
            .ok_or(AmmError::TransferFailed)?;
        self.allowances.insert((token, owner, spender), remaining);
        Ok(())
    }
}

impl Ledger {
    /// Deploys a fungible token and mints `initial_supply` to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Overflow`] if the supply cannot be recorded.
    pub fn deploy_token(
        &mut self,
        owner: Address,
        initial_supply: Amount,
    ) -> Result<Address, AmmError> {
        self.atomic(|ledger| {
            let token = ledger.next_address("simswap.token");
            ledger.mint_tokens(token, owner, initial_supply)?;
            debug!(%token, %owner, %initial_supply, "token deployed");
            Ok(token)
        })
    }

    /// Balance of `holder` in `token`.
    pub fn balance_of(&self, token: Address, holder: Address) -> Amount {
        self.tokens.balance(token, holder)
    }

    /// Amount `spender` may still move out of `owner`'s `token` balance.
    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> Amount {
        self.tokens.allowance(token, owner, spender)
    }

    /// Circulating supply of `token`.
    pub fn total_supply(&self, token: Address) -> Amount {
        self.tokens.supply(token)
    }

    /// Moves `amount` of `token` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TransferFailed`] if `from` holds less than
    /// `amount`.
    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.tokens.move_balance(token, from, to, amount)?;
        self.emit(Event::Transfer {
            token,
            from,
            to,
            amount,
        });
        Ok(())
    }

    /// Lets `spender` move up to `amount` of `owner`'s `token`.
    ///
    /// `Amount::MAX` grants an allowance that is never used up.
    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: Amount) {
        self.tokens.allowances.insert((token, owner, spender), amount);
        self.emit(Event::Approval {
            token,
            owner,
            spender,
            amount,
        });
    }

    /// Moves `amount` of `owner`'s `token` to `to` on behalf of `spender`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::TransferFailed`] if the allowance or the
    /// balance is too small. Nothing changes on failure.
    pub fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.atomic(|ledger| {
            ledger.tokens.spend_allowance(token, owner, spender, amount)?;
            ledger.transfer(token, owner, to, amount)
        })
    }

    pub(crate) fn mint_tokens(
        &mut self,
        token: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.tokens.mint(token, to, amount)?;
        self.emit(Event::Transfer {
            token,
            from: Address::ZERO,
            to,
            amount,
        });
        Ok(())
    }

    pub(crate) fn burn_tokens(
        &mut self,
        token: Address,
        from: Address,
        amount: Amount,
    ) -> Result<(), AmmError> {
        self.tokens.burn(token, from, amount)?;
        self.emit(Event::Transfer {
            token,
            from,
            to: Address::ZERO,
            amount,
        });
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn setup() -> (Ledger, Address, Address, Address) {
        let mut ledger = Ledger::new(0);
        let alice = Ledger::account("alice");
        let bob = Ledger::account("bob");
        let Ok(token) = ledger.deploy_token(alice, Amount::new(1_000)) else {
            panic!("deploy token");
        };
        (ledger, token, alice, bob)
    }

    #[test]
    fn deploy_mints_initial_supply() {
        let (ledger, token, alice, _) = setup();
        assert_eq!(ledger.total_supply(token), Amount::new(1_000));
        assert_eq!(ledger.balance_of(token, alice), Amount::new(1_000));
        assert!(matches!(
            ledger.events().last(),
            Some(Event::Transfer { from, amount, .. }) if from.is_zero() && *amount == Amount::new(1_000)
        ));
    }

    #[test]
    fn deploy_returns_fresh_addresses() {
        let (mut ledger, first, alice, _) = setup();
        let Ok(second) = ledger.deploy_token(alice, Amount::ZERO) else {
            panic!("deploy token");
        };
        assert_ne!(first, second);
        assert_eq!(ledger.total_supply(second), Amount::ZERO);
        assert_eq!(ledger.balance_of(first, alice), Amount::new(1_000));
    }

    #[test]
    fn transfer_moves_balance() {
        let (mut ledger, token, alice, bob) = setup();
        let Ok(()) = ledger.transfer(token, alice, bob, Amount::new(400)) else {
            panic!("funded transfer");
        };
        assert_eq!(ledger.balance_of(token, alice), Amount::new(600));
        assert_eq!(ledger.balance_of(token, bob), Amount::new(400));
        assert_eq!(ledger.total_supply(token), Amount::new(1_000));
    }

    #[test]
    fn transfer_rejects_overdraft() {
        let (mut ledger, token, alice, bob) = setup();
        assert_eq!(
            ledger.transfer(token, bob, alice, Amount::new(1)),
            Err(AmmError::TransferFailed)
        );
    }

    #[test]
    fn transfer_from_spends_allowance() {
        let (mut ledger, token, alice, bob) = setup();
        ledger.approve(token, alice, bob, Amount::new(300));
        let Ok(()) = ledger.transfer_from(token, bob, alice, bob, Amount::new(200)) else {
            panic!("approved transfer");
        };
        assert_eq!(ledger.allowance(token, alice, bob), Amount::new(100));
        assert_eq!(ledger.balance_of(token, bob), Amount::new(200));
    }

    #[test]
    fn transfer_from_rejects_missing_allowance() {
        let (mut ledger, token, alice, bob) = setup();
        ledger.approve(token, alice, bob, Amount::new(10));
        assert_eq!(
            ledger.transfer_from(token, bob, alice, bob, Amount::new(11)),
            Err(AmmError::TransferFailed)
        );
        assert_eq!(ledger.allowance(token, alice, bob), Amount::new(10));
    }

    #[test]
    fn transfer_from_keeps_allowance_when_balance_short() {
        let (mut ledger, token, alice, bob) = setup();
        ledger.approve(token, alice, bob, Amount::new(5_000));
        assert_eq!(
            ledger.transfer_from(token, bob, alice, bob, Amount::new(2_000)),
            Err(AmmError::TransferFailed)
        );
        assert_eq!(ledger.allowance(token, alice, bob), Amount::new(5_000));
    }

    #[test]
    fn infinite_allowance_is_not_spent() {
        let (mut ledger, token, alice, bob) = setup();
        ledger.approve(token, alice, bob, Amount::MAX);
        let Ok(()) = ledger.transfer_from(token, bob, alice, bob, Amount::new(500)) else {
            panic!("approved transfer");
        };
        assert_eq!(ledger.allowance(token, alice, bob), Amount::MAX);
    }

    #[test]
    fn mint_and_burn_track_supply() {
        let (mut ledger, token, alice, _) = setup();
        let Ok(()) = ledger.mint_tokens(token, alice, Amount::new(50)) else {
            panic!("mint");
        };
        assert_eq!(ledger.total_supply(token), Amount::new(1_050));
        let Ok(()) = ledger.burn_tokens(token, alice, Amount::new(1_050)) else {
            panic!("burn");
        };
        assert_eq!(ledger.total_supply(token), Amount::ZERO);
        assert_eq!(ledger.balance_of(token, alice), Amount::ZERO);
    }
}
