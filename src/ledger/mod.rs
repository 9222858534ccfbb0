//! Simulated ledger hosting tokens, the exchange contracts and a clock.
//!
//! The AMM core treats the ledger as an external collaborator: it asks
//! it to move balances, to tell the time and to record events. This
//! module is the in-memory host that provides those services so the
//! core can run and be tested end to end.
//!
//! # Execution model
//!
//! A [`Ledger`] is driven through `&mut self`, so calls are serialized.
//! Every external entry point runs inside [`Ledger::atomic`]: the state
//! is snapshotted first and restored if the call returns an error, so a
//! failed call leaves no transfer, event or state change behind.
//! Reentrancy is only possible through a
//! [`FlashSwapCallee`](crate::traits::FlashSwapCallee), and pools guard
//! against it with their own lock.

mod balances;
mod native;

use std::collections::HashMap;
use std::mem;

use tracing::{trace, warn};

pub(crate) use balances::TokenBalances;
pub(crate) use native::NativeBalances;

use crate::domain::{Address, Event};
use crate::error::AmmError;
use crate::factory::Factory;
use crate::pools::PoolState;

/// In-memory host for tokens, native value, contracts and events.
///
/// # Example
///
/// ```
/// use simswap::domain::Amount;
/// use simswap::ledger::Ledger;
///
/// let mut ledger = Ledger::new(1_000);
/// let alice = Ledger::account("alice");
/// let bob = Ledger::account("bob");
/// let token = ledger.deploy_token(alice, Amount::new(500)).expect("token");
///
/// ledger.transfer(token, alice, bob, Amount::new(200)).expect("funded");
/// assert_eq!(ledger.balance_of(token, bob), Amount::new(200));
/// assert!(ledger.transfer(token, bob, alice, Amount::new(201)).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    now: u64,
    nonce: u64,
    pub(crate) tokens: TokenBalances,
    pub(crate) native: NativeBalances,
    pub(crate) factories: HashMap<Address, Factory>,
    pub(crate) pools: HashMap<Address, PoolState>,
    events: Vec<Event>,
}

impl Ledger {
    /// Creates an empty ledger whose clock reads `now` (seconds).
    #[must_use]
    pub fn new(now: u64) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    /// Deterministic externally owned account for a human-readable label.
    #[must_use]
    pub fn account(label: &str) -> Address {
        Address::derive("simswap.account", &[label.as_bytes()])
    }

    /// Current block timestamp.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Sets the clock to `now` (seconds). The clock may move backwards.
    pub fn set_time(&mut self, now: u64) {
        self.now = now;
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance_time(&mut self, seconds: u64) {
        self.now = self.now.saturating_add(seconds);
    }

    /// Every event emitted so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Runs `call` as one all-or-nothing unit.
    ///
    /// If `call` fails, every change it made (balances, contract state,
    /// events, the address nonce) is discarded and the error is returned
    /// unchanged.
    ///
    /// Each call snapshots the balances and contract state, so the cost
    /// grows with the number of accounts and pools. The event log is
    /// append-only and is only truncated back to its length on entry.
    ///
    /// # Errors
    ///
    /// Returns whatever `call` returns.
    pub fn atomic<T>(
        &mut self,
        call: impl FnOnce(&mut Self) -> Result<T, AmmError>,
    ) -> Result<T, AmmError> {
        let events = mem::take(&mut self.events);
        let snapshot = self.clone();
        self.events = events;
        let mark = self.events.len();
        match call(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                warn!(%error, "call reverted");
                let mut events = mem::take(&mut self.events);
                events.truncate(mark);
                *self = snapshot;
                self.events = events;
                Err(error)
            }
        }
    }

    pub(crate) fn emit(&mut self, event: Event) {
        trace!(event = event.name(), "emit");
        self.events.push(event);
    }

    /// Fresh contract address, unique within this ledger.
    pub(crate) fn next_address(&mut self, tag: &str) -> Address {
        self.nonce += 1;
        Address::derive(tag, &[&self.nonce.to_be_bytes()])
    }
}
