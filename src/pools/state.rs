//! Persistent state of one constant-product pool.

use primitive_types::U256;

use super::oracle;
use crate::domain::{Address, Amount, TokenPair};
use crate::error::AmmError;

/// Reserves, oracle accumulators and guard flag of a pool.
///
/// A pool is created empty by its factory and becomes active on the first
/// successful mint. Between calls, `reserve_a` and `reserve_b` equal the
/// pool's token balances on the ledger unless someone transferred tokens
/// in without calling the pool (see [`Ledger::skim`] and
/// [`Ledger::sync`]).
///
/// [`Ledger::skim`]: crate::ledger::Ledger::skim
/// [`Ledger::sync`]: crate::ledger::Ledger::sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    address: Address,
    factory: Address,
    pair: TokenPair,
    reserve_a: Amount,
    reserve_b: Amount,
    block_timestamp_last: u64,
    price_a_cumulative: U256,
    price_b_cumulative: U256,
    k_last: U256,
    unlocked: bool,
}

impl PoolState {
    pub(crate) fn new(address: Address, factory: Address, pair: TokenPair) -> Self {
        Self {
            address,
            factory,
            pair,
            reserve_a: Amount::ZERO,
            reserve_b: Amount::ZERO,
            block_timestamp_last: 0,
            price_a_cumulative: U256::zero(),
            price_b_cumulative: U256::zero(),
            k_last: U256::zero(),
            unlocked: true,
        }
    }

    /// Address of the pool, which is also its share token.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Factory that created the pool.
    #[must_use]
    pub const fn factory(&self) -> Address {
        self.factory
    }

    /// The two tokens traded by the pool.
    #[must_use]
    pub const fn pair(&self) -> TokenPair {
        self.pair
    }

    /// `(reserve_a, reserve_b, block_timestamp_last)`.
    pub const fn reserves(&self) -> (Amount, Amount, u64) {
        (self.reserve_a, self.reserve_b, self.block_timestamp_last)
    }

    /// Cumulative UQ112.112 prices `(B per A, A per B)` times seconds.
    ///
    /// Both values wrap modulo `2^256`; consumers take differences with
    /// [`oracle::average_price`](super::oracle::average_price).
    #[must_use]
    pub const fn price_cumulatives(&self) -> (U256, U256) {
        (self.price_a_cumulative, self.price_b_cumulative)
    }

    /// `reserve_a * reserve_b` as of the last liquidity event while the
    /// protocol fee was on, zero otherwise.
    #[must_use]
    pub const fn k_last(&self) -> U256 {
        self.k_last
    }

    /// Returns `true` while a pool operation is in flight.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        !self.unlocked
    }

    pub(crate) fn lock(&mut self) -> Result<(), AmmError> {
        if !self.unlocked {
            return Err(AmmError::Locked);
        }
        self.unlocked = false;
        Ok(())
    }

    pub(crate) fn unlock(&mut self) {
        self.unlocked = true;
    }

    pub(crate) fn set_k_last(&mut self, k_last: U256) {
        self.k_last = k_last;
    }

    /// Folds the elapsed time into the accumulators using the stored
    /// reserves, then stores the new ones.
    pub(crate) fn commit(&mut self, balance_a: Amount, balance_b: Amount, now: u64) {
        let elapsed = now.saturating_sub(self.block_timestamp_last);
        if elapsed > 0 && !self.reserve_a.is_zero() && !self.reserve_b.is_zero() {
            self.price_a_cumulative =
                oracle::accumulate(self.price_a_cumulative, self.reserve_b, self.reserve_a, elapsed);
            self.price_b_cumulative =
                oracle::accumulate(self.price_b_cumulative, self.reserve_a, self.reserve_b, elapsed);
        }
        self.reserve_a = balance_a;
        self.reserve_b = balance_b;
        self.block_timestamp_last = now;
    }
}
