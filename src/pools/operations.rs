//! Pool entry points: `mint`, `burn`, `swap`, `skim` and `sync`.
//!
//! Every entry point follows the same shape:
//!
//! 1. snapshot the ledger ([`Ledger::atomic`]) and take the pool lock;
//! 2. read the pool's real token balances and compare them with the
//!    stored reserves to learn what was deposited;
//! 3. pay out, validate, then commit balances as the new reserves,
//!    advancing the price accumulators;
//! 4. release the lock. On error the snapshot is restored instead.
//!
//! Callers deposit by transferring tokens to the pool address before
//! calling in; the router does this for ordinary users.

use primitive_types::U256;
use tracing::debug;

use super::PoolState;
use crate::config::ExchangeConfig;
use crate::domain::{Address, Amount, Event, Rounding, Side, TokenPair};
use crate::error::AmmError;
use crate::ledger::Ledger;
use crate::math::{check_invariant, isqrt, mul_div, SwapSettlement};
use crate::traits::FlashSwapCallee;

impl Ledger {
    /// State of the pool at `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::PoolNotFound`] if no pool lives there.
    pub fn pool_state(&self, pool: Address) -> Result<&PoolState, AmmError> {
        self.pools.get(&pool).ok_or(AmmError::PoolNotFound)
    }

    pub(crate) fn pool_state_mut(&mut self, pool: Address) -> Result<&mut PoolState, AmmError> {
        self.pools.get_mut(&pool).ok_or(AmmError::PoolNotFound)
    }

    /// Mints shares to `to` for whatever was deposited since the last
    /// reserve update.
    ///
    /// The first mint issues `isqrt(amount_a * amount_b)` shares, of which
    /// `minimum_liquidity` go to the zero address forever. Later mints
    /// issue the smaller of the two proportional amounts, so depositing
    /// off-ratio donates the excess to existing holders.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityMinted`] if no share would be
    ///   issued.
    /// - [`AmmError::Overflow`] if a reserve would exceed its bound.
    /// - [`AmmError::Locked`] if the pool is mid-operation.
    pub fn mint(&mut self, caller: Address, pool: Address, to: Address) -> Result<Amount, AmmError> {
        self.locked(pool, |ledger| {
            let (pair, reserve_a, reserve_b, config) = ledger.pool_context(pool)?;
            let (balance_a, balance_b) = ledger.pool_balances(pool, pair);
            let amount_a = deposited(balance_a, reserve_a)?;
            let amount_b = deposited(balance_b, reserve_b)?;

            let fee_on = ledger.mint_protocol_fee(pool, reserve_a, reserve_b)?;
            let total = ledger.total_supply(pool);
            let shares = if total.is_zero() {
                let product = amount_a
                    .widen()
                    .checked_mul(amount_b.widen())
                    .ok_or(AmmError::Overflow("initial deposit product"))?;
                let root = Amount::narrow(isqrt(product), "initial shares")?;
                let minimum = config.minimum_liquidity();
                let shares = root
                    .checked_sub(&minimum)
                    .ok_or(AmmError::InsufficientLiquidityMinted)?;
                ledger.mint_tokens(pool, Address::ZERO, minimum)?;
                shares
            } else {
                let by_a = proportional(amount_a, total, reserve_a)?;
                let by_b = proportional(amount_b, total, reserve_b)?;
                by_a.min(by_b)
            };
            if shares.is_zero() {
                return Err(AmmError::InsufficientLiquidityMinted);
            }
            ledger.mint_tokens(pool, to, shares)?;

            ledger.update(pool, balance_a, balance_b, &config)?;
            if fee_on {
                ledger.refresh_k_last(pool, balance_a, balance_b)?;
            }
            ledger.emit(Event::Mint {
                pool,
                sender: caller,
                amount_a,
                amount_b,
            });
            debug!(%pool, %to, %amount_a, %amount_b, %shares, "mint");
            Ok(shares)
        })
    }

    /// Burns the shares held by the pool itself and pays `to` their
    /// pro-rata slice of both balances.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidityBurned`] if either payout would
    ///   be zero.
    /// - [`AmmError::Locked`] if the pool is mid-operation.
    pub fn burn(
        &mut self,
        caller: Address,
        pool: Address,
        to: Address,
    ) -> Result<(Amount, Amount), AmmError> {
        self.locked(pool, |ledger| {
            let (pair, reserve_a, reserve_b, config) = ledger.pool_context(pool)?;
            let (balance_a, balance_b) = ledger.pool_balances(pool, pair);
            let shares = ledger.balance_of(pool, pool);

            let fee_on = ledger.mint_protocol_fee(pool, reserve_a, reserve_b)?;
            let total = ledger.total_supply(pool);
            let amount_a = pro_rata(shares, balance_a, total)?;
            let amount_b = pro_rata(shares, balance_b, total)?;
            if amount_a.is_zero() || amount_b.is_zero() {
                return Err(AmmError::InsufficientLiquidityBurned);
            }
            ledger.burn_tokens(pool, pool, shares)?;
            ledger.transfer(pair.token_a(), pool, to, amount_a)?;
            ledger.transfer(pair.token_b(), pool, to, amount_b)?;

            let (balance_a, balance_b) = ledger.pool_balances(pool, pair);
            ledger.update(pool, balance_a, balance_b, &config)?;
            if fee_on {
                ledger.refresh_k_last(pool, balance_a, balance_b)?;
            }
            ledger.emit(Event::Burn {
                pool,
                sender: caller,
                amount_a,
                amount_b,
                to,
            });
            debug!(%pool, %to, %shares, %amount_a, %amount_b, "burn");
            Ok((amount_a, amount_b))
        })
    }

    /// Sends the requested outputs to `to`, optionally lets `callee` act,
    /// then checks that enough input arrived to keep the fee-adjusted
    /// reserve product from shrinking.
    ///
    /// With empty `data` this is a plain swap: the input must already sit
    /// in the pool. With non-empty `data` it is a flash swap: `callee`
    /// runs after the payout and may repay in either token. Both outputs
    /// may be non-zero at once.
    ///
    /// # Errors
    ///
    /// - [`AmmError::InsufficientLiquidity`] if the pool is empty.
    /// - [`AmmError::InvalidOutputAmount`] if both outputs are zero or one
    ///   of them reaches its reserve.
    /// - [`AmmError::InvalidRecipient`] if `to` is one of the pool's tokens.
    /// - [`AmmError::InvalidCallback`] if `data` is non-empty and no callee
    ///   was given.
    /// - [`AmmError::InsufficientInputAmount`] if nothing was paid in.
    /// - [`AmmError::InvariantViolation`] if too little was paid in.
    /// - [`AmmError::Locked`] if the pool is mid-operation, including
    ///   re-entry from `callee`.
    /// - Any error returned by `callee`.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &mut self,
        caller: Address,
        pool: Address,
        amount_a_out: Amount,
        amount_b_out: Amount,
        to: Address,
        data: &[u8],
        callee: Option<&mut dyn FlashSwapCallee>,
    ) -> Result<(), AmmError> {
        self.locked(pool, |ledger| {
            if amount_a_out.is_zero() && amount_b_out.is_zero() {
                return Err(AmmError::InvalidOutputAmount);
            }
            let (pair, reserve_a, reserve_b, config) = ledger.pool_context(pool)?;
            if reserve_a.is_zero() || reserve_b.is_zero() {
                return Err(AmmError::InsufficientLiquidity);
            }
            if amount_a_out >= reserve_a || amount_b_out >= reserve_b {
                return Err(AmmError::InvalidOutputAmount);
            }
            if pair.contains(&to) {
                return Err(AmmError::InvalidRecipient);
            }

            if !amount_a_out.is_zero() {
                ledger.transfer(pair.token_a(), pool, to, amount_a_out)?;
            }
            if !amount_b_out.is_zero() {
                ledger.transfer(pair.token_b(), pool, to, amount_b_out)?;
            }
            if !data.is_empty() {
                let callee = callee.ok_or(AmmError::InvalidCallback)?;
                callee.on_flash_swap(ledger, caller, amount_a_out, amount_b_out, data)?;
            }

            let (balance_a, balance_b) = ledger.pool_balances(pool, pair);
            // outputs are strictly below their reserves, checked above
            let amount_a_in = balance_a.saturating_sub(&reserve_a.saturating_sub(&amount_a_out));
            let amount_b_in = balance_b.saturating_sub(&reserve_b.saturating_sub(&amount_b_out));
            if amount_a_in.is_zero() && amount_b_in.is_zero() {
                return Err(AmmError::InsufficientInputAmount);
            }
            let settlement = SwapSettlement {
                balance_a,
                balance_b,
                amount_a_in,
                amount_b_in,
            };
            check_invariant(&settlement, reserve_a, reserve_b, config.swap_fee())?;

            ledger.update(pool, balance_a, balance_b, &config)?;
            ledger.emit_swaps(pool, caller, to, pair, &settlement, (amount_a_out, amount_b_out));
            Ok(())
        })
    }

    /// Sends any balance above the reserves to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::Locked`] if the pool is mid-operation.
    pub fn skim(&mut self, caller: Address, pool: Address, to: Address) -> Result<(), AmmError> {
        self.locked(pool, |ledger| {
            let (pair, reserve_a, reserve_b, _) = ledger.pool_context(pool)?;
            let (balance_a, balance_b) = ledger.pool_balances(pool, pair);
            let excess_a = balance_a.saturating_sub(&reserve_a);
            let excess_b = balance_b.saturating_sub(&reserve_b);
            for (token, excess) in [(pair.token_a(), excess_a), (pair.token_b(), excess_b)] {
                if !excess.is_zero() {
                    ledger.transfer(token, pool, to, excess)?;
                }
            }
            debug!(%pool, %caller, %to, %excess_a, %excess_b, "skim");
            Ok(())
        })
    }

    /// Adopts the current balances as reserves.
    ///
    /// # Errors
    ///
    /// - [`AmmError::Overflow`] if a balance exceeds the reserve bound.
    /// - [`AmmError::Locked`] if the pool is mid-operation.
    pub fn sync(&mut self, caller: Address, pool: Address) -> Result<(), AmmError> {
        self.locked(pool, |ledger| {
            let (pair, _, _, config) = ledger.pool_context(pool)?;
            let (balance_a, balance_b) = ledger.pool_balances(pool, pair);
            ledger.update(pool, balance_a, balance_b, &config)?;
            debug!(%pool, %caller, %balance_a, %balance_b, "sync");
            Ok(())
        })
    }

    /// Runs `operation` atomically while holding the pool's lock.
    fn locked<T>(
        &mut self,
        pool: Address,
        operation: impl FnOnce(&mut Self) -> Result<T, AmmError>,
    ) -> Result<T, AmmError> {
        self.atomic(|ledger| {
            ledger.pool_state_mut(pool)?.lock()?;
            let result = operation(ledger);
            ledger.pool_state_mut(pool)?.unlock();
            result
        })
    }

    fn pool_context(
        &self,
        pool: Address,
    ) -> Result<(TokenPair, Amount, Amount, ExchangeConfig), AmmError> {
        let state = self.pool_state(pool)?;
        let (reserve_a, reserve_b, _) = state.reserves();
        let config = self.factory(state.factory())?.config();
        Ok((state.pair(), reserve_a, reserve_b, config))
    }

    fn pool_balances(&self, pool: Address, pair: TokenPair) -> (Amount, Amount) {
        (
            self.balance_of(pair.token_a(), pool),
            self.balance_of(pair.token_b(), pool),
        )
    }

    fn update(
        &mut self,
        pool: Address,
        balance_a: Amount,
        balance_b: Amount,
        config: &ExchangeConfig,
    ) -> Result<(), AmmError> {
        if balance_a > config.max_reserve() || balance_b > config.max_reserve() {
            return Err(AmmError::Overflow("reserve exceeds bound"));
        }
        let now = self.now();
        self.pool_state_mut(pool)?.commit(balance_a, balance_b, now);
        self.emit(Event::Sync {
            pool,
            reserve_a: balance_a,
            reserve_b: balance_b,
        });
        Ok(())
    }

    fn refresh_k_last(
        &mut self,
        pool: Address,
        reserve_a: Amount,
        reserve_b: Amount,
    ) -> Result<(), AmmError> {
        let k = reserve_a
            .widen()
            .checked_mul(reserve_b.widen())
            .ok_or(AmmError::Overflow("k_last"))?;
        self.pool_state_mut(pool)?.set_k_last(k);
        Ok(())
    }

    /// One `Swap` event per non-zero output side.
    fn emit_swaps(
        &mut self,
        pool: Address,
        sender: Address,
        to: Address,
        pair: TokenPair,
        settlement: &SwapSettlement,
        (amount_a_out, amount_b_out): (Amount, Amount),
    ) {
        let amount_in = |side: Side| match side {
            Side::A => settlement.amount_a_in,
            Side::B => settlement.amount_b_in,
        };
        for (side, amount_out) in [(Side::A, amount_a_out), (Side::B, amount_b_out)] {
            if amount_out.is_zero() {
                continue;
            }
            let paid_side = if amount_in(side.other()).is_zero() {
                side
            } else {
                side.other()
            };
            let event = Event::Swap {
                pool,
                sender,
                amount_in: amount_in(paid_side),
                token_in: pair.token(paid_side),
                amount_out,
                token_out: pair.token(side),
                to,
            };
            debug!(%pool, %amount_out, amount_in = %amount_in(paid_side), "swap");
            self.emit(event);
        }
    }
}

fn deposited(balance: Amount, reserve: Amount) -> Result<Amount, AmmError> {
    balance
        .checked_sub(&reserve)
        .ok_or(AmmError::Overflow("balance below reserve"))
}

/// `amount * total / reserve`, rounded down.
fn proportional(amount: Amount, total: Amount, reserve: Amount) -> Result<Amount, AmmError> {
    if reserve.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let product = amount
        .widen()
        .checked_mul(total.widen())
        .ok_or(AmmError::Overflow("share product"))?;
    mul_div(product, reserve.widen(), Rounding::Down, "minted shares")
}

/// `shares * balance / total`, rounded down.
fn pro_rata(shares: Amount, balance: Amount, total: Amount) -> Result<Amount, AmmError> {
    if total.is_zero() {
        return Err(AmmError::InsufficientLiquidityBurned);
    }
    let product: U256 = shares
        .widen()
        .checked_mul(balance.widen())
        .ok_or(AmmError::Overflow("burn product"))?;
    mul_div(product, total.widen(), Rounding::Down, "burned amount")
}
