//! Protocol share of swap fees, collected as newly minted pool shares.
//!
//! Fees accrue to the pool as growth in `sqrt(reserve_a * reserve_b)`.
//! Instead of skimming tokens on every swap, the pool records `k_last`
//! at each liquidity event and, at the next one, mints the fee recipient
//! enough shares to own `1/d` of the growth since then:
//!
//! ```text
//! shares = total * (√k − √k_last) / (√k * (d − 1) + √k_last)
//! ```

use primitive_types::U256;
use tracing::debug;

use crate::domain::{Address, Amount, Rounding};
use crate::error::AmmError;
use crate::ledger::Ledger;
use crate::math::{isqrt, mul_div};

impl Ledger {
    /// Mints the protocol's accrued share and reports whether the
    /// protocol fee is on. Clears `k_last` when it is off.
    pub(crate) fn mint_protocol_fee(
        &mut self,
        pool: Address,
        reserve_a: Amount,
        reserve_b: Amount,
    ) -> Result<bool, AmmError> {
        let state = self.pool_state(pool)?;
        let k_last = state.k_last();
        let factory = self.factory(state.factory())?;
        let divisor = factory.config().protocol_fee_divisor();

        let Some(recipient) = factory.fee_to() else {
            if !k_last.is_zero() {
                self.pool_state_mut(pool)?.set_k_last(U256::zero());
            }
            return Ok(false);
        };
        if k_last.is_zero() {
            return Ok(true);
        }

        let k = reserve_a
            .widen()
            .checked_mul(reserve_b.widen())
            .ok_or(AmmError::Overflow("protocol fee k"))?;
        let root_k = isqrt(k);
        let root_k_last = isqrt(k_last);
        if root_k <= root_k_last {
            return Ok(true);
        }

        let total = self.total_supply(pool).widen();
        let numerator = total
            .checked_mul(root_k - root_k_last)
            .ok_or(AmmError::Overflow("protocol fee numerator"))?;
        let denominator = root_k
            .checked_mul(U256::from(divisor - 1))
            .and_then(|scaled| scaled.checked_add(root_k_last))
            .ok_or(AmmError::Overflow("protocol fee denominator"))?;
        let shares = mul_div(numerator, denominator, Rounding::Down, "protocol fee shares")?;
        if !shares.is_zero() {
            self.mint_tokens(pool, recipient, shares)?;
            debug!(%pool, %recipient, %shares, "protocol fee minted");
        }
        Ok(true)
    }
}
