//! Property-based tests for the pool invariants.
//!
//! 1. **Invariant preservation**: `reserve_a * reserve_b` never decreases
//!    across a swap.
//! 2. **Quote tightness**: paying one unit more than the quote is always
//!    rejected by the pool.
//! 3. **Round trip**: A→B→A returns at most the original input.
//! 4. **Liquidity conservation**: mint then burn returns at most the
//!    deposit.
//! 5. **Requote**: `quote_input(quote_output(x)) <= x`.
//! 6. **Chaining**: `amounts_out` equals repeated single-hop quotes.

use proptest::prelude::*;

use crate::config::ExchangeConfig;
use crate::domain::{Address, Amount, FeeTier, TokenPair};
use crate::ledger::Ledger;
use crate::math::{amounts_out, quote_input, quote_output};

const FEE: FeeTier = FeeTier::TIER_0_30_PERCENT;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

struct Market {
    ledger: Ledger,
    pool: Address,
    token_a: Address,
    token_b: Address,
    trader: Address,
}

/// A pool seeded with `(ra, rb)` and a trader holding plenty of both.
fn market(ra: u128, rb: u128) -> Market {
    let mut ledger = Ledger::new(0);
    let trader = Ledger::account("trader");
    let Ok(factory) = ledger.deploy_factory(trader, ExchangeConfig::default()) else {
        panic!("default config is valid");
    };
    let supply = Amount::new(1u128 << 100);
    let Ok(x) = ledger.deploy_token(trader, supply) else {
        panic!("deploy token");
    };
    let Ok(y) = ledger.deploy_token(trader, supply) else {
        panic!("deploy token");
    };
    let Ok(pool) = ledger.create_pool(factory, x, y) else {
        panic!("new pair");
    };
    let Ok(pair) = TokenPair::new(x, y) else {
        panic!("distinct tokens");
    };
    let (token_a, token_b) = (pair.token_a(), pair.token_b());
    let Ok(()) = ledger.transfer(token_a, trader, pool, Amount::new(ra)) else {
        panic!("funded");
    };
    let Ok(()) = ledger.transfer(token_b, trader, pool, Amount::new(rb)) else {
        panic!("funded");
    };
    let Ok(_) = ledger.mint(trader, pool, trader) else {
        panic!("seed mint");
    };
    Market {
        ledger,
        pool,
        token_a,
        token_b,
        trader,
    }
}

impl Market {
    fn reserves(&self) -> (u128, u128) {
        let Ok(state) = self.ledger.pool_state(self.pool) else {
            panic!("pool exists");
        };
        let (a, b, _) = state.reserves();
        (a.get(), b.get())
    }

    /// Sells `amount_in` of A for the quoted amount of B.
    fn sell_a(&mut self, amount_in: u128) -> Option<u128> {
        let (ra, rb) = self.reserves();
        let out = quote_output(Amount::new(amount_in), Amount::new(ra), Amount::new(rb), FEE).ok()?;
        if out.is_zero() {
            return None;
        }
        self.ledger
            .transfer(self.token_a, self.trader, self.pool, Amount::new(amount_in))
            .ok()?;
        self.ledger
            .swap(self.trader, self.pool, Amount::ZERO, out, self.trader, &[], None)
            .ok()?;
        Some(out.get())
    }

    /// Sells `amount_in` of B for the quoted amount of A.
    fn sell_b(&mut self, amount_in: u128) -> Option<u128> {
        let (ra, rb) = self.reserves();
        let out = quote_output(Amount::new(amount_in), Amount::new(rb), Amount::new(ra), FEE).ok()?;
        if out.is_zero() {
            return None;
        }
        self.ledger
            .transfer(self.token_b, self.trader, self.pool, Amount::new(amount_in))
            .ok()?;
        self.ledger
            .swap(self.trader, self.pool, out, Amount::ZERO, self.trader, &[], None)
            .ok()?;
        Some(out.get())
    }
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserves in [10_000, 10^24], above the locked minimum.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    10_000u128..=1_000_000_000_000_000_000_000_000u128
}

/// Swap size as a fraction of the input reserve, in basis points.
fn fraction_strategy() -> impl Strategy<Value = u128> {
    1u128..=5_000u128
}

fn portion(reserve: u128, bps: u128) -> u128 {
    (reserve / 10_000 * bps).max(1)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_preserves_invariant(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        bps in fraction_strategy(),
    ) {
        let mut m = market(ra, rb);
        let (before_a, before_b) = m.reserves();
        if m.sell_a(portion(ra, bps)).is_none() {
            return Ok(());
        }
        let (after_a, after_b) = m.reserves();
        let k_before = Amount::new(before_a).widen() * Amount::new(before_b).widen();
        let k_after = Amount::new(after_a).widen() * Amount::new(after_b).widen();
        prop_assert!(k_after >= k_before, "k decreased: {} < {}", k_after, k_before);
    }

    #[test]
    fn prop_output_above_quote_rejected(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        bps in fraction_strategy(),
    ) {
        let mut m = market(ra, rb);
        let amount_in = portion(ra, bps);
        let Ok(out) = quote_output(Amount::new(amount_in), Amount::new(ra), Amount::new(rb), FEE) else {
            return Ok(());
        };
        let greedy = Amount::new(out.get() + 1);
        if greedy.get() >= rb {
            return Ok(());
        }
        let Ok(()) = m.ledger.transfer(m.token_a, m.trader, m.pool, Amount::new(amount_in)) else {
            panic!("funded");
        };
        let result = m.ledger.swap(m.trader, m.pool, Amount::ZERO, greedy, m.trader, &[], None);
        prop_assert!(result.is_err());
        prop_assert_eq!(m.reserves(), (ra, rb));
    }

    #[test]
    fn prop_round_trip_loses_value(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        bps in fraction_strategy(),
    ) {
        let mut m = market(ra, rb);
        let amount_in = portion(ra, bps);
        let Some(received_b) = m.sell_a(amount_in) else {
            return Ok(());
        };
        let Some(final_a) = m.sell_b(received_b) else {
            return Ok(());
        };
        prop_assert!(
            final_a <= amount_in,
            "round-trip should lose value: final={} > original={}",
            final_a, amount_in
        );
    }

    #[test]
    fn prop_mint_burn_round_trip(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        bps in fraction_strategy(),
    ) {
        let mut m = market(ra, rb);
        let deposit_a = portion(ra, bps);
        let deposit_b = portion(rb, bps);
        let Ok(()) = m.ledger.transfer(m.token_a, m.trader, m.pool, Amount::new(deposit_a)) else {
            panic!("funded");
        };
        let Ok(()) = m.ledger.transfer(m.token_b, m.trader, m.pool, Amount::new(deposit_b)) else {
            panic!("funded");
        };
        let Ok(shares) = m.ledger.mint(m.trader, m.pool, m.trader) else {
            return Ok(());
        };
        let Ok(()) = m.ledger.transfer(m.pool, m.trader, m.pool, shares) else {
            panic!("holds shares");
        };
        let Ok((out_a, out_b)) = m.ledger.burn(m.trader, m.pool, m.trader) else {
            return Ok(());
        };
        prop_assert!(out_a.get() <= deposit_a, "a: {} > {}", out_a, deposit_a);
        prop_assert!(out_b.get() <= deposit_b, "b: {} > {}", out_b, deposit_b);
    }

    #[test]
    fn prop_requote_never_exceeds_input(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        bps in fraction_strategy(),
    ) {
        let amount_in = Amount::new(portion(ra, bps));
        let (reserve_in, reserve_out) = (Amount::new(ra), Amount::new(rb));
        let Ok(out) = quote_output(amount_in, reserve_in, reserve_out, FEE) else {
            return Ok(());
        };
        if out.is_zero() {
            return Ok(());
        }
        let Ok(needed) = quote_input(out, reserve_in, reserve_out, FEE) else {
            panic!("output below reserve is quotable");
        };
        prop_assert!(needed <= amount_in, "requote {} > {}", needed, amount_in);
    }

    #[test]
    fn prop_chain_matches_single_hops(
        r0 in reserve_strategy(),
        r1 in reserve_strategy(),
        r2 in reserve_strategy(),
        bps in fraction_strategy(),
    ) {
        let amount_in = Amount::new(portion(r0, bps));
        let hops = [(Amount::new(r0), Amount::new(r1)), (Amount::new(r1), Amount::new(r2))];
        let Ok(chain) = amounts_out(amount_in, &hops, FEE) else {
            return Ok(());
        };
        let Ok(first) = quote_output(amount_in, hops[0].0, hops[0].1, FEE) else {
            panic!("chain succeeded");
        };
        let Ok(second) = quote_output(first, hops[1].0, hops[1].1, FEE) else {
            panic!("chain succeeded");
        };
        prop_assert_eq!(chain, vec![amount_in, first, second]);
    }
}
