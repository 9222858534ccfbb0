//! Full exchange deployment walkthrough.
//!
//! Deploys two tokens, a wrapped-native token and its partner, a factory
//! and a router; seeds both pools; then trades on each, reads the price
//! accumulators and withdraws with the protocol fee switched on.
//!
//! # Run
//!
//! ```bash
//! cargo run --example fixture
//! ```

use simswap::domain::{Address, Amount, SwapPath};
use simswap::factory::pool_address;
use simswap::ledger::Ledger;
use simswap::prelude::{ExchangeConfig, Router, TokenPair};

const E18: u128 = 1_000_000_000_000_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Simswap deployment ===\n");

    // ── 1. Host and accounts ────────────────────────────────────────────
    let mut ledger = Ledger::new(1_700_000_000);
    let wallet = Ledger::account("wallet");
    let treasury = Ledger::account("treasury");
    let supply = Amount::new(10_000 * E18);
    ledger.fund_native(wallet, supply)?;

    // ── 2. Tokens ───────────────────────────────────────────────────────
    let token_x = ledger.deploy_token(wallet, supply)?;
    let token_y = ledger.deploy_token(wallet, supply)?;
    let weth = ledger.deploy_wrapped_native();
    let weth_partner = ledger.deploy_token(wallet, supply)?;

    // ── 3. Factory, fee switch and router ───────────────────────────────
    let factory = ledger.deploy_factory(wallet, ExchangeConfig::default())?;
    ledger.set_fee_recipient(wallet, factory, treasury)?;
    ledger.set_fee_on(wallet, factory, true)?;
    let router = Router::deploy(&mut ledger, factory, weth)?;

    for token in [token_x, token_y, weth_partner] {
        ledger.approve(token, wallet, router.address(), Amount::MAX);
    }

    // ── 4. Pools ────────────────────────────────────────────────────────
    let pool = ledger.create_pool(factory, token_x, token_y)?;
    ledger.approve(pool, wallet, router.address(), Amount::MAX);
    let predicted = pool_address(factory, &TokenPair::new(token_y, token_x)?);
    println!("Pool X/Y       : {pool}");
    println!("  predicted    : {predicted}");

    let deadline = ledger.now() + 600;
    let (x, y, shares) = router.add_liquidity(
        &mut ledger,
        wallet,
        token_x,
        token_y,
        Amount::new(1_000 * E18),
        Amount::new(4_000 * E18),
        Amount::ZERO,
        Amount::ZERO,
        wallet,
        deadline,
    )?;
    println!("Seeded X/Y     : {x} X + {y} Y -> {shares} shares");

    let (partner, native, weth_shares) = router.add_liquidity_native(
        &mut ledger,
        wallet,
        weth_partner,
        Amount::new(100 * E18),
        Amount::new(2_000 * E18),
        Amount::ZERO,
        Amount::ZERO,
        wallet,
        deadline,
    )?;
    println!("Seeded WETH/P  : {native} native + {partner} P -> {weth_shares} shares");
    println!("Pools created  : {}\n", ledger.factory(factory)?.all_pools_len());

    // ── 5. Swaps ────────────────────────────────────────────────────────
    let path = SwapPath::new(vec![token_x, token_y])?;
    let quote = router.get_amounts_out(&ledger, Amount::new(E18), &path)?;
    let amounts = router.swap_exact_tokens_for_tokens(
        &mut ledger,
        wallet,
        Amount::new(E18),
        quote[1],
        &path,
        wallet,
        deadline,
    )?;
    println!("Sold 1 X       : received {} Y", amounts[1]);

    let buy = SwapPath::new(vec![weth, weth_partner])?;
    let amounts = router.swap_exact_native_for_tokens(
        &mut ledger,
        wallet,
        Amount::new(E18),
        Amount::ZERO,
        &buy,
        wallet,
        deadline,
    )?;
    println!("Sold 1 native  : received {} P", amounts[1]);

    let sell = SwapPath::new(vec![weth_partner, weth])?;
    let amounts = router.swap_tokens_for_exact_native(
        &mut ledger,
        wallet,
        Amount::new(E18 / 2),
        Amount::MAX,
        &sell,
        wallet,
        deadline,
    )?;
    println!("Bought 0.5 nat : paid {} P\n", amounts[0]);

    // ── 6. Oracle and protocol fee ──────────────────────────────────────
    ledger.advance_time(60);
    ledger.sync(wallet, pool)?;
    let state = ledger.pool_state(pool)?;
    let (cumulative_a, cumulative_b) = state.price_cumulatives();
    println!("Cumulative A   : {cumulative_a}");
    println!("Cumulative B   : {cumulative_b}");

    let (removed_x, removed_y) = router.remove_liquidity(
        &mut ledger,
        wallet,
        token_x,
        token_y,
        Amount::new(shares.get() / 2),
        Amount::ZERO,
        Amount::ZERO,
        wallet,
        deadline,
    )?;
    println!("Removed half   : {removed_x} X + {removed_y} Y");
    println!("Treasury shares: {}", ledger.balance_of(pool, treasury));

    // ── 7. Event log ────────────────────────────────────────────────────
    println!("\nEvents emitted : {}", ledger.events().len());
    let burn_address = Address::ZERO;
    println!("Locked shares  : {}", ledger.balance_of(pool, burn_address));

    Ok(())
}
