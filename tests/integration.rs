//! End-to-end flows through the public API: a full deployment with two
//! ordinary tokens, a wrapped-native token and its partner, a factory, a
//! router and one pool for each pair.

#![allow(clippy::panic)]

use primitive_types::U256;
use simswap::pools::oracle::{apply_price, average_price, encode_price};
use simswap::prelude::*;

const E18: u128 = 1_000_000_000_000_000_000;
const START: u64 = 1_000;
const MINIMUM_LIQUIDITY: u128 = 1_000;

struct Fixture {
    ledger: Ledger,
    wallet: Address,
    token_a: Address,
    token_b: Address,
    weth: Address,
    weth_partner: Address,
    factory: Address,
    router: Router,
    pool: Address,
    weth_pool: Address,
}

fn fixture() -> Fixture {
    let mut ledger = Ledger::new(START);
    let wallet = Ledger::account("wallet");
    let supply = Amount::new(10_000 * E18);

    let Ok(x) = ledger.deploy_token(wallet, supply) else {
        panic!("deploy token");
    };
    let Ok(y) = ledger.deploy_token(wallet, supply) else {
        panic!("deploy token");
    };
    let weth = ledger.deploy_wrapped_native();
    let Ok(weth_partner) = ledger.deploy_token(wallet, supply) else {
        panic!("deploy token");
    };

    let Ok(factory) = ledger.deploy_factory(wallet, ExchangeConfig::default()) else {
        panic!("default config is valid");
    };
    let Ok(router) = Router::deploy(&mut ledger, factory, weth) else {
        panic!("router deploys");
    };

    let Ok(pool) = ledger.create_pool(factory, x, y) else {
        panic!("first pool");
    };
    let Ok(state) = ledger.pool_state(pool) else {
        panic!("pool registered");
    };
    let (token_a, token_b) = (state.pair().token_a(), state.pair().token_b());
    let Ok(weth_pool) = ledger.create_pool(factory, weth, weth_partner) else {
        panic!("second pool");
    };

    for token in [token_a, token_b, weth, weth_partner] {
        ledger.approve(token, wallet, router.address(), Amount::MAX);
    }
    for pool in [pool, weth_pool] {
        ledger.approve(pool, wallet, router.address(), Amount::MAX);
    }
    let Ok(()) = ledger.fund_native(wallet, supply) else {
        panic!("fund native");
    };

    Fixture {
        ledger,
        wallet,
        token_a,
        token_b,
        weth,
        weth_partner,
        factory,
        router,
        pool,
        weth_pool,
    }
}

impl Fixture {
    /// Deposits straight into `pool` and mints to the wallet.
    fn provide(&mut self, pool: Address, amount_a: u128, amount_b: u128) -> Amount {
        let Ok(state) = self.ledger.pool_state(pool) else {
            panic!("pool exists");
        };
        let pair = state.pair();
        let Ok(()) = self
            .ledger
            .transfer(pair.token_a(), self.wallet, pool, Amount::new(amount_a))
        else {
            panic!("deposit a");
        };
        let Ok(()) = self
            .ledger
            .transfer(pair.token_b(), self.wallet, pool, Amount::new(amount_b))
        else {
            panic!("deposit b");
        };
        let Ok(shares) = self.ledger.mint(self.wallet, pool, self.wallet) else {
            panic!("mint");
        };
        shares
    }

    fn reserves(&self, pool: Address) -> (Amount, Amount) {
        let Ok(state) = self.ledger.pool_state(pool) else {
            panic!("pool exists");
        };
        let (a, b, _) = state.reserves();
        (a, b)
    }

    fn path(&self, tokens: Vec<Address>) -> SwapPath {
        let Ok(path) = SwapPath::new(tokens) else {
            panic!("valid path");
        };
        path
    }
}

#[test]
fn fixture_registers_both_pools() {
    let f = fixture();
    let Ok(factory) = f.ledger.factory(f.factory) else {
        panic!("factory deployed");
    };
    assert_eq!(factory.all_pools(), &[f.pool, f.weth_pool]);
    assert_eq!(factory.pool(f.token_b, f.token_a), Some(f.pool));
    assert_eq!(factory.pool(f.weth_partner, f.weth), Some(f.weth_pool));
    let Ok(pair) = TokenPair::new(f.token_b, f.token_a) else {
        panic!("distinct tokens");
    };
    assert_eq!(pool_address(f.factory, &pair), f.pool);
    assert!(f.token_a < f.token_b);
}

#[test]
fn first_mint_locks_minimum_liquidity() {
    let mut f = fixture();
    let shares = f.provide(f.pool, 1_000, 4_000);
    // sqrt(1_000 * 4_000) = 2_000, minus the locked 1_000
    assert_eq!(shares, Amount::new(1_000));
    assert_eq!(f.ledger.total_supply(f.pool), Amount::new(2_000));
    assert_eq!(
        f.ledger.balance_of(f.pool, Address::ZERO),
        Amount::new(MINIMUM_LIQUIDITY)
    );
    assert_eq!(f.reserves(f.pool), (Amount::new(1_000), Amount::new(4_000)));
}

#[test]
fn deadline_is_inclusive() {
    let mut f = fixture();
    let now = f.ledger.now();
    let (a, b, wallet) = (f.token_a, f.token_b, f.wallet);
    let expired = f.router.add_liquidity(
        &mut f.ledger,
        wallet,
        a,
        b,
        Amount::new(E18),
        Amount::new(E18),
        Amount::ZERO,
        Amount::ZERO,
        wallet,
        now - 1,
    );
    assert_eq!(expired, Err(AmmError::Expired));
    let Ok((_, _, shares)) = f.router.add_liquidity(
        &mut f.ledger,
        wallet,
        a,
        b,
        Amount::new(E18),
        Amount::new(E18),
        Amount::ZERO,
        Amount::ZERO,
        wallet,
        now,
    ) else {
        panic!("deadline equal to now is still valid");
    };
    assert_eq!(shares, Amount::new(E18 - MINIMUM_LIQUIDITY));
}

#[test]
fn swap_exact_tokens_matches_reference_vector() {
    let mut f = fixture();
    let _shares = f.provide(f.pool, 5 * E18, 10 * E18);
    let path = f.path(vec![f.token_a, f.token_b]);
    let (wallet, now) = (f.wallet, f.ledger.now());
    let events_before = f.ledger.events().len();
    let Ok(amounts) = f.router.swap_exact_tokens_for_tokens(
        &mut f.ledger,
        wallet,
        Amount::new(E18),
        Amount::ZERO,
        &path,
        wallet,
        now,
    ) else {
        panic!("swap");
    };
    let expected = Amount::new(1_662_497_915_624_478_906);
    assert_eq!(amounts, vec![Amount::new(E18), expected]);
    assert_eq!(
        f.reserves(f.pool),
        (Amount::new(6 * E18), Amount::new(10 * E18 - expected.get()))
    );
    // transfer in, transfer out, sync, swap
    let emitted = &f.ledger.events()[events_before..];
    assert!(matches!(emitted.last(), Some(Event::Swap { amount_out, .. }) if *amount_out == expected));
    assert!(emitted.iter().any(|e| matches!(e, Event::Sync { .. })));
}

#[test]
fn two_hop_swap_moves_only_endpoints() {
    let mut f = fixture();
    let Ok(_) = f
        .ledger
        .deposit_native(f.weth, f.wallet, Amount::new(1_000 * E18))
    else {
        panic!("wrap");
    };
    // token_a -> weth -> weth_partner
    let wallet = f.wallet;
    let now = f.ledger.now();
    let (a, weth, partner) = (f.token_a, f.weth, f.weth_partner);
    for (x, y) in [(a, weth), (weth, partner)] {
        let Ok(_) = f.router.add_liquidity(
            &mut f.ledger,
            wallet,
            x,
            y,
            Amount::new(100 * E18),
            Amount::new(100 * E18),
            Amount::ZERO,
            Amount::ZERO,
            wallet,
            now,
        ) else {
            panic!("seed");
        };
    }
    let path = f.path(vec![a, weth, partner]);
    let weth_before = f.ledger.balance_of(weth, wallet);
    let partner_before = f.ledger.balance_of(partner, wallet);
    let Ok(amounts) = f.router.swap_exact_tokens_for_tokens(
        &mut f.ledger,
        wallet,
        Amount::new(E18),
        Amount::ZERO,
        &path,
        wallet,
        now,
    ) else {
        panic!("two hops");
    };
    assert_eq!(amounts.len(), 3);
    assert!(amounts[2] < amounts[1] && amounts[1] < amounts[0]);
    assert_eq!(f.ledger.balance_of(weth, wallet), weth_before);
    assert_eq!(
        f.ledger.balance_of(partner, wallet),
        Amount::new(partner_before.get() + amounts[2].get())
    );
}

#[test]
fn failed_flash_swap_leaves_no_trace() {
    let mut f = fixture();
    let _shares = f.provide(f.pool, 1_000 * E18, 1_000 * E18);
    let borrower = Ledger::account("borrower");
    let Ok(()) = f
        .ledger
        .transfer(f.token_a, f.wallet, borrower, Amount::new(E18))
    else {
        panic!("fund borrower");
    };
    let before = f.ledger.clone();
    let (pool, token_a) = (f.pool, f.token_a);

    // repays the principal but not the fee
    let mut stingy = |ledger: &mut Ledger,
                      _sender: Address,
                      amount_a: Amount,
                      _amount_b: Amount,
                      _data: &[u8]|
     -> Result<(), AmmError> { ledger.transfer(token_a, borrower, pool, amount_a) };
    let r = f.ledger.swap(
        borrower,
        pool,
        Amount::new(E18),
        Amount::ZERO,
        borrower,
        b"loan",
        Some(&mut stingy),
    );
    assert_eq!(r, Err(AmmError::InvariantViolation));
    assert_eq!(f.ledger.events(), before.events());
    assert_eq!(f.ledger.balance_of(token_a, borrower), Amount::new(E18));
    assert_eq!(f.reserves(pool), {
        let Ok(state) = before.pool_state(pool) else {
            panic!("pool exists");
        };
        let (a, b, _) = state.reserves();
        (a, b)
    });
    let Ok(state) = f.ledger.pool_state(pool) else {
        panic!("pool exists");
    };
    assert!(!state.is_locked());
}

#[test]
fn flash_swap_repaid_with_fee_succeeds() {
    let mut f = fixture();
    let _shares = f.provide(f.pool, 1_000 * E18, 1_000 * E18);
    let borrower = Ledger::account("borrower");
    let Ok(()) = f
        .ledger
        .transfer(f.token_a, f.wallet, borrower, Amount::new(E18))
    else {
        panic!("fund borrower");
    };
    let (pool, token_a) = (f.pool, f.token_a);
    let borrowed = Amount::new(E18);
    // ceil(borrowed / 0.997)
    let repay = Amount::new(E18 * 1_000 / 997 + 1);

    let mut honest = |ledger: &mut Ledger,
                      _sender: Address,
                      _amount_a: Amount,
                      _amount_b: Amount,
                      _data: &[u8]|
     -> Result<(), AmmError> { ledger.transfer(token_a, borrower, pool, repay) };
    let Ok(()) = f.ledger.swap(
        borrower,
        pool,
        borrowed,
        Amount::ZERO,
        borrower,
        b"loan",
        Some(&mut honest),
    ) else {
        panic!("repaid with fee");
    };
    let (reserve_a, _) = f.reserves(pool);
    assert_eq!(
        reserve_a,
        Amount::new(1_000 * E18 - borrowed.get() + repay.get())
    );
}

#[test]
fn callee_cannot_reenter_pool() {
    let mut f = fixture();
    let _shares = f.provide(f.pool, 1_000, 1_000);
    let pool = f.pool;
    let wallet = f.wallet;
    let mut reentrant = |ledger: &mut Ledger,
                         _sender: Address,
                         _amount_a: Amount,
                         _amount_b: Amount,
                         _data: &[u8]|
     -> Result<(), AmmError> { ledger.sync(wallet, pool) };
    let r = f.ledger.swap(
        wallet,
        pool,
        Amount::new(1),
        Amount::ZERO,
        wallet,
        b"x",
        Some(&mut reentrant),
    );
    assert_eq!(r, Err(AmmError::Locked));
    let Ok(()) = f.ledger.sync(wallet, pool) else {
        panic!("lock released after the failed swap");
    };
}

#[test]
fn fee_governance_is_controller_only() {
    let mut f = fixture();
    let intruder = Ledger::account("intruder");
    let factory = f.factory;
    assert_eq!(
        f.ledger.set_fee_on(intruder, factory, true),
        Err(AmmError::Forbidden)
    );
    assert_eq!(
        f.ledger.set_fee_recipient(intruder, factory, intruder),
        Err(AmmError::Forbidden)
    );
    assert_eq!(
        f.ledger.set_fee_controller(intruder, factory, intruder),
        Err(AmmError::Forbidden)
    );
    let Ok(()) = f.ledger.set_fee_controller(f.wallet, factory, intruder) else {
        panic!("controller hands over");
    };
    assert_eq!(
        f.ledger.set_fee_on(f.wallet, factory, true),
        Err(AmmError::Forbidden)
    );
    let Ok(()) = f.ledger.set_fee_on(intruder, factory, true) else {
        panic!("new controller");
    };
}

#[test]
fn protocol_fee_is_minted_on_next_liquidity_event() {
    let mut f = fixture();
    let treasury = Ledger::account("treasury");
    let (wallet, factory, pool) = (f.wallet, f.factory, f.pool);
    let Ok(()) = f.ledger.set_fee_recipient(wallet, factory, treasury) else {
        panic!("recipient");
    };
    let Ok(()) = f.ledger.set_fee_on(wallet, factory, true) else {
        panic!("fee on");
    };
    let _shares = f.provide(pool, 1_000 * E18, 1_000 * E18);

    let out = Amount::new(996_006_981_039_903_216);
    let Ok(()) = f
        .ledger
        .transfer(f.token_b, wallet, pool, Amount::new(E18))
    else {
        panic!("pay in");
    };
    let Ok(()) = f
        .ledger
        .swap(wallet, pool, out, Amount::ZERO, wallet, &[], None)
    else {
        panic!("swap");
    };

    let Ok(()) = f.ledger.transfer(
        pool,
        wallet,
        pool,
        Amount::new(1_000 * E18 - MINIMUM_LIQUIDITY),
    ) else {
        panic!("return shares");
    };
    let Ok(_) = f.ledger.burn(wallet, pool, wallet) else {
        panic!("burn");
    };

    let fee_shares = 249_750_499_251_388;
    assert_eq!(f.ledger.balance_of(pool, treasury), Amount::new(fee_shares));
    assert_eq!(
        f.ledger.total_supply(pool),
        Amount::new(MINIMUM_LIQUIDITY + fee_shares)
    );
    assert_eq!(
        f.ledger.balance_of(f.token_a, pool),
        Amount::new(1_000 + 249_501_683_697_445)
    );
    assert_eq!(
        f.ledger.balance_of(f.token_b, pool),
        Amount::new(1_000 + 250_000_187_312_969)
    );
}

#[test]
fn protocol_fee_off_mints_nothing() {
    let mut f = fixture();
    let pool = f.pool;
    let _shares = f.provide(pool, 1_000 * E18, 1_000 * E18);
    let wallet = f.wallet;
    let Ok(()) = f.ledger.transfer(f.token_b, wallet, pool, Amount::new(E18)) else {
        panic!("pay in");
    };
    let Ok(()) = f.ledger.swap(
        wallet,
        pool,
        Amount::new(996_006_981_039_903_216),
        Amount::ZERO,
        wallet,
        &[],
        None,
    ) else {
        panic!("swap");
    };
    let Ok(()) = f.ledger.transfer(
        pool,
        wallet,
        pool,
        Amount::new(1_000 * E18 - MINIMUM_LIQUIDITY),
    ) else {
        panic!("return shares");
    };
    let Ok(_) = f.ledger.burn(wallet, pool, wallet) else {
        panic!("burn");
    };
    assert_eq!(f.ledger.total_supply(pool), Amount::new(MINIMUM_LIQUIDITY));
}

#[test]
fn price_accumulators_track_time_weighted_price() {
    let mut f = fixture();
    let pool = f.pool;
    let _shares = f.provide(pool, 1_000, 4_000);
    let Ok(state) = f.ledger.pool_state(pool) else {
        panic!("pool exists");
    };
    let (start_a, start_b) = state.price_cumulatives();
    assert_eq!((start_a, start_b), (U256::zero(), U256::zero()));

    f.ledger.advance_time(10);
    let Ok(()) = f.ledger.sync(f.wallet, pool) else {
        panic!("sync");
    };
    let Ok(state) = f.ledger.pool_state(pool) else {
        panic!("pool exists");
    };
    let (end_a, end_b) = state.price_cumulatives();
    assert_eq!(end_a, encode_price(Amount::new(4_000), Amount::new(1_000)) * U256::from(10u64));
    assert_eq!(end_b, encode_price(Amount::new(1_000), Amount::new(4_000)) * U256::from(10u64));
    assert_eq!(state.reserves().2, START + 10);

    let Some(average) = average_price(start_a, end_a, 10) else {
        panic!("time elapsed");
    };
    assert_eq!(apply_price(average, Amount::new(100)), Ok(Amount::new(400)));
}

#[test]
fn native_liquidity_and_swaps_round_trip() {
    let mut f = fixture();
    let (wallet, partner, weth, now) = (f.wallet, f.weth_partner, f.weth, f.ledger.now());
    let native_start = f.ledger.native_balance(wallet);

    let Ok((token_used, native_used, shares)) = f.router.add_liquidity_native(
        &mut f.ledger,
        wallet,
        partner,
        Amount::new(4 * E18),
        Amount::new(E18),
        Amount::ZERO,
        Amount::ZERO,
        wallet,
        now,
    ) else {
        panic!("native liquidity");
    };
    assert_eq!((token_used, native_used), (Amount::new(E18), Amount::new(4 * E18)));
    assert_eq!(shares, Amount::new(2 * E18 - MINIMUM_LIQUIDITY));

    let buy = f.path(vec![weth, partner]);
    let Ok(amounts) = f.router.swap_exact_native_for_tokens(
        &mut f.ledger,
        wallet,
        Amount::new(E18),
        Amount::ZERO,
        &buy,
        wallet,
        now,
    ) else {
        panic!("native in");
    };
    assert_eq!(amounts[0], Amount::new(E18));

    let sell = f.path(vec![partner, weth]);
    let Ok(sold) = f.router.swap_tokens_for_exact_native(
        &mut f.ledger,
        wallet,
        Amount::new(E18 / 2),
        Amount::MAX,
        &sell,
        wallet,
        now,
    ) else {
        panic!("native out");
    };
    assert_eq!(sold[1], Amount::new(E18 / 2));
    assert_eq!(
        f.ledger.native_balance(wallet),
        Amount::new(native_start.get() - 4 * E18 - E18 + E18 / 2)
    );

    let Ok((token_back, native_back)) = f.router.remove_liquidity_native(
        &mut f.ledger,
        wallet,
        partner,
        shares,
        Amount::ZERO,
        Amount::ZERO,
        wallet,
        now,
    ) else {
        panic!("remove native liquidity");
    };
    assert!(!token_back.is_zero() && !native_back.is_zero());
    assert_eq!(f.ledger.native_balance(f.router.address()), Amount::ZERO);
    assert_eq!(f.ledger.balance_of(weth, f.router.address()), Amount::ZERO);
    assert_eq!(f.ledger.balance_of(f.weth_pool, wallet), Amount::ZERO);
}

#[test]
fn failed_router_call_rolls_back_everything() {
    let mut f = fixture();
    let _shares = f.provide(f.pool, 10_000, 10_000);
    let path = f.path(vec![f.token_a, f.token_b]);
    let (wallet, now) = (f.wallet, f.ledger.now());
    let before = f.ledger.clone();
    let r = f.router.swap_exact_tokens_for_tokens(
        &mut f.ledger,
        wallet,
        Amount::new(100),
        Amount::new(100),
        &path,
        wallet,
        now,
    );
    assert_eq!(r, Err(AmmError::InsufficientOutputAmount));
    assert_eq!(f.ledger.events(), before.events());
    assert_eq!(
        f.ledger.balance_of(f.token_a, wallet),
        before.balance_of(f.token_a, wallet)
    );
}

#[test]
fn events_serialize_as_tagged_json() {
    let mut f = fixture();
    let _shares = f.provide(f.pool, 1_000, 4_000);
    let Some(sync) = f
        .ledger
        .events()
        .iter()
        .rev()
        .find(|e| matches!(e, Event::Sync { .. }))
    else {
        panic!("mint emits sync");
    };
    let Ok(json) = serde_json::to_value(sync) else {
        panic!("serializable");
    };
    assert_eq!(json["event"], "Sync");
    assert_eq!(json["reserve_a"], 1_000);
    assert_eq!(json["reserve_b"], 4_000);
}
