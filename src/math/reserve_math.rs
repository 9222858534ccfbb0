//! Constant-product quoting and invariant arithmetic.
//!
//! All functions are pure. Intermediate products are computed in 256-bit
//! space with checked operations, so any `u128` input is safe: results
//! that cannot be represented surface as [`AmmError::Overflow`].
//!
//! # Formulas (fee `f` in basis points, `D = 10 000`)
//!
//! ```text
//! quote_output:  out = ⌊ in·(D−f)·R_out / (R_in·D + in·(D−f)) ⌋
//! quote_input:   in  = ⌈ R_in·out·D / ((R_out − out)·(D−f)) ⌉
//! equivalent:    b   = ⌊ a·R_b / R_a ⌋
//! invariant:     (B_a·D − in_a·f)·(B_b·D − in_b·f) ≥ R_a·R_b·D²
//! ```
//!
//! Outputs round down and inputs round up, so the pool never loses to
//! truncation and every quote passes the invariant check.

use primitive_types::U256;

use crate::domain::{Amount, FeeTier, Rounding, BPS_DENOMINATOR};
use crate::error::AmmError;

fn denom() -> U256 {
    U256::from(BPS_DENOMINATOR)
}

fn mul(a: U256, b: U256, context: &'static str) -> Result<U256, AmmError> {
    a.checked_mul(b).ok_or(AmmError::Overflow(context))
}

fn add(a: U256, b: U256, context: &'static str) -> Result<U256, AmmError> {
    a.checked_add(b).ok_or(AmmError::Overflow(context))
}

/// `numerator / denominator` in the given direction, narrowed to an
/// [`Amount`].
///
/// # Errors
///
/// - [`AmmError::InsufficientLiquidity`] if `denominator` is zero.
/// - [`AmmError::Overflow`] if the quotient does not fit in 128 bits.
pub fn mul_div(
    numerator: U256,
    denominator: U256,
    rounding: Rounding,
    context: &'static str,
) -> Result<Amount, AmmError> {
    if denominator.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let (q, r) = numerator.div_mod(denominator);
    let q = if rounding.is_up() && !r.is_zero() {
        add(q, U256::one(), context)?
    } else {
        q
    };
    Amount::narrow(q, context)
}

/// Output bought by selling `amount_in` into a pool holding
/// `reserve_in` / `reserve_out`.
///
/// # Errors
///
/// - [`AmmError::InsufficientInput`] if `amount_in` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::Overflow`] if an intermediate product exceeds 256 bits.
///
/// # Examples
///
/// ```
/// use simswap::domain::{Amount, FeeTier};
/// use simswap::math::quote_output;
///
/// let out = quote_output(
///     Amount::new(100),
///     Amount::new(1_000),
///     Amount::new(1_000),
///     FeeTier::TIER_0_30_PERCENT,
/// ).expect("funded pool");
/// assert_eq!(out, Amount::new(90));
/// ```
pub fn quote_output(
    amount_in: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeTier,
) -> Result<Amount, AmmError> {
    if amount_in.is_zero() {
        return Err(AmmError::InsufficientInput);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let in_with_fee = mul(
        amount_in.widen(),
        U256::from(fee.retained()),
        "quote_output fee",
    )?;
    let numerator = mul(in_with_fee, reserve_out.widen(), "quote_output numerator")?;
    let denominator = add(
        mul(reserve_in.widen(), denom(), "quote_output denominator")?,
        in_with_fee,
        "quote_output denominator",
    )?;
    mul_div(numerator, denominator, Rounding::Down, "quote_output result")
}

/// Input required to buy exactly `amount_out` from a pool holding
/// `reserve_in` / `reserve_out`. Rounded up.
///
/// # Errors
///
/// - [`AmmError::InsufficientOutputAmount`] if `amount_out` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero or
///   `amount_out >= reserve_out`.
/// - [`AmmError::Overflow`] if the result does not fit in 128 bits.
///
/// # Examples
///
/// ```
/// use simswap::domain::{Amount, FeeTier};
/// use simswap::math::quote_input;
///
/// let needed = quote_input(
///     Amount::new(90),
///     Amount::new(1_000),
///     Amount::new(1_000),
///     FeeTier::TIER_0_30_PERCENT,
/// ).expect("funded pool");
/// assert_eq!(needed, Amount::new(100));
/// ```
pub fn quote_input(
    amount_out: Amount,
    reserve_in: Amount,
    reserve_out: Amount,
    fee: FeeTier,
) -> Result<Amount, AmmError> {
    if amount_out.is_zero() {
        return Err(AmmError::InsufficientOutputAmount);
    }
    if reserve_in.is_zero() || reserve_out.is_zero() || amount_out >= reserve_out {
        return Err(AmmError::InsufficientLiquidity);
    }
    let numerator = mul(
        mul(reserve_in.widen(), amount_out.widen(), "quote_input numerator")?,
        denom(),
        "quote_input numerator",
    )?;
    // reserve_out > amount_out and the fee is below 100%, so this is non-zero
    let denominator = mul(
        (reserve_out.widen()) - amount_out.widen(),
        U256::from(fee.retained()),
        "quote_input denominator",
    )?;
    mul_div(numerator, denominator, Rounding::Up, "quote_input result")
}

/// Amount of token B worth `amount_a` of token A at the current reserve
/// ratio. Used to size proportional liquidity deposits. Rounded down.
///
/// # Errors
///
/// - [`AmmError::InsufficientInput`] if `amount_a` is zero.
/// - [`AmmError::InsufficientLiquidity`] if either reserve is zero.
/// - [`AmmError::Overflow`] if the result does not fit in 128 bits.
///
/// # Examples
///
/// ```
/// use simswap::domain::Amount;
/// use simswap::math::quote_equivalent;
///
/// let b = quote_equivalent(Amount::new(10), Amount::new(1_000), Amount::new(4_000))
///     .expect("funded pool");
/// assert_eq!(b, Amount::new(40));
/// ```
pub fn quote_equivalent(
    amount_a: Amount,
    reserve_a: Amount,
    reserve_b: Amount,
) -> Result<Amount, AmmError> {
    if amount_a.is_zero() {
        return Err(AmmError::InsufficientInput);
    }
    if reserve_a.is_zero() || reserve_b.is_zero() {
        return Err(AmmError::InsufficientLiquidity);
    }
    let product = mul(amount_a.widen(), reserve_b.widen(), "quote_equivalent")?;
    mul_div(product, reserve_a.widen(), Rounding::Down, "quote_equivalent result")
}

/// Post-swap balances and implied inputs of both sides of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapSettlement {
    /// Pool balance of token A after the swap.
    pub balance_a: Amount,
    /// Pool balance of token B after the swap.
    pub balance_b: Amount,
    /// Token A received by the pool.
    pub amount_a_in: Amount,
    /// Token B received by the pool.
    pub amount_b_in: Amount,
}

/// Verifies that the fee-adjusted reserve product did not decrease.
///
/// The fee is charged on each side's input, so a swap that simply
/// returns what it borrowed still pays the fee on the returned amount.
///
/// # Errors
///
/// - [`AmmError::InvariantViolation`] if
///   `(B_a·D − in_a·f)·(B_b·D − in_b·f) < R_a·R_b·D²`.
/// - [`AmmError::Overflow`] if a product exceeds 256 bits.
pub fn check_invariant(
    settlement: &SwapSettlement,
    reserve_a: Amount,
    reserve_b: Amount,
    fee: FeeTier,
) -> Result<(), AmmError> {
    let fee_bps = U256::from(fee.bps());
    let adjusted = |balance: Amount, amount_in: Amount| -> Result<U256, AmmError> {
        let scaled = mul(balance.widen(), denom(), "invariant balance")?;
        let charged = mul(amount_in.widen(), fee_bps, "invariant fee")?;
        scaled
            .checked_sub(charged)
            .ok_or(AmmError::InvariantViolation)
    };
    let adjusted_a = adjusted(settlement.balance_a, settlement.amount_a_in)?;
    let adjusted_b = adjusted(settlement.balance_b, settlement.amount_b_in)?;

    let k_after = mul(adjusted_a, adjusted_b, "invariant k after")?;
    let k_before = mul(
        mul(reserve_a.widen(), reserve_b.widen(), "invariant k before")?,
        denom() * denom(),
        "invariant k before",
    )?;
    if k_after < k_before {
        return Err(AmmError::InvariantViolation);
    }
    Ok(())
}

/// Chains [`quote_output`] forward through every hop.
///
/// `reserves[i]` is `(reserve_in, reserve_out)` of hop `i`. Element `0`
/// of the result is `amount_in`; element `i + 1` is the output of hop
/// `i`, which is also the input of hop `i + 1`.
///
/// # Errors
///
/// Propagates the first failing hop's error; returns
/// [`AmmError::InvalidPath`] when `reserves` is empty.
pub fn amounts_out(
    amount_in: Amount,
    reserves: &[(Amount, Amount)],
    fee: FeeTier,
) -> Result<Vec<Amount>, AmmError> {
    if reserves.is_empty() {
        return Err(AmmError::InvalidPath);
    }
    let mut amounts = Vec::with_capacity(reserves.len() + 1);
    amounts.push(amount_in);
    let mut current = amount_in;
    for &(reserve_in, reserve_out) in reserves {
        current = quote_output(current, reserve_in, reserve_out, fee)?;
        amounts.push(current);
    }
    Ok(amounts)
}

/// Chains [`quote_input`] backward from the final output.
///
/// `reserves[i]` is `(reserve_in, reserve_out)` of hop `i`. The last
/// element of the result is `amount_out`; element `i` is what must enter
/// hop `i`.
///
/// # Errors
///
/// Propagates the first failing hop's error; returns
/// [`AmmError::InvalidPath`] when `reserves` is empty.
pub fn amounts_in(
    amount_out: Amount,
    reserves: &[(Amount, Amount)],
    fee: FeeTier,
) -> Result<Vec<Amount>, AmmError> {
    if reserves.is_empty() {
        return Err(AmmError::InvalidPath);
    }
    let mut amounts = vec![Amount::ZERO; reserves.len() + 1];
    amounts[reserves.len()] = amount_out;
    for (i, &(reserve_in, reserve_out)) in reserves.iter().enumerate().rev() {
        amounts[i] = quote_input(amounts[i + 1], reserve_in, reserve_out, fee)?;
    }
    Ok(amounts)
}
