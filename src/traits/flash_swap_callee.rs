//! Flash-borrow callback invoked by [`Ledger::swap`](crate::ledger::Ledger::swap).
//!
//! When a swap is called with non-empty `data`, the pool first transfers
//! the requested outputs to the recipient and then hands control to the
//! callee. The callee may do anything the ledger allows (trade
//! elsewhere, repay in either token, or fail) before the pool reads its
//! balances and checks the invariant:
//!
//! ```text
//! pool ──(amount_a_out, amount_b_out)──▶ to
//! pool ──on_flash_swap(ledger, sender, a_out, b_out, data)──▶ callee
//! callee ──(repayment)──▶ pool
//! pool: check_invariant(balances, reserves, fee)
//! ```
//!
//! The pool stays locked for the whole callback, so the callee cannot
//! re-enter `mint`, `burn`, `swap`, `skim` or `sync` on the same pool.
//! Other pools are unaffected.

use crate::domain::{Address, Amount};
use crate::error::AmmError;
use crate::ledger::Ledger;

/// Receiver of flash-swap callbacks.
///
/// Implemented for every closure with the matching signature, so simple
/// callees need no named type.
///
/// # Examples
///
/// ```
/// use simswap::domain::{Address, Amount};
/// use simswap::error::AmmError;
/// use simswap::ledger::Ledger;
/// use simswap::traits::FlashSwapCallee;
///
/// fn assert_callee(_: &mut dyn FlashSwapCallee) {}
///
/// let mut noop = |_: &mut Ledger, _: Address, _: Amount, _: Amount, _: &[u8]| -> Result<(), AmmError> {
///     Ok(())
/// };
/// assert_callee(&mut noop);
/// ```
pub trait FlashSwapCallee {
    /// Called by the pool between paying out and validating.
    ///
    /// `sender` is the caller of `swap`; the amounts are the outputs
    /// already transferred to the swap recipient; `data` is passed
    /// through verbatim.
    ///
    /// # Errors
    ///
    /// Any error aborts the swap, and the whole call is rolled back.
    fn on_flash_swap(
        &mut self,
        ledger: &mut Ledger,
        sender: Address,
        amount_a_out: Amount,
        amount_b_out: Amount,
        data: &[u8],
    ) -> Result<(), AmmError>;
}

impl<F> FlashSwapCallee for F
where
    F: FnMut(&mut Ledger, Address, Amount, Amount, &[u8]) -> Result<(), AmmError>,
{
    fn on_flash_swap(
        &mut self,
        ledger: &mut Ledger,
        sender: Address,
        amount_a_out: Amount,
        amount_b_out: Amount,
        data: &[u8],
    ) -> Result<(), AmmError> {
        self(ledger, sender, amount_a_out, amount_b_out, data)
    }
}
