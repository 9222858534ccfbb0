//! Unified error types for the Simswap library.
//!
//! All fallible operations across the crate return [`AmmError`] as their
//! error type. Every variant is surfaced to the caller verbatim; the
//! ledger rolls back the enclosing entry point whenever one is returned.

use thiserror::Error;

/// Convenience alias used by every fallible API in the crate.
pub type Result<T, E = AmmError> = core::result::Result<T, E>;

/// Every failure kind the AMM core can report.
///
/// Variants are grouped by cause:
///
/// | Group | Variants |
/// |-------|----------|
/// | Input validation | `IdenticalAddresses`, `ZeroAddress`, `Expired`, `InvalidPath`, `InvalidRecipient`, `InvalidConfiguration` |
/// | Liquidity / economic | `InsufficientLiquidity`, `InsufficientLiquidityMinted`, `InsufficientLiquidityBurned`, `InvariantViolation`, `InsufficientInput`, `InsufficientInputAmount`, `InvalidOutputAmount` |
/// | Slippage | `InsufficientOutputAmount`, `ExcessiveInputAmount`, `InsufficientAAmount`, `InsufficientBAmount` |
/// | Authorization | `Forbidden` |
/// | Transfer | `TransferFailed` |
/// | Registry | `PoolExists`, `PoolNotFound`, `FactoryNotFound` |
/// | Execution | `Locked`, `InvalidCallback`, `Overflow` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AmmError {
    /// Both sides of a token pair are the same asset.
    #[error("identical addresses")]
    IdenticalAddresses,

    /// A token identifier is the null address.
    #[error("zero address")]
    ZeroAddress,

    /// The call was submitted after its deadline.
    #[error("transaction expired")]
    Expired,

    /// A swap path is too short, repeats a token, or has the wrong endpoint.
    #[error("invalid path")]
    InvalidPath,

    /// A swap recipient is one of the pool's own tokens.
    #[error("invalid recipient")]
    InvalidRecipient,

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),

    /// A reserve is empty or the requested output drains it.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// A deposit was too small to mint any shares.
    #[error("insufficient liquidity minted")]
    InsufficientLiquidityMinted,

    /// A share burn would pay out nothing on at least one side.
    #[error("insufficient liquidity burned")]
    InsufficientLiquidityBurned,

    /// The fee-adjusted reserve product decreased across a swap.
    #[error("constant-product invariant violated")]
    InvariantViolation,

    /// A quote was requested for a zero input.
    #[error("insufficient input")]
    InsufficientInput,

    /// A swap received no input on either side.
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// Both swap outputs are zero or one of them reaches its reserve.
    #[error("invalid output amount")]
    InvalidOutputAmount,

    /// The computed output is below the caller's minimum.
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// The computed input is above the caller's maximum.
    #[error("excessive input amount")]
    ExcessiveInputAmount,

    /// The token-A side of a liquidity operation undercuts its minimum.
    #[error("insufficient A amount")]
    InsufficientAAmount,

    /// The token-B side of a liquidity operation undercuts its minimum.
    #[error("insufficient B amount")]
    InsufficientBAmount,

    /// The caller is not the fee controller.
    #[error("forbidden")]
    Forbidden,

    /// A balance or allowance could not cover a transfer.
    #[error("transfer failed")]
    TransferFailed,

    /// A pool already exists for this pair.
    #[error("pool exists")]
    PoolExists,

    /// No pool is registered at the given address or for the given pair.
    #[error("pool not found")]
    PoolNotFound,

    /// No factory is deployed at the given address.
    #[error("factory not found")]
    FactoryNotFound,

    /// A pool operation was re-entered while another one was in flight.
    #[error("pool locked")]
    Locked,

    /// Callback data was supplied without a callee to receive it.
    #[error("flash swap data supplied without a callee")]
    InvalidCallback,

    /// Checked arithmetic overflowed or a reserve exceeded its bound.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),
}
