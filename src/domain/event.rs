//! Observable events emitted for indexers and oracles.

use serde::{Deserialize, Serialize};

use super::{Address, Amount};

/// Everything the core reports to the outside world.
///
/// Events are appended to the ledger's log in emission order and are
/// rolled back together with the rest of a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Event {
    /// A pool was registered for a new pair.
    PoolCreated {
        token_a: Address,
        token_b: Address,
        pool: Address,
        /// Number of pools after this one was added.
        index: usize,
    },
    /// Liquidity was deposited into `pool`.
    Mint {
        pool: Address,
        sender: Address,
        amount_a: Amount,
        amount_b: Amount,
    },
    /// Liquidity was withdrawn from `pool`.
    Burn {
        pool: Address,
        sender: Address,
        amount_a: Amount,
        amount_b: Amount,
        to: Address,
    },
    /// One side of a swap settled in `pool`.
    Swap {
        pool: Address,
        sender: Address,
        amount_in: Amount,
        token_in: Address,
        amount_out: Amount,
        token_out: Address,
        to: Address,
    },
    /// `pool` committed new reserves.
    Sync {
        pool: Address,
        reserve_a: Amount,
        reserve_b: Amount,
    },
    /// A fungible token balance moved. Mints come from and burns go to
    /// the zero address.
    Transfer {
        token: Address,
        from: Address,
        to: Address,
        amount: Amount,
    },
    /// An allowance was set.
    Approval {
        token: Address,
        owner: Address,
        spender: Address,
        amount: Amount,
    },
    /// Native value was wrapped.
    Deposit { account: Address, amount: Amount },
    /// Wrapped value was redeemed for native value.
    Withdrawal { account: Address, amount: Amount },
}

impl Event {
    /// Short name of the event kind, used as a log field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PoolCreated { .. } => "PoolCreated",
            Self::Mint { .. } => "Mint",
            Self::Burn { .. } => "Burn",
            Self::Swap { .. } => "Swap",
            Self::Sync { .. } => "Sync",
            Self::Transfer { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
            Self::Deposit { .. } => "Deposit",
            Self::Withdrawal { .. } => "Withdrawal",
        }
    }
}
