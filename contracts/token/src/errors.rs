use alloy_primitives::{Address, U256};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("insufficient balance: {account} holds {balance}, needs {needed}")]
    InsufficientBalance {
        account: Address,
        balance: U256,
        needed: U256,
    },

    #[error("insufficient allowance: {spender} may spend {allowance} of {owner}, needs {needed}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        allowance: U256,
        needed: U256,
    },

    #[error("amount overflows the 256-bit supply")]
    SupplyOverflow,

    #[error("{minter} is not allowed to mint")]
    UnauthorizedMinter { minter: Address },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl TokenError {
    /// True for violations of the ledger rules, as opposed to malformed input.
    pub fn is_rule_violation(&self) -> bool {
        matches!(
            self,
            Self::InsufficientBalance { .. }
                | Self::InsufficientAllowance { .. }
                | Self::SupplyOverflow
        )
    }
}
