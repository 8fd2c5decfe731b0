use alloy_primitives::{Address, U256};

use crate::errors::TokenError;
use crate::storage_types::{AllowanceDataKey, LedgerState};

pub fn read_allowance(state: &LedgerState, owner: Address, spender: Address) -> U256 {
    let key = AllowanceDataKey { owner, spender };
    match state.allowances.get(&key) {
        Some(allowance) => *allowance,
        None => U256::ZERO,
    }
}

pub fn write_allowance(state: &mut LedgerState, owner: Address, spender: Address, amount: U256) {
    let key = AllowanceDataKey { owner, spender };
    state.allowances.insert(key, amount);
}

/// Allowance left after `spender` moves `amount` out of `owner`. Does not write.
pub fn check_spend_allowance(
    state: &LedgerState,
    owner: Address,
    spender: Address,
    amount: U256,
) -> Result<U256, TokenError> {
    let allowance = read_allowance(state, owner, spender);
    allowance
        .checked_sub(amount)
        .ok_or(TokenError::InsufficientAllowance {
            owner,
            spender,
            allowance,
            needed: amount,
        })
}
