use alloy_primitives::{Address, U256};

use crate::errors::TokenError;
use crate::storage_types::LedgerState;

pub fn read_balance(state: &LedgerState, addr: Address) -> U256 {
    match state.balances.get(&addr) {
        Some(balance) => *balance,
        None => U256::ZERO,
    }
}

fn write_balance(state: &mut LedgerState, addr: Address, amount: U256) {
    state.balances.insert(addr, amount);
}

/// Balance `addr` would be left with after spending `amount`.
fn check_spend(state: &LedgerState, addr: Address, amount: U256) -> Result<U256, TokenError> {
    let balance = read_balance(state, addr);
    balance
        .checked_sub(amount)
        .ok_or(TokenError::InsufficientBalance {
            account: addr,
            balance,
            needed: amount,
        })
}

/// Balance `addr` would hold after receiving `amount`.
fn check_receive(state: &LedgerState, addr: Address, amount: U256) -> Result<U256, TokenError> {
    read_balance(state, addr)
        .checked_add(amount)
        .ok_or(TokenError::SupplyOverflow)
}

/// Credits `to` with freshly issued tokens, growing the total supply.
pub fn issue_balance(state: &mut LedgerState, to: Address, amount: U256) -> Result<(), TokenError> {
    let supply = state
        .total_supply
        .checked_add(amount)
        .ok_or(TokenError::SupplyOverflow)?;
    let balance = check_receive(state, to, amount)?;

    state.total_supply = supply;
    write_balance(state, to, balance);
    Ok(())
}

/// Moves `amount` from `from` to `to`. Nothing is written unless both sides check out.
pub fn move_balance(
    state: &mut LedgerState,
    from: Address,
    to: Address,
    amount: U256,
) -> Result<(), TokenError> {
    let from_balance = check_spend(state, from, amount)?;
    if from == to {
        return Ok(());
    }
    let to_balance = check_receive(state, to, amount)?;

    write_balance(state, from, from_balance);
    write_balance(state, to, to_balance);
    Ok(())
}
