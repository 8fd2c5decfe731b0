use alloy_primitives::{Address, U256};
use std::collections::HashMap;

use crate::event::LoggedEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllowanceDataKey {
    pub owner: Address,
    pub spender: Address,
}

/// Mutable tables of a token. Only reachable through the lock in `Token`.
#[derive(Debug, Default)]
pub struct LedgerState {
    pub balances: HashMap<Address, U256>,
    pub allowances: HashMap<AllowanceDataKey, U256>,
    pub total_supply: U256,
    pub events: Vec<LoggedEvent>,
}
