use crate::admin::MintPolicy;
use crate::allowance::{check_spend_allowance, read_allowance, write_allowance};
use crate::balance::{issue_balance, move_balance, read_balance};
use crate::errors::TokenError;
use crate::event::{EventFilter, LoggedEvent, TokenEvent};
use crate::metadata::TokenMetadata;
use crate::storage_types::LedgerState;
use alloy_primitives::{Address, U256};
use parking_lot::RwLock;

/// ERC20 surface of a ledger.
///
/// Every state-changing call is applied atomically and returns the event it
/// appended to the log; a failed call leaves tables and log untouched.
pub trait Erc20: Send + Sync {
    fn metadata(&self) -> TokenMetadata;
    fn total_supply(&self) -> U256;
    fn balance_of(&self, account: Address) -> U256;
    fn allowance(&self, owner: Address, spender: Address) -> U256;
    fn mint(&self, minter: Address, to: Address, amount: U256) -> Result<LoggedEvent, TokenError>;
    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<LoggedEvent, TokenError>;
    fn approve(
        &self,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<LoggedEvent, TokenError>;
    fn transfer_from(
        &self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: U256,
    ) -> Result<LoggedEvent, TokenError>;
    /// Logged events at or after `cursor` that match `filter`.
    fn events(&self, filter: &EventFilter, cursor: u64) -> Vec<LoggedEvent>;
    /// Length of the log, i.e. the cursor of the next event.
    fn event_count(&self) -> u64;

    fn name(&self) -> String {
        self.metadata().name
    }

    fn symbol(&self) -> String {
        self.metadata().symbol
    }

    fn decimals(&self) -> u8 {
        self.metadata().decimals
    }
}

#[derive(Debug)]
pub struct Token {
    metadata: TokenMetadata,
    mint_policy: MintPolicy,
    state: RwLock<LedgerState>,
}

impl Token {
    /// A token anyone may mint.
    pub fn new(metadata: TokenMetadata) -> Self {
        Self::with_mint_policy(metadata, MintPolicy::Open)
    }

    pub fn with_mint_policy(metadata: TokenMetadata, mint_policy: MintPolicy) -> Self {
        Self {
            metadata,
            mint_policy,
            state: RwLock::new(LedgerState::default()),
        }
    }

    /// Runs `op` under the write lock and appends the event it produces.
    fn apply<F>(&self, op: F) -> Result<LoggedEvent, TokenError>
    where
        F: FnOnce(&mut LedgerState) -> Result<TokenEvent, TokenError>,
    {
        let mut state = self.state.write();
        let event = op(&mut state).map_err(|e| {
            tracing::debug!(error = %e, "ledger operation rejected");
            e
        })?;

        let logged = LoggedEvent {
            index: state.events.len() as u64,
            event,
        };
        state.events.push(logged.clone());
        Ok(logged)
    }
}

impl Erc20 for Token {
    fn metadata(&self) -> TokenMetadata {
        self.metadata.clone()
    }

    fn total_supply(&self) -> U256 {
        self.state.read().total_supply
    }

    fn balance_of(&self, account: Address) -> U256 {
        read_balance(&self.state.read(), account)
    }

    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        read_allowance(&self.state.read(), owner, spender)
    }

    fn mint(&self, minter: Address, to: Address, amount: U256) -> Result<LoggedEvent, TokenError> {
        if !self.mint_policy.permits(&minter) {
            return Err(TokenError::UnauthorizedMinter { minter });
        }

        self.apply(|state| {
            issue_balance(state, to, amount)?;
            Ok(TokenEvent::Transfer {
                from: Address::ZERO,
                to,
                value: amount,
            })
        })
    }

    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<LoggedEvent, TokenError> {
        self.apply(|state| {
            move_balance(state, from, to, amount)?;
            Ok(TokenEvent::Transfer {
                from,
                to,
                value: amount,
            })
        })
    }

    fn approve(
        &self,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<LoggedEvent, TokenError> {
        self.apply(|state| {
            write_allowance(state, owner, spender, amount);
            Ok(TokenEvent::Approval {
                owner,
                spender,
                value: amount,
            })
        })
    }

    fn transfer_from(
        &self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: U256,
    ) -> Result<LoggedEvent, TokenError> {
        self.apply(|state| {
            let remaining = check_spend_allowance(state, owner, spender, amount)?;
            move_balance(state, owner, to, amount)?;
            write_allowance(state, owner, spender, remaining);
            Ok(TokenEvent::Transfer {
                from: owner,
                to,
                value: amount,
            })
        })
    }

    fn events(&self, filter: &EventFilter, cursor: u64) -> Vec<LoggedEvent> {
        let start = usize::try_from(cursor).unwrap_or(usize::MAX);
        self.state
            .read()
            .events
            .iter()
            .skip(start)
            .filter(|logged| filter.matches(&logged.event))
            .cloned()
            .collect()
    }

    fn event_count(&self) -> u64 {
        self.state.read().events.len() as u64
    }
}
