mod admin;
mod allowance;
mod balance;
pub mod codec;
mod contract;
mod errors;
mod event;
mod metadata;
mod storage_types;


pub use alloy_primitives::{Address, U256};

pub use crate::admin::MintPolicy;
pub use crate::codec::{parse_address, parse_amount};
pub use crate::contract::{Erc20, Token};
pub use crate::errors::TokenError;
pub use crate::event::{EventFilter, EventName, LoggedEvent, TokenEvent};
pub use crate::metadata::TokenMetadata;
