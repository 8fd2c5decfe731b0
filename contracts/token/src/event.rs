use alloy_primitives::{Address, U256};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::codec::{serialize_address, serialize_amount};

/// Record emitted by a state-changing operation.
///
/// Serializes as `{"eventName": "...", "args": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "eventName", content = "args")]
pub enum TokenEvent {
    Transfer {
        #[serde(serialize_with = "serialize_address")]
        from: Address,
        #[serde(serialize_with = "serialize_address")]
        to: Address,
        #[serde(serialize_with = "serialize_amount")]
        value: U256,
    },
    Approval {
        #[serde(serialize_with = "serialize_address")]
        owner: Address,
        #[serde(serialize_with = "serialize_address")]
        spender: Address,
        #[serde(serialize_with = "serialize_amount")]
        value: U256,
    },
}

impl TokenEvent {
    pub fn name(&self) -> EventName {
        match self {
            Self::Transfer { .. } => EventName::Transfer,
            Self::Approval { .. } => EventName::Approval,
        }
    }

    pub fn value(&self) -> U256 {
        match self {
            Self::Transfer { value, .. } | Self::Approval { value, .. } => *value,
        }
    }
}

/// An event together with its position in the token's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedEvent {
    pub index: u64,
    #[serde(flatten)]
    pub event: TokenEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    Transfer,
    Approval,
}

impl EventName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transfer => "Transfer",
            Self::Approval => "Approval",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Transfer" => Ok(Self::Transfer),
            "Approval" => Ok(Self::Approval),
            other => Err(format!("unknown event name: {other}")),
        }
    }
}

/// Selects events from the log. Unset fields match anything; an address
/// field the event does not carry (e.g. `owner` on a Transfer) never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub name: Option<EventName>,
    pub from: Option<Address>,
    pub to: Option<Address>,
    pub owner: Option<Address>,
    pub spender: Option<Address>,
}

impl EventFilter {
    pub fn named(name: EventName) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    pub fn matches(&self, event: &TokenEvent) -> bool {
        if self.name.is_some_and(|name| name != event.name()) {
            return false;
        }
        match event {
            TokenEvent::Transfer { from, to, .. } => {
                self.owner.is_none()
                    && self.spender.is_none()
                    && self.from.map_or(true, |f| f == *from)
                    && self.to.map_or(true, |t| t == *to)
            }
            TokenEvent::Approval { owner, spender, .. } => {
                self.from.is_none()
                    && self.to.is_none()
                    && self.owner.map_or(true, |o| o == *owner)
                    && self.spender.map_or(true, |s| s == *spender)
            }
        }
    }
}
