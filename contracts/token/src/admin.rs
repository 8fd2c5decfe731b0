use alloy_primitives::Address;
use std::fmt;

/// Decides who may call `mint`.
///
/// `Open` lets anyone mint, which is how the token behaves unless the
/// deployment opts into a restriction.
#[derive(Default)]
pub enum MintPolicy {
    #[default]
    Open,
    Restricted(Box<dyn Fn(&Address) -> bool + Send + Sync>),
}

impl MintPolicy {
    /// Only `minter` may mint.
    pub fn only(minter: Address) -> Self {
        Self::Restricted(Box::new(move |caller| *caller == minter))
    }

    pub fn permits(&self, minter: &Address) -> bool {
        match self {
            Self::Open => true,
            Self::Restricted(predicate) => predicate(minter),
        }
    }
}

impl fmt::Debug for MintPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("Open"),
            Self::Restricted(_) => f.write_str("Restricted(..)"),
        }
    }
}
