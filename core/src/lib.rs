//! HTTP gateway in front of an ERC20 ledger.
//!
//! Reads are served straight from the ledger; writes are signed by a single
//! server-held key and applied through [`submitter::TransactionSubmitter`].

pub mod api;
pub mod errors;
pub mod network_config;
pub mod settings;
pub mod signer;
pub mod state;
pub mod submitter;

pub use api::create_app;
pub use state::AppState;
