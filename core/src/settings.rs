use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use token_ledger::TokenError;

use crate::signer::SignerError;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Configuration missing: {0} must be set")]
    ConfigurationMissing(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Invalid CONTRACT_ADDRESS: {0}")]
    InvalidContractAddress(#[source] TokenError),

    #[error("Invalid BLOCKCHAIN_MNEMONIC: {0}")]
    Signer(#[from] SignerError),
}

/// Who may mint through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MintPolicyKind {
    /// Anyone; the gateway signer is the only caller anyway.
    Open,
    /// Only the gateway signer.
    Signer,
}

#[derive(Clone, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub network: String,
    pub token_name: String,
    pub token_symbol: String,
    pub token_decimals: u8,
    pub mint_policy: MintPolicyKind,
    /// `tracing_subscriber::EnvFilter` directive, read from `RUST_LOG`.
    pub rust_log: String,
    #[serde(default)]
    blockchain_mnemonic: Option<String>,
    #[serde(default)]
    contract_address: Option<String>,
}

impl AppConfig {
    pub fn mnemonic(&self) -> Result<&str, StartupError> {
        required(&self.blockchain_mnemonic, "BLOCKCHAIN_MNEMONIC")
    }

    pub fn contract_address(&self) -> Result<&str, StartupError> {
        required(&self.contract_address, "CONTRACT_ADDRESS")
    }
}

// Keeps the mnemonic out of logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("server_port", &self.server_port)
            .field("network", &self.network)
            .field("token_name", &self.token_name)
            .field("token_symbol", &self.token_symbol)
            .field("token_decimals", &self.token_decimals)
            .field("mint_policy", &self.mint_policy)
            .field("rust_log", &self.rust_log)
            .field("contract_address", &self.contract_address)
            .finish_non_exhaustive()
    }
}

fn required<'a>(value: &'a Option<String>, key: &'static str) -> Result<&'a str, StartupError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(StartupError::ConfigurationMissing(key))
}

/// Load configuration from `env/.env`, `.env` and the process environment.
pub fn load_config() -> Result<AppConfig, StartupError> {
    // Deployment layout keeps secrets under env/
    dotenvy::from_path("env/.env").ok();
    dotenvy::dotenv().ok();

    load_config_from(Environment::default())
}

/// Build the configuration from `source`, failing when a required key is
/// missing or empty.
pub fn load_config_from(source: Environment) -> Result<AppConfig, StartupError> {
    let settings = Config::builder()
        .add_source(source)
        .set_default("server_port", 8080)?
        .set_default("network", "sepolia")?
        .set_default("token_name", "MyToken")?
        .set_default("token_symbol", "MTK")?
        .set_default("token_decimals", 18)?
        .set_default("mint_policy", "open")?
        .set_default("rust_log", "info")?
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.mnemonic()?;
    config.contract_address()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;

    const MNEMONIC: &str = "test test test test test test test test test test test junk";
    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    fn env_of(pairs: &[(&str, &str)]) -> Environment {
        let map: Map<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().source(Some(map))
    }

    #[test]
    fn test_defaults_applied() {
        let config = load_config_from(env_of(&[
            ("BLOCKCHAIN_MNEMONIC", MNEMONIC),
            ("CONTRACT_ADDRESS", CONTRACT),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.network, "sepolia");
        assert_eq!(config.token_name, "MyToken");
        assert_eq!(config.token_symbol, "MTK");
        assert_eq!(config.token_decimals, 18);
        assert_eq!(config.mint_policy, MintPolicyKind::Open);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.contract_address().unwrap(), CONTRACT);
    }

    #[test]
    fn test_overrides() {
        let config = load_config_from(env_of(&[
            ("BLOCKCHAIN_MNEMONIC", MNEMONIC),
            ("CONTRACT_ADDRESS", CONTRACT),
            ("SERVER_PORT", "3000"),
            ("NETWORK", "hardhat"),
            ("MINT_POLICY", "signer"),
            ("TOKEN_DECIMALS", "6"),
            ("RUST_LOG", "token_gateway=debug,tower_http=warn"),
        ]))
        .unwrap();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.network, "hardhat");
        assert_eq!(config.mint_policy, MintPolicyKind::Signer);
        assert_eq!(config.token_decimals, 6);
        assert_eq!(config.rust_log, "token_gateway=debug,tower_http=warn");
    }

    #[test]
    fn test_missing_mnemonic_is_fatal() {
        let err = load_config_from(env_of(&[("CONTRACT_ADDRESS", CONTRACT)])).unwrap_err();
        assert!(matches!(
            err,
            StartupError::ConfigurationMissing("BLOCKCHAIN_MNEMONIC")
        ));
    }

    #[test]
    fn test_missing_contract_address_is_fatal() {
        let err = load_config_from(env_of(&[
            ("BLOCKCHAIN_MNEMONIC", MNEMONIC),
            ("CONTRACT_ADDRESS", "   "),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            StartupError::ConfigurationMissing("CONTRACT_ADDRESS")
        ));
    }

    #[test]
    fn test_debug_redacts_mnemonic() {
        let config = load_config_from(env_of(&[
            ("BLOCKCHAIN_MNEMONIC", MNEMONIC),
            ("CONTRACT_ADDRESS", CONTRACT),
        ]))
        .unwrap();
        assert!(!format!("{config:?}").contains("junk"));
    }
}
