use std::sync::Arc;
use token_ledger::{parse_address, Erc20, MintPolicy, Token, TokenMetadata};

use crate::network_config::{self, NetworkConfig};
use crate::settings::{AppConfig, MintPolicyKind, StartupError};
use crate::signer::Signer;
use crate::submitter::TransactionSubmitter;

/// Shared by every handler.
pub struct AppState {
    pub token: Arc<dyn Erc20>,
    pub submitter: TransactionSubmitter,
    pub network: NetworkConfig,
}

impl AppState {
    pub fn new(
        token: Arc<dyn Erc20>,
        signer: Signer,
        contract: token_ledger::Address,
        network: NetworkConfig,
    ) -> Self {
        let submitter = TransactionSubmitter::new(token.clone(), signer, contract, network.chain_id);
        Self {
            token,
            submitter,
            network,
        }
    }

    /// Resolve network, signing identity and token from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let network = network_config::by_name(&config.network)
            .ok_or_else(|| StartupError::UnknownNetwork(config.network.clone()))?;
        let signer = Signer::from_mnemonic(config.mnemonic()?)?;
        let contract = parse_address(config.contract_address()?)
            .map_err(StartupError::InvalidContractAddress)?;

        let metadata = TokenMetadata::new(
            config.token_name.clone(),
            config.token_symbol.clone(),
            config.token_decimals,
        );
        let mint_policy = match config.mint_policy {
            MintPolicyKind::Open => MintPolicy::Open,
            MintPolicyKind::Signer => MintPolicy::only(signer.address()),
        };
        let token: Arc<dyn Erc20> = Arc::new(Token::with_mint_policy(metadata, mint_policy));

        Ok(Self::new(token, signer, contract, network))
    }
}
