use alloy_primitives::{keccak256, Address, B256, U256};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use token_ledger::codec::{serialize_address, serialize_amount};
use token_ledger::{Erc20, LoggedEvent, TokenError};
use utoipa::ToSchema;

use crate::signer::{Signer, SignerError};

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Ledger(#[from] TokenError),

    #[error("Serialization error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error(transparent)]
    Signing(#[from] SignerError),
}

/// A state-changing token call, issued by the server signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "params", rename_all = "camelCase")]
pub enum TokenCall {
    Mint {
        #[serde(serialize_with = "serialize_address")]
        to: Address,
        #[serde(serialize_with = "serialize_amount")]
        amount: U256,
    },
    Transfer {
        #[serde(serialize_with = "serialize_address")]
        to: Address,
        #[serde(serialize_with = "serialize_amount")]
        amount: U256,
    },
    Approve {
        #[serde(serialize_with = "serialize_address")]
        spender: Address,
        #[serde(serialize_with = "serialize_amount")]
        amount: U256,
    },
    TransferFrom {
        #[serde(serialize_with = "serialize_address")]
        from: Address,
        #[serde(serialize_with = "serialize_address")]
        to: Address,
        #[serde(serialize_with = "serialize_amount")]
        amount: U256,
    },
}

/// Outcome of an applied call.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    #[serde(serialize_with = "serialize_hash")]
    #[schema(value_type = String, example = "0x5c50...e1a2")]
    pub hash: B256,
    #[serde(serialize_with = "serialize_address")]
    #[schema(value_type = String)]
    pub signer: Address,
    pub nonce: u64,
    #[schema(value_type = Object)]
    pub call: TokenCall,
    #[schema(value_type = Vec<Object>)]
    pub logs: Vec<LoggedEvent>,
    /// Hex-encoded 65-byte secp256k1 signature (r ‖ s ‖ v) over `hash`.
    pub signature: String,
}

fn serialize_hash<S: Serializer>(hash: &B256, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(hash)
}

/// Signs calls with the server key and applies them to the ledger one at a
/// time. Receipts are kept in memory for lookup by hash.
pub struct TransactionSubmitter {
    token: Arc<dyn Erc20>,
    signer: Signer,
    contract: Address,
    chain_id: u64,
    /// Next nonce. Held for the whole submission, which serializes writers.
    nonce: Mutex<u64>,
    receipts: RwLock<HashMap<B256, TransactionReceipt>>,
}

impl TransactionSubmitter {
    pub fn new(token: Arc<dyn Erc20>, signer: Signer, contract: Address, chain_id: u64) -> Self {
        Self {
            token,
            signer,
            contract,
            chain_id,
            nonce: Mutex::new(0),
            receipts: RwLock::new(HashMap::new()),
        }
    }

    pub fn signer_address(&self) -> Address {
        self.signer.address()
    }

    pub fn contract_address(&self) -> Address {
        self.contract
    }

    /// Sign `call`, apply it and record the receipt. A rejected call does not
    /// consume a nonce and leaves no receipt.
    pub async fn submit(&self, call: TokenCall) -> Result<TransactionReceipt, SubmitError> {
        let mut nonce = self.nonce.lock().await;

        let hash = self.transaction_hash(*nonce, &call)?;
        let signature = self.signer.sign(&hash)?;

        let logged = match self.execute(&call) {
            Ok(logged) => logged,
            Err(e) => {
                tracing::warn!(nonce = *nonce, call = ?call, error = %e, "Transaction rejected");
                return Err(e.into());
            }
        };

        let receipt = TransactionReceipt {
            hash,
            signer: self.signer.address(),
            nonce: *nonce,
            call,
            logs: vec![logged],
            signature: hex::encode(signature.as_bytes()),
        };
        *nonce += 1;

        tracing::info!(hash = %receipt.hash, nonce = receipt.nonce, "Transaction applied");
        self.receipts.write().await.insert(hash, receipt.clone());
        Ok(receipt)
    }

    pub async fn receipt(&self, hash: &B256) -> Option<TransactionReceipt> {
        self.receipts.read().await.get(hash).cloned()
    }

    fn execute(&self, call: &TokenCall) -> Result<LoggedEvent, TokenError> {
        let signer = self.signer.address();
        match call {
            TokenCall::Mint { to, amount } => self.token.mint(signer, *to, *amount),
            TokenCall::Transfer { to, amount } => self.token.transfer(signer, *to, *amount),
            TokenCall::Approve { spender, amount } => {
                self.token.approve(signer, *spender, *amount)
            }
            TokenCall::TransferFrom { from, to, amount } => {
                self.token.transfer_from(signer, *from, *to, *amount)
            }
        }
    }

    /// keccak256(chain id ‖ contract ‖ signer ‖ nonce ‖ call as JSON)
    fn transaction_hash(&self, nonce: u64, call: &TokenCall) -> Result<B256, SubmitError> {
        let encoded_call = serde_json::to_vec(call)?;

        let mut preimage = Vec::with_capacity(8 + 20 + 20 + 8 + encoded_call.len());
        preimage.extend_from_slice(&self.chain_id.to_be_bytes());
        preimage.extend_from_slice(self.contract.as_slice());
        preimage.extend_from_slice(self.signer.address().as_slice());
        preimage.extend_from_slice(&nonce.to_be_bytes());
        preimage.extend_from_slice(&encoded_call);

        Ok(keccak256(&preimage))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_signer::Signature;
    use token_ledger::{Token, TokenEvent, TokenMetadata};

    const PHRASE: &str = "test test test test test test test test test test test junk";

    fn make_submitter() -> (Arc<Token>, TransactionSubmitter) {
        let token = Arc::new(Token::new(TokenMetadata::new("MyToken", "MTK", 18)));
        let submitter = TransactionSubmitter::new(
            token.clone(),
            Signer::from_mnemonic(PHRASE).unwrap(),
            Address::repeat_byte(0xc0),
            31337,
        );
        (token, submitter)
    }

    #[tokio::test]
    async fn test_submit_mint_records_receipt() {
        let (token, submitter) = make_submitter();
        let to = Address::repeat_byte(0x11);

        let receipt = submitter
            .submit(TokenCall::Mint {
                to,
                amount: U256::from(1000u64),
            })
            .await
            .unwrap();

        assert_eq!(token.balance_of(to), U256::from(1000u64));
        assert_eq!(receipt.nonce, 0);
        assert_eq!(receipt.logs.len(), 1);
        assert_eq!(
            receipt.logs[0].event,
            TokenEvent::Transfer {
                from: Address::ZERO,
                to,
                value: U256::from(1000u64),
            }
        );

        let stored = submitter.receipt(&receipt.hash).await.unwrap();
        assert_eq!(stored.hash, receipt.hash);
    }

    #[tokio::test]
    async fn test_signature_verifies_against_hash() {
        let (_, submitter) = make_submitter();
        let receipt = submitter
            .submit(TokenCall::Approve {
                spender: Address::repeat_byte(0x22),
                amount: U256::from(5u64),
            })
            .await
            .unwrap();

        let bytes = hex::decode(&receipt.signature).unwrap();
        assert_eq!(bytes.len(), 65);
        let signature = Signature::try_from(&bytes[..]).unwrap();
        assert!(submitter.signer.verify(&receipt.hash, &signature));
        assert_eq!(
            signature.recover_address_from_prehash(&receipt.hash).unwrap(),
            receipt.signer
        );
    }

    #[tokio::test]
    async fn test_rejected_call_keeps_nonce() {
        let (_, submitter) = make_submitter();
        let to = Address::repeat_byte(0x11);

        let err = submitter
            .submit(TokenCall::Transfer {
                to,
                amount: U256::from(1u64),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Ledger(TokenError::InsufficientBalance { .. })
        ));

        let receipt = submitter
            .submit(TokenCall::Mint {
                to,
                amount: U256::from(1u64),
            })
            .await
            .unwrap();
        assert_eq!(receipt.nonce, 0);
    }

    #[tokio::test]
    async fn test_identical_calls_get_distinct_hashes() {
        let (_, submitter) = make_submitter();
        let call = TokenCall::Mint {
            to: Address::repeat_byte(0x11),
            amount: U256::from(1u64),
        };

        let first = submitter.submit(call.clone()).await.unwrap();
        let second = submitter.submit(call).await.unwrap();
        assert_ne!(first.hash, second.hash);
        assert_eq!(second.nonce, 1);
    }

    #[tokio::test]
    async fn test_transfer_from_uses_signer_as_spender() {
        let (token, submitter) = make_submitter();
        let owner = Address::repeat_byte(0x33);
        let to = Address::repeat_byte(0x44);
        let signer = submitter.signer_address();

        token.mint(owner, owner, U256::from(100u64)).unwrap();
        token.approve(owner, signer, U256::from(60u64)).unwrap();

        submitter
            .submit(TokenCall::TransferFrom {
                from: owner,
                to,
                amount: U256::from(60u64),
            })
            .await
            .unwrap();

        assert_eq!(token.balance_of(owner), U256::from(40u64));
        assert_eq!(token.balance_of(to), U256::from(60u64));
        assert_eq!(token.allowance(owner, signer), U256::ZERO);
    }

    #[test]
    fn test_call_serialization() {
        let call = TokenCall::TransferFrom {
            from: Address::repeat_byte(0x11),
            to: Address::repeat_byte(0x22),
            amount: U256::from(1000u64),
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["method"], "transferFrom");
        assert_eq!(json["params"]["amount"], "1000");
    }
}
