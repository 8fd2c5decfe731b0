use alloy_primitives::{Address, B256};
use alloy_signer::{Signature, SignerSync};
use alloy_signer_local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignerError {
    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("signing failed: {0}")]
    Signing(String),
}

/// The single server-held identity every gateway write is issued under.
///
/// The key is the secp256k1 account at `m/44'/60'/0'/0/{index}` of a BIP-39
/// mnemonic, the same account a standard Ethereum wallet derives.
pub struct Signer {
    wallet: PrivateKeySigner,
}

impl Signer {
    /// First account of `phrase`. Whitespace and case in the phrase are not
    /// significant; words must come from the English BIP-39 list and carry a
    /// valid checksum.
    pub fn from_mnemonic(phrase: &str) -> Result<Self, SignerError> {
        Self::from_mnemonic_index(phrase, 0)
    }

    pub fn from_mnemonic_index(phrase: &str, index: u32) -> Result<Self, SignerError> {
        let normalized = phrase
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");

        let wallet = MnemonicBuilder::<English>::default()
            .phrase(normalized)
            .index(index)
            .map_err(|e| SignerError::InvalidMnemonic(e.to_string()))?
            .build()
            .map_err(|e| SignerError::InvalidMnemonic(e.to_string()))?;

        Ok(Self { wallet })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn sign(&self, hash: &B256) -> Result<Signature, SignerError> {
        self.wallet
            .sign_hash_sync(hash)
            .map_err(|e| SignerError::Signing(e.to_string()))
    }

    /// True when `signature` over `hash` recovers to this signer's address.
    pub fn verify(&self, hash: &B256, signature: &Signature) -> bool {
        signature
            .recover_address_from_prehash(hash)
            .is_ok_and(|recovered| recovered == self.address())
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;

    const PHRASE: &str =
        "test test test test test test test test test test test junk";

    fn addr(s: &str) -> Address {
        s.parse().unwrap()
    }

    #[test]
    fn test_derives_standard_wallet_accounts() {
        let first = Signer::from_mnemonic(PHRASE).unwrap();
        assert_eq!(
            first.address(),
            addr("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );

        let second = Signer::from_mnemonic_index(PHRASE, 1).unwrap();
        assert_eq!(
            second.address(),
            addr("0x70997970C51812dc3A010C7d01b50e0d17dc79C8")
        );
    }

    #[test]
    fn test_phrase_is_normalized() {
        let a = Signer::from_mnemonic(PHRASE).unwrap();
        let b = Signer::from_mnemonic("  TEST test test test test test test test test test test   junk ").unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn test_rejects_words_outside_wordlist() {
        let result = Signer::from_mnemonic("aa bb cc dd ee ff gg hh ii jj kk ll");
        assert!(matches!(result, Err(SignerError::InvalidMnemonic(_))));
    }

    #[test]
    fn test_rejects_bad_checksum() {
        let phrase = vec!["abandon"; 12].join(" ");
        assert!(matches!(
            Signer::from_mnemonic(&phrase),
            Err(SignerError::InvalidMnemonic(_))
        ));
    }

    #[test]
    fn test_rejects_empty_phrase() {
        assert!(Signer::from_mnemonic("").is_err());
        assert!(Signer::from_mnemonic("only three words").is_err());
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = Signer::from_mnemonic(PHRASE).unwrap();
        let other = Signer::from_mnemonic_index(PHRASE, 1).unwrap();
        let hash = keccak256(b"payload");

        let sig = signer.sign(&hash).unwrap();
        assert!(signer.verify(&hash, &sig));
        assert!(!signer.verify(&keccak256(b"other"), &sig));
        assert!(!other.verify(&hash, &sig));
    }

    #[test]
    fn test_debug_hides_key() {
        let signer = Signer::from_mnemonic(PHRASE).unwrap();
        let debug = format!("{signer:?}");
        assert!(debug.contains("address"));
        assert!(!debug.contains("wallet"));
    }
}
