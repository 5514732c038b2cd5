//! Key pairs and the addresses they control

use alloy::primitives::{Address, B256};
use alloy::signers::local::PrivateKeySigner;
use k256::ecdsa::VerifyingKey;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

/// A secp256k1 key pair and its address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    pub address: Address,
    pub private_key: B256,
    /// SEC1 uncompressed encoding, 65 bytes starting with `0x04`
    pub public_key: Vec<u8>,
}

impl Wallet {
    /// Fresh key pair from the OS random source
    pub fn random() -> Self {
        Self::from_signer(&PrivateKeySigner::random())
    }

    pub fn from_private_key(key: &B256) -> Result<Self, WalletError> {
        let signer = PrivateKeySigner::from_bytes(key)
            .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))?;
        Ok(Self::from_signer(&signer))
    }

    pub fn from_signer(signer: &PrivateKeySigner) -> Self {
        let verifying_key = signer.credential().verifying_key();
        Self {
            address: signer.address(),
            private_key: signer.to_bytes(),
            public_key: verifying_key.to_encoded_point(false).as_bytes().to_vec(),
        }
    }

    /// Address derived from the stored public key
    pub fn address_from_public_key(&self) -> Result<Address, WalletError> {
        let key = VerifyingKey::from_sec1_bytes(&self.public_key)
            .map_err(|e| WalletError::InvalidPublicKey(e.to_string()))?;
        Ok(Address::from_public_key(&key))
    }

    /// Address derived from the stored private key
    pub fn address_from_private_key(&self) -> Result<Address, WalletError> {
        Ok(Self::from_private_key(&self.private_key)?.address)
    }

    /// Both derivations agree with `address`
    pub fn is_consistent(&self) -> bool {
        matches!(self.address_from_private_key(), Ok(a) if a == self.address)
            && matches!(self.address_from_public_key(), Ok(a) if a == self.address)
    }

    pub fn private_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.private_key))
    }

    pub fn public_key_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.public_key))
    }
}
