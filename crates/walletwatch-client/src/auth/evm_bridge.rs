/*
[INPUT]:  EVM private key (hex string)
[OUTPUT]: EIP-191 signatures and the wallet's checksummed address
[POS]:    Auth layer - local-key wallet bridge for headless use
[UPDATE]: When signing logic or EVM address formatting changes
*/

use std::str::FromStr;

use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;

use crate::auth::{BridgeError, WalletBridge};
use crate::http::{Result, WalletwatchError};
use crate::types::WalletAddress;

/// Wallet bridge backed by a local secp256k1 key
pub struct LocalKeyBridge {
    signer: PrivateKeySigner,
    address: String,
}

impl LocalKeyBridge {
    /// Create a bridge from a hex-encoded private key
    ///
    /// Supports both "0x"-prefixed and non-prefixed hex strings.
    pub fn new(private_key_hex: &str) -> Result<Self> {
        let private_key_hex = private_key_hex.trim();
        let private_key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);
        let signer = PrivateKeySigner::from_str(private_key_hex)
            .map_err(|e| WalletwatchError::Config(format!("Invalid EVM private key: {e}")))?;

        let address = signer.address().to_checksum(None);

        Ok(Self { signer, address })
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl std::fmt::Debug for LocalKeyBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalKeyBridge")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletBridge for LocalKeyBridge {
    async fn request_accounts(&self) -> std::result::Result<Vec<String>, BridgeError> {
        Ok(vec![self.address.clone()])
    }

    async fn sign(
        &self,
        message: &str,
        address: &WalletAddress,
    ) -> std::result::Result<String, BridgeError> {
        if !address.matches(&self.address) {
            return Err(BridgeError::Rejected(format!(
                "address {address} is not managed by this wallet"
            )));
        }

        let signature = self
            .signer
            .sign_message(message.as_bytes())
            .await
            .map_err(|e| BridgeError::Failed(format!("Failed to sign EVM message: {e}")))?;

        // [r, s, v]
        Ok(format!("0x{}", hex::encode(signature.as_bytes())))
    }
}
