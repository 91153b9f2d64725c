/*
[INPUT]:  Account requests and messages to sign
[OUTPUT]: Wallet accounts and signature strings
[POS]:    Auth layer - wallet-extension bridge abstraction
[UPDATE]: When adding wallet bridge types or changing signature format
*/

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use thiserror::Error;

use crate::types::WalletAddress;

/// Failure reported by a wallet bridge
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("wallet bridge is not available")]
    Unavailable,

    /// The user declined the request
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("{0}")]
    Failed(String),
}

/// Trait for wallet bridge operations
///
/// The trait is async to support browser extensions, hardware wallets and
/// other external signers.
#[async_trait]
pub trait WalletBridge: Send + Sync {
    /// Ask the wallet for account access; the first account is used
    async fn request_accounts(&self) -> Result<Vec<String>, BridgeError>;

    /// Sign `message` with `address` (EIP-191 `personal_sign` for EVM wallets)
    async fn sign(&self, message: &str, address: &WalletAddress) -> Result<String, BridgeError>;
}

/// Mock wallet bridge for testing
#[derive(Debug, Clone)]
pub struct MockWalletBridge {
    accounts: Vec<String>,
    signature: String,
    connect_error: Option<BridgeError>,
    sign_error: Option<BridgeError>,
    signed: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockWalletBridge {
    /// Bridge exposing one account and returning a fixed signature
    pub fn new(address: &str, signature: &str) -> Self {
        Self::with_accounts(vec![address.to_string()], signature)
    }

    pub fn with_accounts(accounts: Vec<String>, signature: &str) -> Self {
        Self {
            accounts,
            signature: signature.to_string(),
            connect_error: None,
            sign_error: None,
            signed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_connect_error(mut self, error: BridgeError) -> Self {
        self.connect_error = Some(error);
        self
    }

    pub fn with_sign_error(mut self, error: BridgeError) -> Self {
        self.sign_error = Some(error);
        self
    }

    /// `(message, address)` pairs this bridge was asked to sign
    pub fn signed_messages(&self) -> Vec<(String, String)> {
        self.signed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl WalletBridge for MockWalletBridge {
    async fn request_accounts(&self) -> Result<Vec<String>, BridgeError> {
        match &self.connect_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.accounts.clone()),
        }
    }

    async fn sign(&self, message: &str, address: &WalletAddress) -> Result<String, BridgeError> {
        self.signed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((message.to_string(), address.to_string()));

        match &self.sign_error {
            Some(error) => Err(error.clone()),
            None => Ok(self.signature.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_bridge() {
        let address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
        let bridge = MockWalletBridge::new(address, "0xmock_signature");

        assert_eq!(bridge.request_accounts().await.unwrap(), vec![address.to_string()]);

        let parsed = WalletAddress::parse(address).unwrap();
        let signature = bridge.sign("test message", &parsed).await.unwrap();
        assert_eq!(signature, "0xmock_signature");
        assert_eq!(
            bridge.signed_messages(),
            vec![("test message".to_string(), address.to_string())]
        );
    }

    #[tokio::test]
    async fn test_mock_bridge_rejection() {
        let bridge = MockWalletBridge::new("0xabc", "0xsig")
            .with_connect_error(BridgeError::Rejected("User rejected the request.".into()));

        let err = bridge.request_accounts().await.unwrap_err();
        assert_eq!(err.to_string(), "request rejected: User rejected the request.");
    }
}
