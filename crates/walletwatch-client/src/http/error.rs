/*
[INPUT]:  Error sources (HTTP, API, wallet bridge, identity provider, session storage)
[OUTPUT]: Structured error types with human-readable messages
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::session::StorageError;

/// Main error type for the walletwatch client
#[derive(Error, Debug)]
pub enum WalletwatchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error (code {code}): {message}")]
    Api { code: i32, message: String },

    /// No wallet bridge is available in this environment
    #[error("A Web3 wallet is required to sign in with a wallet")]
    WalletUnavailable,

    /// The wallet returned an empty account list
    #[error("No accounts found")]
    NoAccount,

    /// The wallet refused or failed the account request
    #[error("Failed to connect wallet: {0}")]
    WalletConnectFailed(String),

    /// Address is not `0x` + 40 hex digits
    #[error("Invalid wallet address: {0}")]
    InvalidWalletAddress(String),

    /// Nonce/challenge request failed
    #[error("Failed to get nonce and message: {0}")]
    ChallengeRequestFailed(String),

    /// User declined the signature or the wallet errored
    #[error("Failed to sign message: {0}")]
    SignatureRejected(String),

    /// Backend rejected the signature; carries the server `detail` when present
    #[error("Failed to verify signature: {0}")]
    VerificationFailed(String),

    /// Identity provider sign-in failed
    #[error("Sign-in failed: {0}")]
    ProviderSignInFailed(String),

    /// Persisted wallet session could not be decoded
    #[error("Stored session is corrupt: {0}")]
    StorageCorrupt(String),

    /// Persisted wallet session could not be read or written
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    /// Bearer token could not be obtained for an outbound request
    #[error("Failed to fetch bearer token: {0}")]
    TokenFetchFailed(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WalletwatchError {
    /// Check if the error is worth retrying by re-invoking the same operation
    pub fn is_retryable(&self) -> bool {
        match self {
            WalletwatchError::Http(_) | WalletwatchError::ChallengeRequestFailed(_) => true,
            WalletwatchError::Api { code, .. } => *code >= 500 || *code == 429,
            _ => false,
        }
    }

    /// Check if error indicates an authentication or authorization failure
    pub fn is_auth_error(&self) -> bool {
        match self {
            WalletwatchError::SignatureRejected(_)
            | WalletwatchError::VerificationFailed(_)
            | WalletwatchError::ProviderSignInFailed(_)
            | WalletwatchError::TokenFetchFailed(_) => true,
            WalletwatchError::Api { code, .. } => *code == 401 || *code == 403,
            _ => false,
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        WalletwatchError::Api {
            code: status.as_u16() as i32,
            message: message.into(),
        }
    }
}

/// Result type alias for walletwatch operations
pub type Result<T> = std::result::Result<T, WalletwatchError>;
