/*
[INPUT]:  HTTP client configuration, session credentials, API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod api;
pub mod client;
pub mod error;
pub mod interceptor;
pub mod subscription;
pub mod wallets;
pub mod web3;

pub use error::{Result, WalletwatchError};
pub use interceptor::{BearerCredential, CredentialSource, RequestAuthorizer};

pub use api::MonitorApi;
pub use client::{ClientConfig, DEFAULT_API_BASE_URL, WalletwatchClient};
