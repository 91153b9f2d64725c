/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for walletwatch-client tests

use std::sync::Arc;

use walletwatch_client::{
    ClientConfig, MemoryStorage, SessionStore, WalletAddress, WalletIdentity, WalletwatchClient,
};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const TEST_ADDRESS: &str = "0xABCDEF0123456789abcdef0123456789ABCDEF01";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> WalletwatchClient {
    WalletwatchClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
        .expect("client should build")
}

#[allow(dead_code)]
/// Store over a fresh in-memory storage; the storage is returned for reloads
pub fn memory_store() -> (SessionStore, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    (SessionStore::new(storage.clone()), storage)
}

#[allow(dead_code)]
pub fn test_wallet() -> WalletIdentity {
    WalletIdentity::new(WalletAddress::parse(TEST_ADDRESS).expect("valid address"))
}

/// Backend that issues challenge `n1` and accepts signature `0xsig` with `tok123`
#[allow(dead_code)]
pub async fn mount_wallet_backend(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/web3/nonce"))
        .and(body_json(serde_json::json!({ "wallet_address": TEST_ADDRESS })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "nonce": "n1",
            "message": "Sign this: n1",
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/web3/verify"))
        .and(body_json(serde_json::json!({
            "wallet_address": TEST_ADDRESS,
            "signature": "0xsig",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "tok123" })),
        )
        .mount(server)
        .await;
}
