/*
[INPUT]:  Wallet bridge and HTTP client
[OUTPUT]: Wallet identity plus bearer token
[POS]:    Auth layer - orchestrates the wallet-signature login handshake
[UPDATE]: When auth endpoints or flow steps change
*/

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::http::{Result, WalletwatchClient, WalletwatchError};
use crate::session::store::token_prefix;
use crate::types::{NonceResponse, WalletAddress, WalletIdentity};

use super::{BridgeError, WalletBridge};

/// Where a wallet login currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Idle,
    Connecting,
    AwaitingChallenge,
    AwaitingSignature,
    Verifying,
    Succeeded,
    Failed,
}

/// Successful wallet login, not yet committed to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletLogin {
    pub identity: WalletIdentity,
    pub token: String,
}

/// Runs the wallet-signature login.
///
/// Each run is independent; retry by calling [`authenticate`](Self::authenticate)
/// again. The flow never touches the session store.
#[derive(Clone)]
pub struct WalletSignatureFlow {
    client: WalletwatchClient,
    bridge: Option<Arc<dyn WalletBridge>>,
}

impl WalletSignatureFlow {
    pub fn new(client: WalletwatchClient, bridge: Arc<dyn WalletBridge>) -> Self {
        Self {
            client,
            bridge: Some(bridge),
        }
    }

    /// Flow for an environment without any wallet; every run fails with
    /// [`WalletwatchError::WalletUnavailable`].
    pub fn without_bridge(client: WalletwatchClient) -> Self {
        Self {
            client,
            bridge: None,
        }
    }

    fn bridge(&self) -> Result<&Arc<dyn WalletBridge>> {
        self.bridge.as_ref().ok_or(WalletwatchError::WalletUnavailable)
    }

    /// Step 1: ask the wallet for an account
    pub async fn connect_wallet(&self) -> Result<WalletAddress> {
        let accounts = self.bridge()?.request_accounts().await.map_err(|err| match err {
            BridgeError::Unavailable => WalletwatchError::WalletUnavailable,
            BridgeError::Rejected(msg) | BridgeError::Failed(msg) => {
                WalletwatchError::WalletConnectFailed(msg)
            }
        })?;

        let first = accounts.first().ok_or(WalletwatchError::NoAccount)?;
        let address = WalletAddress::parse(first)?;
        debug!(wallet = %address, "wallet connected");
        Ok(address)
    }

    /// Step 2: fetch the single-use challenge for `address`
    ///
    /// POST /auth/web3/nonce
    pub async fn request_challenge(&self, address: &WalletAddress) -> Result<NonceResponse> {
        let challenge = self
            .client
            .request_nonce(address)
            .await
            .map_err(|err| match err {
                WalletwatchError::Api { message, .. } => {
                    WalletwatchError::ChallengeRequestFailed(message)
                }
                other => WalletwatchError::ChallengeRequestFailed(other.to_string()),
            })?;
        debug!(nonce = %challenge.nonce, "challenge received");
        Ok(challenge)
    }

    /// Step 3: sign the server's message exactly as received
    pub async fn sign_challenge(&self, message: &str, address: &WalletAddress) -> Result<String> {
        self.bridge()?
            .sign(message, address)
            .await
            .map_err(|err| match err {
                BridgeError::Unavailable => WalletwatchError::WalletUnavailable,
                BridgeError::Rejected(msg) | BridgeError::Failed(msg) => {
                    WalletwatchError::SignatureRejected(msg)
                }
            })
    }

    /// Step 4: submit the signature for a bearer token
    ///
    /// POST /auth/web3/verify
    pub async fn verify_signature(&self, address: &WalletAddress, signature: &str) -> Result<String> {
        let verified = self
            .client
            .verify_signature(address, signature)
            .await
            .map_err(|err| match err {
                WalletwatchError::Api { message, .. } => WalletwatchError::VerificationFailed(message),
                other => WalletwatchError::VerificationFailed(other.to_string()),
            })?;

        if verified.token.trim().is_empty() {
            return Err(WalletwatchError::VerificationFailed(
                "server returned an empty token".to_string(),
            ));
        }
        Ok(verified.token)
    }

    /// Complete wallet login
    ///
    /// 1. Connect wallet
    /// 2. Request challenge
    /// 3. Sign the challenge message verbatim
    /// 4. Verify signature to get the token
    pub async fn authenticate(&self) -> Result<WalletLogin> {
        self.authenticate_with_progress(|_| {}).await
    }

    /// [`authenticate`](Self::authenticate), reporting every phase to `progress`
    pub async fn authenticate_with_progress<F>(&self, mut progress: F) -> Result<WalletLogin>
    where
        F: FnMut(FlowPhase) + Send,
    {
        let result = self.run(&mut progress).await;
        match &result {
            Ok(login) => {
                info!(
                    wallet = %login.identity.wallet_address,
                    token_prefix = token_prefix(&login.token),
                    "wallet login verified"
                );
                progress(FlowPhase::Succeeded);
            }
            Err(err) => {
                debug!(error = %err, "wallet login failed");
                progress(FlowPhase::Failed);
            }
        }
        result
    }

    async fn run<F>(&self, progress: &mut F) -> Result<WalletLogin>
    where
        F: FnMut(FlowPhase) + Send,
    {
        progress(FlowPhase::Connecting);
        let address = self.connect_wallet().await?;

        progress(FlowPhase::AwaitingChallenge);
        let challenge = self.request_challenge(&address).await?;

        progress(FlowPhase::AwaitingSignature);
        let signature = self.sign_challenge(&challenge.message, &address).await?;

        progress(FlowPhase::Verifying);
        let token = self.verify_signature(&address, &signature).await?;

        Ok(WalletLogin {
            identity: WalletIdentity::new(address),
            token,
        })
    }
}

impl fmt::Debug for WalletSignatureFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSignatureFlow")
            .field("client", &self.client)
            .field("has_bridge", &self.bridge.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::auth::MockWalletBridge;
    use crate::http::ClientConfig;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ADDRESS: &str = "0xABCDEF0123456789abcdef0123456789ABCDEF01";

    fn client_for(server: &MockServer) -> WalletwatchClient {
        WalletwatchClient::with_config_and_base_url(ClientConfig::default(), &server.uri()).unwrap()
    }

    async fn mount_nonce(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/auth/web3/nonce"))
            .and(body_json(serde_json::json!({ "wallet_address": ADDRESS })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nonce": "n1",
                "message": "Sign this: n1",
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_flow_happy_path_reports_phases() {
        let server = MockServer::start().await;
        mount_nonce(&server).await;
        Mock::given(method("POST"))
            .and(path("/auth/web3/verify"))
            .and(body_json(serde_json::json!({
                "wallet_address": ADDRESS,
                "signature": "0xsig",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": "tok123" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let bridge = MockWalletBridge::new(ADDRESS, "0xsig");
        let flow = WalletSignatureFlow::new(client_for(&server), Arc::new(bridge.clone()));

        let mut phases = Vec::new();
        let login = flow
            .authenticate_with_progress(|phase| phases.push(phase))
            .await
            .unwrap();

        assert_eq!(login.identity.wallet_address.as_str(), ADDRESS);
        assert_eq!(login.token, "tok123");
        assert_eq!(
            phases,
            vec![
                FlowPhase::Connecting,
                FlowPhase::AwaitingChallenge,
                FlowPhase::AwaitingSignature,
                FlowPhase::Verifying,
                FlowPhase::Succeeded,
            ]
        );
        // server message is signed verbatim
        assert_eq!(
            bridge.signed_messages(),
            vec![("Sign this: n1".to_string(), ADDRESS.to_string())]
        );
    }

    #[tokio::test]
    async fn test_flow_without_bridge() {
        let flow = WalletSignatureFlow::without_bridge(WalletwatchClient::new().unwrap());

        let mut phases = Vec::new();
        let err = flow
            .authenticate_with_progress(|phase| phases.push(phase))
            .await
            .unwrap_err();

        assert!(matches!(err, WalletwatchError::WalletUnavailable));
        assert_eq!(phases, vec![FlowPhase::Connecting, FlowPhase::Failed]);
    }

    #[tokio::test]
    async fn test_flow_empty_account_list() {
        let bridge = MockWalletBridge::with_accounts(Vec::new(), "0xsig");
        let flow = WalletSignatureFlow::new(WalletwatchClient::new().unwrap(), Arc::new(bridge));

        let err = flow.connect_wallet().await.unwrap_err();
        assert!(matches!(err, WalletwatchError::NoAccount));
    }

    #[tokio::test]
    async fn test_flow_bridge_unavailable_at_runtime() {
        let bridge =
            MockWalletBridge::new(ADDRESS, "0xsig").with_connect_error(BridgeError::Unavailable);
        let flow = WalletSignatureFlow::new(WalletwatchClient::new().unwrap(), Arc::new(bridge));

        let err = flow.connect_wallet().await.unwrap_err();
        assert!(matches!(err, WalletwatchError::WalletUnavailable));
    }

    #[tokio::test]
    async fn test_flow_challenge_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/web3/nonce"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let flow = WalletSignatureFlow::new(
            client_for(&server),
            Arc::new(MockWalletBridge::new(ADDRESS, "0xsig")),
        );
        let err = flow.authenticate().await.unwrap_err();
        assert!(matches!(err, WalletwatchError::ChallengeRequestFailed(_)));
    }

    #[tokio::test]
    async fn test_flow_signature_rejected() {
        let server = MockServer::start().await;
        mount_nonce(&server).await;

        let bridge = MockWalletBridge::new(ADDRESS, "0xsig")
            .with_sign_error(BridgeError::Rejected("User denied message signature".into()));
        let flow = WalletSignatureFlow::new(client_for(&server), Arc::new(bridge));

        let err = flow.authenticate().await.unwrap_err();
        match err {
            WalletwatchError::SignatureRejected(msg) => {
                assert_eq!(msg, "User denied message signature");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_flow_verification_surfaces_detail() {
        let server = MockServer::start().await;
        mount_nonce(&server).await;
        Mock::given(method("POST"))
            .and(path("/auth/web3/verify"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({ "detail": "Nonce expired or invalid" })),
            )
            .mount(&server)
            .await;

        let flow = WalletSignatureFlow::new(
            client_for(&server),
            Arc::new(MockWalletBridge::new(ADDRESS, "0xsig")),
        );
        let err = flow.authenticate().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to verify signature: Nonce expired or invalid"
        );
    }

    #[tokio::test]
    async fn test_flow_invalid_account_address() {
        let bridge = MockWalletBridge::new("not-an-address", "0xsig");
        let flow = WalletSignatureFlow::new(WalletwatchClient::new().unwrap(), Arc::new(bridge));

        let err = flow.connect_wallet().await.unwrap_err();
        assert!(matches!(err, WalletwatchError::InvalidWalletAddress(_)));
    }
}
