/*
[INPUT]:  Wallet address and signature
[OUTPUT]: Sign-in challenge and bearer token
[POS]:    HTTP layer - wallet-signature auth endpoints (no auth required)
[UPDATE]: When the web3 auth endpoints or payloads change
*/

use reqwest::Method;

use crate::http::{Result, WalletwatchClient};
use crate::types::{NonceRequest, NonceResponse, VerifyRequest, VerifyResponse, WalletAddress};

impl WalletwatchClient {
    /// Request a single-use sign-in challenge
    ///
    /// POST /auth/web3/nonce
    pub async fn request_nonce(&self, wallet_address: &WalletAddress) -> Result<NonceResponse> {
        let body = NonceRequest { wallet_address };
        let builder = self.request(Method::POST, "/auth/web3/nonce")?.json(&body);
        self.send_json(builder).await
    }

    /// Exchange a signed challenge for a bearer token
    ///
    /// POST /auth/web3/verify
    pub async fn verify_signature(
        &self,
        wallet_address: &WalletAddress,
        signature: &str,
    ) -> Result<VerifyResponse> {
        let body = VerifyRequest {
            wallet_address,
            signature,
        };
        let builder = self.request(Method::POST, "/auth/web3/verify")?.json(&body);
        self.send_json(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, WalletwatchClient, WalletwatchError};
    use crate::types::WalletAddress;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn client_for(server: &MockServer) -> WalletwatchClient {
        WalletwatchClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init")
    }

    #[tokio::test]
    async fn test_request_nonce() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/web3/nonce"))
            .and(body_json(serde_json::json!({ "wallet_address": ADDRESS })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nonce": "n1",
                "message": "Sign this: n1",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let address = WalletAddress::parse(ADDRESS).unwrap();
        let challenge = client_for(&server).request_nonce(&address).await.unwrap();
        assert_eq!(challenge.nonce, "n1");
        assert_eq!(challenge.message, "Sign this: n1");
    }

    #[tokio::test]
    async fn test_verify_signature_error_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/web3/verify"))
            .and(body_json(serde_json::json!({
                "wallet_address": ADDRESS,
                "signature": "0xsig",
            })))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "detail": "Invalid signature" })),
            )
            .mount(&server)
            .await;

        let address = WalletAddress::parse(ADDRESS).unwrap();
        let err = client_for(&server)
            .verify_signature(&address, "0xsig")
            .await
            .unwrap_err();

        match err {
            WalletwatchError::Api { code, message } => {
                assert_eq!(code, 401);
                assert_eq!(message, "Invalid signature");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
