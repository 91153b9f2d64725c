/*
[INPUT]:  HTTP client and request authorizer
[OUTPUT]: Authenticated request builders for resource endpoints
[POS]:    HTTP layer - entry point for every call that needs a session
[UPDATE]: When resource endpoints need different authentication
*/

use reqwest::{Method, RequestBuilder};

use crate::http::{RequestAuthorizer, Result, WalletwatchClient};

/// Resource API for the monitoring backend.
///
/// Endpoints live in [`wallets`](super::wallets) and
/// [`subscription`](super::subscription); every request goes through the
/// authorizer.
#[derive(Debug, Clone)]
pub struct MonitorApi {
    client: WalletwatchClient,
    authorizer: RequestAuthorizer,
}

impl MonitorApi {
    pub fn new(client: WalletwatchClient, authorizer: RequestAuthorizer) -> Self {
        Self { client, authorizer }
    }

    pub fn client(&self) -> &WalletwatchClient {
        &self.client
    }

    /// Build a request with the current session's bearer token attached
    pub(crate) async fn authed(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let builder = self.client.request(method, endpoint)?;
        self.authorizer.authorize(builder).await
    }

    pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T> {
        self.client.send_json(builder).await
    }

    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.client.send_empty(builder).await
    }
}
