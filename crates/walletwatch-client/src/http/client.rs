/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::http::{Result, WalletwatchError};
use crate::types::ErrorBody;

/// Default backend location for local development
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP client for the wallet-monitoring backend
#[derive(Debug, Clone)]
pub struct WalletwatchClient {
    http_client: Client,
    base_url: Url,
}

impl WalletwatchClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_API_BASE_URL)
    }

    /// Create a new client pointing at an explicit backend
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        // Relative endpoints join under the base path only with a trailing slash.
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        Ok(Self {
            http_client,
            base_url: Url::parse(&base)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint relative to the base URL
    fn url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    /// Build an unauthenticated request builder
    pub(crate) fn request(&self, method: Method, endpoint: &str) -> Result<RequestBuilder> {
        let url = self.url(endpoint)?;
        Ok(self.http_client.request(method, url))
    }

    /// Send a request and decode a JSON body; non-2xx becomes [`WalletwatchError::Api`]
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send a request whose response body is irrelevant
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        check_status(builder.send().await?).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_detail(&body).unwrap_or_else(|| format!("server responded with {status}"));
    Err(WalletwatchError::api_error(status, message))
}

/// Extract the human-readable `detail` field from an error body, if any.
pub(crate) fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client =
            WalletwatchClient::with_config_and_base_url(ClientConfig::default(), "http://host/api")
                .unwrap();
        assert_eq!(client.base_url().as_str(), "http://host/api/");
        assert_eq!(
            client.url("/auth/web3/nonce").unwrap().as_str(),
            "http://host/api/auth/web3/nonce"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = WalletwatchClient::with_config_and_base_url(ClientConfig::default(), "not a url")
            .unwrap_err();
        assert!(matches!(err, WalletwatchError::UrlParse(_)));
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(
            error_detail(r#"{"detail":"Invalid signature"}"#),
            Some("Invalid signature".to_string())
        );
        assert_eq!(error_detail(r#"{"detail":null}"#), None);
        assert_eq!(error_detail("<html>oops</html>"), None);
        assert_eq!(
            error_detail(r#"{"detail":[{"msg":"field required"}]}"#),
            Some(r#"[{"msg":"field required"}]"#.to_string())
        );
    }
}
