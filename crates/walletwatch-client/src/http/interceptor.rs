/*
[INPUT]:  Outbound request builders, session store, identity provider
[OUTPUT]: Requests carrying `Authorization: Bearer <token>` when a session exists
[POS]:    HTTP layer - attaches the active session's credential to API calls
[UPDATE]: When credential precedence or token sources change
*/

use std::fmt;
use std::sync::Arc;

use reqwest::RequestBuilder;
use tracing::debug;

use crate::auth::IdentityProvider;
use crate::http::{Result, WalletwatchError};
use crate::session::SessionStore;
use crate::session::store::token_prefix;

/// Where a bearer token came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Wallet,
    Provider,
}

#[derive(Clone, PartialEq, Eq)]
pub struct BearerCredential {
    pub source: CredentialSource,
    pub token: String,
}

impl fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerCredential")
            .field("source", &self.source)
            .field("token", &token_prefix(&self.token))
            .finish()
    }
}

/// Picks the bearer token for each outbound request.
///
/// 1. A persisted wallet token always wins; the provider is not consulted.
/// 2. Otherwise a fresh token for the provider's current user.
/// 3. Otherwise the request goes out unauthenticated.
#[derive(Clone)]
pub struct RequestAuthorizer {
    store: SessionStore,
    provider: Option<Arc<dyn IdentityProvider>>,
}

impl RequestAuthorizer {
    pub fn new(store: SessionStore, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            store,
            provider: Some(provider),
        }
    }

    /// Authorizer that only ever attaches wallet tokens
    pub fn wallet_only(store: SessionStore) -> Self {
        Self {
            store,
            provider: None,
        }
    }

    /// Resolve the credential for the next request
    pub async fn bearer_token(&self) -> Result<Option<BearerCredential>> {
        if let Some(token) = self.store.wallet_token() {
            return Ok(Some(BearerCredential {
                source: CredentialSource::Wallet,
                token,
            }));
        }

        let Some(provider) = &self.provider else {
            return Ok(None);
        };
        let Some(user) = provider.current_user() else {
            return Ok(None);
        };

        let token = provider.id_token(&user).await.map_err(|err| match err {
            WalletwatchError::TokenFetchFailed(message) => {
                WalletwatchError::TokenFetchFailed(message)
            }
            other => WalletwatchError::TokenFetchFailed(other.to_string()),
        })?;

        Ok(Some(BearerCredential {
            source: CredentialSource::Provider,
            token,
        }))
    }

    /// Attach the current credential, if any, to `builder`
    pub async fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        match self.bearer_token().await? {
            Some(credential) => {
                debug!(
                    source = ?credential.source,
                    token_prefix = token_prefix(&credential.token),
                    "attaching bearer token"
                );
                Ok(builder.bearer_auth(credential.token))
            }
            None => {
                debug!("no active session, sending request unauthenticated");
                Ok(builder)
            }
        }
    }
}

impl fmt::Debug for RequestAuthorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestAuthorizer")
            .field("store", &self.store)
            .field("has_provider", &self.provider.is_some())
            .finish()
    }
}
