/*
[INPUT]:  Session store, identity provider, wallet-signature flow
[OUTPUT]: Read-only session view plus login/logout actions for UI consumers
[POS]:    Session layer - mounted once at application root
[UPDATE]: When consumer-facing session operations change
*/

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::auth::{IdentityProvider, WalletSignatureFlow};
use crate::http::{RequestAuthorizer, Result, WalletwatchError};
use crate::types::{AuthMethod, Identity, ProviderIdentity, WalletIdentity};

use super::{IdentityProviderWatcher, RouteAccess, SessionState, SessionStore, Subscription};

/// Application-root session handle.
///
/// Holds a store subscription and a provider watcher; both are released by
/// [`unmount`](Self::unmount) or on drop.
pub struct SessionFacade {
    store: SessionStore,
    provider: Arc<dyn IdentityProvider>,
    snapshot: Arc<RwLock<SessionState>>,
    store_subscription: Subscription,
    watcher: IdentityProviderWatcher,
}

impl SessionFacade {
    pub fn mount(store: SessionStore, provider: Arc<dyn IdentityProvider>) -> Self {
        let snapshot = Arc::new(RwLock::new(store.get_state()));
        let sink = Arc::clone(&snapshot);
        let store_subscription = store.subscribe(move |state| {
            *sink.write().unwrap_or_else(PoisonError::into_inner) = state.clone();
        });

        let watcher = IdentityProviderWatcher::start(&store, provider.as_ref());

        Self {
            store,
            provider,
            snapshot,
            store_subscription,
            watcher,
        }
    }

    pub fn state(&self) -> SessionState {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state().identity
    }

    pub fn loading(&self) -> bool {
        self.state().loading
    }

    pub fn method(&self) -> AuthMethod {
        self.state().method
    }

    pub fn access(&self) -> RouteAccess {
        self.state().access()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Commit an already verified wallet login
    pub fn login_with_wallet(&self, identity: WalletIdentity, token: &str) -> Result<()> {
        self.store.set_wallet_auth(identity, token)
    }

    /// Run the wallet-signature flow and commit its result.
    ///
    /// Returns `Ok(None)` when a logout happened while the flow was running;
    /// nothing is committed in that case.
    pub async fn connect_wallet(&self, flow: &WalletSignatureFlow) -> Result<Option<WalletIdentity>> {
        let generation = self.store.logout_generation();
        let login = flow.authenticate().await?;

        if self.store.logout_generation() != generation {
            info!(
                wallet = %login.identity.wallet_address,
                "signed out during wallet login, discarding result"
            );
            return Ok(None);
        }

        self.store.set_wallet_auth(login.identity.clone(), &login.token)?;
        Ok(Some(login.identity))
    }

    /// Interactive provider sign-in; the watcher applies the resulting user.
    pub async fn login_with_provider(&self) -> Result<ProviderIdentity> {
        self.provider.sign_in().await.map_err(|err| match err {
            WalletwatchError::ProviderSignInFailed(message) => {
                WalletwatchError::ProviderSignInFailed(message)
            }
            other => WalletwatchError::ProviderSignInFailed(other.to_string()),
        })
    }

    /// Sign out of whichever method is active
    pub async fn logout(&self) {
        if self.store.get_state().method == AuthMethod::Provider {
            if let Err(err) = self.provider.sign_out().await {
                warn!(error = %err, "provider sign-out failed");
            }
        }
        self.store.logout();
    }

    /// Push updates; the listener is called right away with the current state.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        self.store.subscribe(listener)
    }

    /// Request authorizer bound to this session and provider
    pub fn authorizer(&self) -> RequestAuthorizer {
        RequestAuthorizer::new(self.store.clone(), Arc::clone(&self.provider))
    }

    /// Release the store subscription and the provider watcher
    pub fn unmount(self) {
        self.store_subscription.unsubscribe();
        self.watcher.stop();
    }
}

impl fmt::Debug for SessionFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionFacade")
            .field("state", &self.state())
            .field("store_subscription", &self.store_subscription)
            .field("watcher", &self.watcher)
            .finish_non_exhaustive()
    }
}
