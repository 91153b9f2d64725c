/*
[INPUT]:  Identity-provider sign-in requests and token lookups
[OUTPUT]: Provider users, change notifications, short-lived bearer tokens
[POS]:    Auth layer - identity-provider SDK abstraction
[UPDATE]: When adding provider implementations or changing the callback contract
*/

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;

use crate::http::{Result, WalletwatchError};
use crate::session::Subscription;
use crate::types::ProviderIdentity;

/// Provider change callback; `None` means nobody is signed in.
pub type ProviderCallback = Arc<dyn Fn(Option<ProviderIdentity>) + Send + Sync>;

/// Identity-provider SDK surface used by the session layer.
///
/// The provider owns its own persistence; a provider that restores a user on
/// startup reports it through `on_change`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Interactive sign-in. The resulting user is also delivered via `on_change`.
    async fn sign_in(&self) -> Result<ProviderIdentity>;

    async fn sign_out(&self) -> Result<()>;

    /// Register for user changes. Implementations may invoke `callback`
    /// before returning.
    fn on_change(&self, callback: ProviderCallback) -> Subscription;

    fn current_user(&self) -> Option<ProviderIdentity>;

    /// Fresh short-lived bearer token for `user`
    async fn id_token(&self, user: &ProviderIdentity) -> Result<String>;
}

#[derive(Default)]
struct ProviderInner {
    account: RwLock<Option<(ProviderIdentity, String)>>,
    current: RwLock<Option<ProviderIdentity>>,
    listeners: Mutex<Vec<(u64, ProviderCallback)>>,
    next_listener_id: AtomicU64,
    deferred: bool,
    sign_in_error: RwLock<Option<String>>,
    token_error: RwLock<Option<String>>,
    token_requests: AtomicUsize,
}

/// In-process identity provider backed by a pre-issued account.
///
/// Used by the CLI (account from config) and by tests, which drive it with
/// [`emit`](Self::emit) to simulate provider callbacks.
#[derive(Clone, Default)]
pub struct StaticIdentityProvider {
    inner: Arc<ProviderInner>,
}

impl StaticIdentityProvider {
    /// Provider with no account and nobody signed in
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that does not report the current user on subscribe;
    /// callbacks arrive only through [`emit`](Self::emit).
    pub fn deferred() -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                deferred: true,
                ..ProviderInner::default()
            }),
        }
    }

    /// Account that `sign_in` will produce, issuing `token`
    pub fn with_account(self, user: ProviderIdentity, token: impl Into<String>) -> Self {
        *self.inner.account.write().unwrap_or_else(PoisonError::into_inner) =
            Some((user, token.into()));
        self
    }

    /// Account that is already signed in (restored provider session)
    pub fn signed_in(self, user: ProviderIdentity, token: impl Into<String>) -> Self {
        *self.inner.current.write().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
        self.with_account(user, token)
    }

    /// Make every subsequent `sign_in` fail with `message`
    pub fn fail_sign_in(&self, message: impl Into<String>) {
        *self
            .inner
            .sign_in_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    /// Make every subsequent `id_token` fail with `message`
    pub fn fail_token(&self, message: impl Into<String>) {
        *self
            .inner
            .token_error
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    /// Change the current user and notify every listener
    pub fn emit(&self, user: Option<ProviderIdentity>) {
        *self.inner.current.write().unwrap_or_else(PoisonError::into_inner) = user.clone();

        let listeners: Vec<ProviderCallback> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in listeners {
            callback(user.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// How many tokens were handed out (or attempted)
    pub fn token_requests(&self) -> usize {
        self.inner.token_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(&self) -> Result<ProviderIdentity> {
        if let Some(message) = self
            .inner
            .sign_in_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(WalletwatchError::ProviderSignInFailed(message));
        }

        let account = self
            .inner
            .account
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let (user, _) = account.ok_or_else(|| {
            WalletwatchError::ProviderSignInFailed("no provider account configured".to_string())
        })?;

        self.emit(Some(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        self.emit(None);
        Ok(())
    }

    fn on_change(&self, callback: ProviderCallback) -> Subscription {
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::clone(&callback)));

        if !self.inner.deferred {
            callback(self.current_user());
        }

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner
                    .listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    fn current_user(&self) -> Option<ProviderIdentity> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn id_token(&self, user: &ProviderIdentity) -> Result<String> {
        self.inner.token_requests.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self
            .inner
            .token_error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(WalletwatchError::TokenFetchFailed(message));
        }

        if self.current_user().as_ref() != Some(user) {
            return Err(WalletwatchError::TokenFetchFailed(
                "user is not signed in".to_string(),
            ));
        }

        self.inner
            .account
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, token)| token.clone())
            .ok_or_else(|| WalletwatchError::TokenFetchFailed("no token issued".to_string()))
    }
}

impl fmt::Debug for StaticIdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticIdentityProvider")
            .field("current_user", &self.current_user())
            .field("listeners", &self.listener_count())
            .field("deferred", &self.inner.deferred)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> ProviderIdentity {
        ProviderIdentity::new("uid-1").with_email("ada@example.com")
    }

    #[tokio::test]
    async fn test_sign_in_notifies_listeners() {
        let provider = StaticIdentityProvider::new().with_account(user(), "id-token");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _subscription = provider.on_change(Arc::new(move |user| {
            sink.lock().unwrap().push(user);
        }));

        let signed_in = provider.sign_in().await.unwrap();
        assert_eq!(signed_in, user());
        assert_eq!(*seen.lock().unwrap(), vec![None, Some(user())]);

        assert_eq!(provider.id_token(&user()).await.unwrap(), "id-token");
        provider.sign_out().await.unwrap();
        assert!(provider.current_user().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_without_account_fails() {
        let provider = StaticIdentityProvider::new();
        let err = provider.sign_in().await.unwrap_err();
        assert!(matches!(err, WalletwatchError::ProviderSignInFailed(_)));
    }

    #[tokio::test]
    async fn test_token_failure() {
        let provider = StaticIdentityProvider::new().signed_in(user(), "id-token");
        provider.fail_token("network down");

        let err = provider.id_token(&user()).await.unwrap_err();
        assert!(matches!(err, WalletwatchError::TokenFetchFailed(msg) if msg == "network down"));
        assert_eq!(provider.token_requests(), 1);
    }

    #[test]
    fn test_deferred_provider_is_silent_on_subscribe() {
        let provider = StaticIdentityProvider::deferred();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let subscription = provider.on_change(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        provider.emit(None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        subscription.unsubscribe();
        assert_eq!(provider.listener_count(), 0);
    }
}
