/*
[INPUT]:  Identity-provider change callbacks, persisted wallet record
[OUTPUT]: Session transitions for provider sign-in and sign-out
[POS]:    Session layer - bridges the identity provider into the store
[UPDATE]: When precedence rules between provider and wallet sessions change
*/

use std::sync::Arc;

use tracing::debug;

use crate::auth::IdentityProvider;
use crate::types::{AuthMethod, ProviderIdentity, WalletIdentity};

use super::{SessionStore, SessionUpdate, Subscription};

/// Keeps the store in sync with the identity provider.
///
/// An active wallet session always wins: provider callbacks that arrive while
/// the method is [`AuthMethod::Wallet`] are dropped.
#[derive(Debug)]
pub struct IdentityProviderWatcher {
    subscription: Subscription,
    restored: Option<WalletIdentity>,
}

impl IdentityProviderWatcher {
    /// Hydrate any persisted wallet session, then follow the provider.
    pub fn start(store: &SessionStore, provider: &dyn IdentityProvider) -> Self {
        let restored = store.hydrate_wallet_session();
        if let Some(identity) = &restored {
            debug!(wallet = %identity.wallet_address, "restored wallet session");
        }

        let target = store.clone();
        let subscription = provider.on_change(Arc::new(move |user: Option<ProviderIdentity>| {
            let uid = user.as_ref().map(|user| user.uid.clone());
            let applied = target.set_state_if(
                |state| state.method != AuthMethod::Wallet,
                SessionUpdate::provider(user),
            );
            if !applied && target.get_state().method == AuthMethod::Wallet {
                debug!(uid = ?uid, "wallet session active, ignoring provider change");
            }
        }));

        Self {
            subscription,
            restored,
        }
    }

    /// Wallet identity restored from storage at start, if any
    pub fn restored_wallet(&self) -> Option<&WalletIdentity> {
        self.restored.as_ref()
    }

    /// Stop following the provider. Dropping the watcher does the same.
    pub fn stop(&self) {
        self.subscription.unsubscribe();
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::auth::StaticIdentityProvider;
    use crate::session::{MemoryStorage, SessionState};
    use crate::types::{Identity, WalletAddress};

    const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn wallet() -> WalletIdentity {
        WalletIdentity::new(WalletAddress::parse(ADDRESS).unwrap())
    }

    #[test]
    fn test_no_sessions_resolves_to_signed_out() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let provider = StaticIdentityProvider::new();

        let watcher = IdentityProviderWatcher::start(&store, &provider);

        assert!(watcher.restored_wallet().is_none());
        assert_eq!(
            store.get_state(),
            SessionState {
                identity: None,
                loading: false,
                method: AuthMethod::None,
            }
        );
    }

    #[test]
    fn test_stays_loading_until_first_callback() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let provider = StaticIdentityProvider::deferred();

        let _watcher = IdentityProviderWatcher::start(&store, &provider);
        assert!(store.get_state().loading);

        let user = ProviderIdentity::new("uid-1");
        provider.emit(Some(user.clone()));

        let state = store.get_state();
        assert!(!state.loading);
        assert_eq!(state.method, AuthMethod::Provider);
        assert_eq!(state.identity, Some(Identity::Provider(user)));
    }

    #[test]
    fn test_restored_wallet_beats_provider_user() {
        let storage = Arc::new(MemoryStorage::new());
        SessionStore::new(storage.clone())
            .set_wallet_auth(wallet(), "tok123")
            .unwrap();

        let store = SessionStore::new(storage);
        let provider = StaticIdentityProvider::new().signed_in(ProviderIdentity::new("uid-9"), "id");
        let watcher = IdentityProviderWatcher::start(&store, &provider);

        assert_eq!(watcher.restored_wallet(), Some(&wallet()));
        assert_eq!(store.get_state().method, AuthMethod::Wallet);

        provider.emit(Some(ProviderIdentity::new("uid-10")));
        assert_eq!(store.get_state().wallet_identity(), Some(&wallet()));
    }

    #[test]
    fn test_provider_sign_out_after_wallet_logout() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let provider = StaticIdentityProvider::deferred();
        let _watcher = IdentityProviderWatcher::start(&store, &provider);

        store.set_wallet_auth(wallet(), "tok123").unwrap();
        store.logout();

        provider.emit(Some(ProviderIdentity::new("uid-1")));
        assert_eq!(store.get_state().method, AuthMethod::Provider);
    }

    #[test]
    fn test_stop_detaches_from_provider() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let provider = StaticIdentityProvider::deferred();
        let watcher = IdentityProviderWatcher::start(&store, &provider);
        assert_eq!(provider.listener_count(), 1);

        watcher.stop();
        assert!(!watcher.is_active());
        assert_eq!(provider.listener_count(), 0);

        provider.emit(Some(ProviderIdentity::new("uid-1")));
        assert!(store.get_state().loading);

        drop(watcher);
        assert_eq!(provider.listener_count(), 0);
    }
}
