/*
[INPUT]:  Session updates from the wallet flow, provider watcher and logout
[OUTPUT]: Current session snapshot, change notifications, persisted wallet record
[POS]:    Session layer - single source of truth for the signed-in identity
[UPDATE]: When changing transition rules, persistence keys or notification order
*/

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::http::{Result, WalletwatchError};
use crate::types::{AuthMethod, WalletAddress, WalletIdentity};

use super::{
    SessionState, SessionStorage, SessionUpdate, Subscription, WALLET_TOKEN_KEY, WALLET_USER_KEY,
};

/// Session change listener
pub type Listener = Arc<dyn Fn(&SessionState) + Send + Sync>;

/// On-disk shape of the wallet identity: `{"walletAddress": "...", "authMethod": "web3"}`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedWalletUser {
    wallet_address: WalletAddress,
    auth_method: PersistedMethodTag,
}

#[derive(Debug, Serialize, Deserialize)]
enum PersistedMethodTag {
    #[serde(rename = "web3")]
    Web3,
}

struct Inner {
    state: RwLock<SessionState>,
    listeners: Mutex<Vec<(u64, Listener)>>,
    next_listener_id: AtomicU64,
    logout_generation: AtomicU64,
    storage: Arc<dyn SessionStorage>,
}

impl Inner {
    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<(u64, Listener)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Process-wide session store.
///
/// Construct one per process and hand out clones; clones share state,
/// listeners and storage.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(SessionState::initial()),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(0),
                logout_generation: AtomicU64::new(0),
                storage,
            }),
        }
    }

    pub fn get_state(&self) -> SessionState {
        self.inner.read_state().clone()
    }

    /// Merge `update` into the current state and notify listeners.
    ///
    /// Does nothing, and notifies nobody, when no touched key would change.
    pub fn set_state(&self, update: SessionUpdate) {
        self.set_state_if(|_| true, update);
    }

    /// Like [`set_state`](Self::set_state), but only when `guard` accepts the
    /// current state. The check and the merge happen under one lock.
    ///
    /// Returns whether the state changed.
    pub fn set_state_if(
        &self,
        guard: impl FnOnce(&SessionState) -> bool,
        update: SessionUpdate,
    ) -> bool {
        {
            let mut state = self.inner.write_state();
            if !guard(&state) {
                return false;
            }
            if !merge(&mut state, update) {
                return false;
            }
        }

        self.notify();
        true
    }

    /// Register a listener. It is called right away with the current state,
    /// then after every change.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.inner.lock_listeners().push((id, Arc::clone(&listener)));

        listener(&self.get_state());

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.lock_listeners().retain(|(listener_id, _)| *listener_id != id);
            }
        })
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock_listeners().len()
    }

    fn notify(&self) {
        let state = self.get_state();
        debug!(
            method = %state.method,
            loading = state.loading,
            authenticated = state.is_authenticated(),
            "session state changed"
        );

        // Copy first: listeners may unsubscribe (or subscribe) while we iterate.
        let listeners: Vec<Listener> = self
            .inner
            .lock_listeners()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        // Read per listener: an earlier listener may have moved the state on.
        for listener in listeners {
            listener(&self.get_state());
        }
    }

    /// Persist a verified wallet login, then make it the active session.
    ///
    /// State is left untouched when the record cannot be written.
    pub fn set_wallet_auth(&self, identity: WalletIdentity, token: &str) -> Result<()> {
        let changed = {
            let mut state = self.inner.write_state();
            self.persist_wallet_record(&identity, token)?;
            info!(
                wallet = %identity.wallet_address,
                token_prefix = token_prefix(token),
                "wallet session committed"
            );
            merge(&mut state, SessionUpdate::wallet(identity))
        };

        if changed {
            self.notify();
        }
        Ok(())
    }

    /// Sign out. Clears the wallet record when a wallet session is active.
    ///
    /// The method check, the record removal and the reset share one write
    /// lock, so a concurrent [`set_wallet_auth`](Self::set_wallet_auth) lands
    /// either fully before or fully after.
    pub fn logout(&self) {
        let (previous, changed) = {
            let mut state = self.inner.write_state();
            let previous = state.method;
            if previous == AuthMethod::Wallet {
                self.clear_wallet_record();
            }
            self.inner.logout_generation.fetch_add(1, Ordering::SeqCst);
            (previous, merge(&mut state, SessionUpdate::signed_out()))
        };

        if changed {
            info!(previous_method = %previous, "signed out");
            self.notify();
        }
    }

    /// Number of logouts so far; lets callers detect a logout that happened
    /// while their own async work was in flight.
    pub fn logout_generation(&self) -> u64 {
        self.inner.logout_generation.load(Ordering::SeqCst)
    }

    /// Restore a persisted wallet session, if a valid one exists.
    ///
    /// Corrupt or partial records are cleared and treated as absent.
    pub fn hydrate_wallet_session(&self) -> Option<WalletIdentity> {
        match self.read_wallet_record() {
            Ok(Some(identity)) => {
                self.set_state(SessionUpdate::wallet(identity.clone()));
                Some(identity)
            }
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "discarding stored wallet session");
                self.clear_wallet_record();
                None
            }
        }
    }

    /// Persisted wallet bearer token, if any
    pub fn wallet_token(&self) -> Option<String> {
        self.inner
            .storage
            .get_item(WALLET_TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
    }

    fn read_wallet_record(&self) -> Result<Option<WalletIdentity>> {
        let storage = &self.inner.storage;
        match (storage.get_item(WALLET_TOKEN_KEY), storage.get_item(WALLET_USER_KEY)) {
            (None, None) => Ok(None),
            (Some(token), Some(user)) => {
                if token.trim().is_empty() {
                    return Err(WalletwatchError::StorageCorrupt("empty wallet token".into()));
                }
                let user: PersistedWalletUser = serde_json::from_str(&user)
                    .map_err(|e| WalletwatchError::StorageCorrupt(e.to_string()))?;
                Ok(Some(WalletIdentity::new(user.wallet_address)))
            }
            _ => Err(WalletwatchError::StorageCorrupt(
                "partial wallet session record".into(),
            )),
        }
    }

    fn persist_wallet_record(&self, identity: &WalletIdentity, token: &str) -> Result<()> {
        let user = serde_json::to_string(&PersistedWalletUser {
            wallet_address: identity.wallet_address.clone(),
            auth_method: PersistedMethodTag::Web3,
        })?;

        let storage = &self.inner.storage;
        let written = storage
            .set_item(WALLET_TOKEN_KEY, token)
            .and_then(|()| storage.set_item(WALLET_USER_KEY, &user));

        if let Err(err) = written {
            // never leave half a record behind
            self.clear_wallet_record();
            return Err(err.into());
        }
        Ok(())
    }

    fn clear_wallet_record(&self) {
        for key in [WALLET_TOKEN_KEY, WALLET_USER_KEY] {
            if let Err(err) = self.inner.storage.remove_item(key) {
                warn!(key, error = %err, "failed to clear stored wallet session");
            }
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.get_state())
            .field("listeners", &self.listener_count())
            .field("storage", &self.inner.storage)
            .finish()
    }
}

/// Apply `update` in place; false when no touched key would change.
fn merge(state: &mut SessionState, update: SessionUpdate) -> bool {
    if !update.changes(state) {
        debug!("no session change detected, skipping update");
        return false;
    }
    update.apply(state);
    true
}

pub(crate) fn token_prefix(token: &str) -> String {
    token.chars().take(8).collect::<String>() + "..."
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::session::MemoryStorage;
    use crate::types::{Identity, ProviderIdentity};

    const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn wallet() -> WalletIdentity {
        WalletIdentity::new(WalletAddress::parse(ADDRESS).unwrap())
    }

    fn recording_listener(store: &SessionStore) -> (Subscription, Arc<Mutex<Vec<SessionState>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = store.subscribe(move |state| sink.lock().unwrap().push(state.clone()));
        (subscription, seen)
    }

    #[test]
    fn test_subscribe_receives_current_state_immediately() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let (_subscription, seen) = recording_listener(&store);

        assert_eq!(*seen.lock().unwrap(), vec![SessionState::initial()]);
    }

    #[test]
    fn test_notifications_match_state_after_each_call() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let (_subscription, seen) = recording_listener(&store);

        let mut expected = vec![store.get_state()];
        let updates = [
            SessionUpdate::new().loading(false),
            SessionUpdate::provider(Some(ProviderIdentity::new("uid-1"))),
            SessionUpdate::provider(Some(ProviderIdentity::new("uid-1"))),
            SessionUpdate::provider(Some(ProviderIdentity::new("uid-2"))),
            SessionUpdate::signed_out(),
        ];
        for update in updates {
            let changes = update.changes(&store.get_state());
            store.set_state(update);
            if changes {
                expected.push(store.get_state());
            }
        }

        assert_eq!(*seen.lock().unwrap(), expected);
        assert_eq!(expected.len(), 5);
    }

    #[test]
    fn test_logout_twice_notifies_once() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let (_subscription, seen) = recording_listener(&store);

        store.logout();
        store.logout();

        assert_eq!(seen.lock().unwrap().len(), 2);
        assert_eq!(store.logout_generation(), 2);
    }

    #[test]
    fn test_wallet_auth_round_trip_through_reload() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(Arc::new(storage.clone()));
        store.set_wallet_auth(wallet(), "tok123").unwrap();

        let reloaded = SessionStore::new(Arc::new(storage));
        assert!(reloaded.get_state().loading);
        let restored = reloaded.hydrate_wallet_session();

        assert_eq!(restored, Some(wallet()));
        let state = reloaded.get_state();
        assert_eq!(state.identity, Some(Identity::Wallet(wallet())));
        assert_eq!(state.method, AuthMethod::Wallet);
        assert!(!state.loading);
        assert_eq!(reloaded.wallet_token(), Some("tok123".to_string()));
    }

    #[test]
    fn test_persisted_user_format() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(Arc::new(storage.clone()));
        store.set_wallet_auth(wallet(), "tok").unwrap();

        let raw = storage.get_item(WALLET_USER_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "walletAddress": ADDRESS, "authMethod": "web3" })
        );
    }

    #[test]
    fn test_corrupt_record_is_cleared() {
        let storage = MemoryStorage::new();
        storage.set_item(WALLET_TOKEN_KEY, "tok").unwrap();
        storage.set_item(WALLET_USER_KEY, "{not json").unwrap();

        let store = SessionStore::new(Arc::new(storage.clone()));
        assert_eq!(store.hydrate_wallet_session(), None);
        assert!(storage.is_empty());
        assert_eq!(store.get_state(), SessionState::initial());
    }

    #[test]
    fn test_partial_record_is_cleared() {
        let storage = MemoryStorage::new();
        storage.set_item(WALLET_TOKEN_KEY, "tok").unwrap();

        let store = SessionStore::new(Arc::new(storage.clone()));
        assert_eq!(store.hydrate_wallet_session(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_record_with_wrong_method_tag_is_cleared() {
        let storage = MemoryStorage::new();
        storage.set_item(WALLET_TOKEN_KEY, "tok").unwrap();
        storage
            .set_item(
                WALLET_USER_KEY,
                &serde_json::json!({ "walletAddress": ADDRESS, "authMethod": "firebase" })
                    .to_string(),
            )
            .unwrap();

        let store = SessionStore::new(Arc::new(storage.clone()));
        assert_eq!(store.hydrate_wallet_session(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_logout_clears_wallet_record_only_for_wallet_sessions() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(Arc::new(storage.clone()));

        // provider session: a stray record is left alone
        storage.set_item("unrelated", "keep").unwrap();
        store.set_state(SessionUpdate::provider(Some(ProviderIdentity::new("uid"))));
        store.logout();
        assert_eq!(storage.len(), 1);

        store.set_wallet_auth(wallet(), "tok").unwrap();
        store.logout();
        assert_eq!(storage.get_item(WALLET_TOKEN_KEY), None);
        assert_eq!(storage.get_item(WALLET_USER_KEY), None);
        assert_eq!(store.get_state().method, AuthMethod::None);
    }

    #[test]
    fn test_unsubscribe_inside_listener() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let calls = Arc::new(Mutex::new(0usize));

        let slot_in_listener = Arc::clone(&slot);
        let calls_in_listener = Arc::clone(&calls);
        let subscription = store.subscribe(move |_| {
            *calls_in_listener.lock().unwrap() += 1;
            if let Some(subscription) = slot_in_listener.lock().unwrap().as_ref() {
                subscription.unsubscribe();
                subscription.unsubscribe();
            }
        });
        *slot.lock().unwrap() = Some(subscription);

        store.set_state(SessionUpdate::signed_out());
        store.set_state(SessionUpdate::provider(Some(ProviderIdentity::new("uid"))));

        // initial call + first change only
        assert_eq!(*calls.lock().unwrap(), 2);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_set_state_if_respects_guard() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        store.set_wallet_auth(wallet(), "tok").unwrap();

        let changed = store.set_state_if(
            |state| state.method != AuthMethod::Wallet,
            SessionUpdate::provider(Some(ProviderIdentity::new("uid"))),
        );

        assert!(!changed);
        assert_eq!(store.get_state().method, AuthMethod::Wallet);
    }

    #[test]
    fn test_nested_update_reaches_later_listeners_last() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));

        let nested = store.clone();
        let _sign_out_on_provider = store.subscribe(move |state| {
            if state.method == AuthMethod::Provider {
                nested.set_state(SessionUpdate::signed_out());
            }
        });
        let (_subscription, seen) = recording_listener(&store);

        store.set_state(SessionUpdate::provider(Some(ProviderIdentity::new("uid-1"))));

        let final_state = store.get_state();
        assert_eq!(final_state.method, AuthMethod::None);
        assert_eq!(seen.lock().unwrap().last(), Some(&final_state));
    }

    #[test]
    fn test_concurrent_login_and_logout_keep_record_in_sync() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(Arc::new(storage.clone()));

        for _ in 0..200 {
            std::thread::scope(|scope| {
                scope.spawn(|| store.set_wallet_auth(wallet(), "tok").unwrap());
                scope.spawn(|| store.logout());
            });

            let wallet_active = store.get_state().method == AuthMethod::Wallet;
            assert_eq!(wallet_active, store.wallet_token().is_some());
            assert_eq!(wallet_active, storage.get_item(WALLET_USER_KEY).is_some());
        }
    }

    #[test]
    fn test_token_prefix_does_not_leak_token() {
        assert_eq!(token_prefix("abcdefghijklmnop"), "abcdefgh...");
        assert_eq!(token_prefix("abc"), "abc...");
    }
}
