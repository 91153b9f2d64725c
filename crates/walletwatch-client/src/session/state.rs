/*
[INPUT]:  Identity and auth method changes
[OUTPUT]: Session snapshot and partial-update types
[POS]:    Session layer - state shape shared by store, watcher and facade
[UPDATE]: When the session state gains or loses fields
*/

use crate::types::{AuthMethod, Identity, ProviderIdentity, WalletIdentity};

/// Snapshot of who is signed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    /// True until the first resolution after startup
    pub loading: bool,
    pub method: AuthMethod,
}

impl SessionState {
    /// State of a freshly constructed store
    pub fn initial() -> Self {
        Self {
            identity: None,
            loading: true,
            method: AuthMethod::None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn wallet_identity(&self) -> Option<&WalletIdentity> {
        self.identity.as_ref().and_then(Identity::as_wallet)
    }

    pub fn provider_identity(&self) -> Option<&ProviderIdentity> {
        self.identity.as_ref().and_then(Identity::as_provider)
    }

    /// Route-guard decision for protected views
    pub fn access(&self) -> RouteAccess {
        if self.loading {
            RouteAccess::Pending
        } else if self.identity.is_some() {
            RouteAccess::Granted
        } else {
            RouteAccess::Denied
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Session not resolved yet; show a loading view
    Pending,
    Granted,
    /// Redirect to the landing page
    Denied,
}

/// Partial update merged into [`SessionState`]; `None` fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub identity: Option<Option<Identity>>,
    pub loading: Option<bool>,
    pub method: Option<AuthMethod>,
}

impl SessionUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(mut self, identity: Option<Identity>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    pub fn method(mut self, method: AuthMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Resolved, nobody signed in
    pub fn signed_out() -> Self {
        Self::new()
            .identity(None)
            .loading(false)
            .method(AuthMethod::None)
    }

    pub fn wallet(identity: WalletIdentity) -> Self {
        Self::new()
            .identity(Some(Identity::Wallet(identity)))
            .loading(false)
            .method(AuthMethod::Wallet)
    }

    /// Provider callback result; `None` means the provider has no user.
    pub fn provider(user: Option<ProviderIdentity>) -> Self {
        match user {
            Some(user) => Self::new()
                .identity(Some(Identity::Provider(user)))
                .loading(false)
                .method(AuthMethod::Provider),
            None => Self::signed_out(),
        }
    }

    /// Whether merging would change any touched key
    pub fn changes(&self, state: &SessionState) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| *identity != state.identity)
            || self.loading.is_some_and(|loading| loading != state.loading)
            || self.method.is_some_and(|method| method != state.method)
    }

    pub fn apply(self, state: &mut SessionState) {
        if let Some(identity) = self.identity {
            state.identity = identity;
        }
        if let Some(loading) = self.loading {
            state.loading = loading;
        }
        if let Some(method) = self.method {
            state.method = method;
        }
    }
}
