/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public walletwatch client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod session;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{
    BridgeError,
    FlowPhase,
    IdentityProvider,
    LocalKeyBridge,
    MockWalletBridge,
    StaticIdentityProvider,
    WalletBridge,
    WalletLogin,
    WalletSignatureFlow,
};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    MonitorApi,
    RequestAuthorizer,
    Result,
    WalletwatchClient,
    WalletwatchError,
};

// Re-export commonly used types from session
pub use session::{
    FileStorage,
    IdentityProviderWatcher,
    MemoryStorage,
    RouteAccess,
    SessionFacade,
    SessionState,
    SessionStorage,
    SessionStore,
    SessionUpdate,
    StorageError,
    Subscription,
};

// Re-export all types
pub use types::*;
