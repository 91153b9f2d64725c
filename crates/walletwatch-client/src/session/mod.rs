/*
[INPUT]:  Wallet logins, provider change notifications, logout requests
[OUTPUT]: Current session state, change notifications, persisted wallet record
[POS]:    Session layer - decides which identity is active and broadcasts it
[UPDATE]: When session transitions, persistence or consumer contract change
*/

pub mod facade;
pub mod state;
pub mod storage;
pub mod store;
pub mod subscription;
pub mod watcher;

pub use facade::SessionFacade;
pub use state::{RouteAccess, SessionState, SessionUpdate};
pub use storage::{
    FileStorage, MemoryStorage, SessionStorage, StorageError, WALLET_TOKEN_KEY, WALLET_USER_KEY,
};
pub use store::{Listener, SessionStore};
pub use subscription::Subscription;
pub use watcher::IdentityProviderWatcher;
