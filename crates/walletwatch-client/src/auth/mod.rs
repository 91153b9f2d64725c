/*
[INPUT]:  Wallet bridges, identity providers, backend auth endpoints
[OUTPUT]: Verified wallet logins and provider identities
[POS]:    Auth layer - the two ways a user can sign in
[UPDATE]: When login flows or signer implementations change
*/

pub mod bridge;
pub mod evm_bridge;
pub mod flow;
pub mod provider;

pub use bridge::{BridgeError, MockWalletBridge, WalletBridge};
pub use evm_bridge::LocalKeyBridge;
pub use flow::{FlowPhase, WalletLogin, WalletSignatureFlow};
pub use provider::{IdentityProvider, ProviderCallback, StaticIdentityProvider};
