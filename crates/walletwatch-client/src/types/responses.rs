/*
[INPUT]:  JSON response bodies from the monitoring backend
[OUTPUT]: Typed response structs
[POS]:    Data layer - response payloads
[UPDATE]: When response schemas change
*/

use serde::Deserialize;

use super::{MonitoredAddress, SubscriptionEmail, SubscriptionInfo, SubscriptionPhone, TelegramChat};

/// Challenge returned by `POST /auth/web3/nonce`.
///
/// `message` must be signed verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NonceResponse {
    pub nonce: String,
    pub message: String,
}

/// Result of `POST /auth/web3/verify`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VerifyResponse {
    pub token: String,
}

/// Error body shape used by the backend (`{"detail": "..."}`)
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonitoredAddressesResponse {
    #[serde(default)]
    pub monitored_addresses: Vec<MonitoredAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddWalletResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateAliasResponse {
    pub message: String,
    pub address: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct SubscriptionInfoEnvelope {
    pub subscription_info: SubscriptionInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct EmailsEnvelope {
    #[serde(default)]
    pub emails: Vec<SubscriptionEmail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct PhonesEnvelope {
    #[serde(default)]
    pub phones: Vec<SubscriptionPhone>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct TelegramChatsEnvelope {
    #[serde(default)]
    pub telegram_chats: Vec<TelegramChat>,
}

/// Generic acknowledgement for subscription mutations
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubscriptionResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramConnectInstructions {
    pub step1: String,
    pub step2: String,
    pub step3: String,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramConnectLinkResponse {
    pub message: String,
    pub deep_link: String,
    pub token: String,
    pub expires_in_minutes: u32,
    pub instructions: TelegramConnectInstructions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramConnectionStatusResponse {
    pub message: String,
    pub telegram_enabled: bool,
    pub connected_chats: u32,
    #[serde(default)]
    pub telegram_subscriptions: Vec<TelegramChat>,
    pub active_connection_tokens: u32,
    pub has_connections: bool,
}
