/*
[INPUT]:  Client-side parameters for backend calls
[OUTPUT]: Serializable request bodies
[POS]:    Data layer - request payloads
[UPDATE]: When request schemas change
*/

use serde::Serialize;

use super::WalletAddress;

/// Body of `POST /auth/web3/nonce`
#[derive(Debug, Clone, Serialize)]
pub struct NonceRequest<'a> {
    pub wallet_address: &'a WalletAddress,
}

/// Body of `POST /auth/web3/verify`
#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest<'a> {
    pub wallet_address: &'a WalletAddress,
    pub signature: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddWalletRequest {
    pub address: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateAliasRequest {
    pub alias: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubscriptionSettingsRequest {
    pub email_enabled: bool,
    pub sms_enabled: bool,
    pub telegram_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddEmailRequest {
    pub email: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveEmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddPhoneRequest {
    pub phone_number: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovePhoneRequest {
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddTelegramRequest {
    pub telegram_chat_id: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoveTelegramRequest {
    pub telegram_chat_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TelegramEnabledRequest {
    pub telegram_enabled: bool,
}
