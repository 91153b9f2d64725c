/*
[INPUT]:  Monitoring backend resources
[OUTPUT]: Typed models for monitored wallets and notification subscriptions
[POS]:    Data layer - resource models
[UPDATE]: When backend resource schemas change
*/

use rust_decimal::Decimal;
use serde::Deserialize;

/// A wallet address the user asked the service to watch
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MonitoredAddress {
    pub crypto_address: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub last_checked: Option<String>,
}

impl MonitoredAddress {
    /// Alias when set, otherwise the raw address.
    pub fn display_name(&self) -> &str {
        self.alias
            .as_deref()
            .filter(|alias| !alias.is_empty())
            .unwrap_or(&self.crypto_address)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubscriptionUser {
    pub user_id: i64,
    #[serde(rename = "firebase_uid", alias = "provider_uid")]
    pub provider_uid: String,
    pub email_enabled: bool,
    pub sms_enabled: bool,
    pub telegram_enabled: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubscriptionEmail {
    #[serde(default)]
    pub id: Option<i64>,
    pub email: String,
    pub is_primary: bool,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubscriptionPhone {
    #[serde(default)]
    pub id: Option<i64>,
    pub phone_number: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramChat {
    #[serde(default)]
    pub id: Option<i64>,
    pub telegram_chat_id: String,
    pub is_primary: bool,
}

/// Full notification subscription state for the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubscriptionInfo {
    pub user: SubscriptionUser,
    #[serde(default)]
    pub emails: Vec<SubscriptionEmail>,
    #[serde(default)]
    pub phones: Vec<SubscriptionPhone>,
    #[serde(default)]
    pub telegram_subscriptions: Vec<TelegramChat>,
}

impl SubscriptionInfo {
    pub fn primary_email(&self) -> Option<&SubscriptionEmail> {
        self.emails.iter().find(|email| email.is_primary)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BalanceResponse {
    pub amount: Decimal,
}
