/*
[INPUT]:  Provider user records and wallet addresses
[OUTPUT]: Typed identities and the auth method tag
[POS]:    Data layer - who is signed in and how
[UPDATE]: When adding identity attributes or a new auth method
*/

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::http::WalletwatchError;

/// EVM wallet address: `0x` followed by 40 hex digits.
///
/// Case is preserved exactly as the wallet reported it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse and validate an address string.
    pub fn parse(value: &str) -> Result<Self, WalletwatchError> {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"));

        match digits {
            Some(digits) if digits.len() == 40 && digits.chars().all(|c| c.is_ascii_hexdigit()) => {
                Ok(Self(trimmed.to_string()))
            }
            _ => Err(WalletwatchError::InvalidWalletAddress(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for display, e.g. `0xf39F…2266`.
    pub fn short(&self) -> String {
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }

    /// Case-insensitive comparison (checksum casing differs between wallets).
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = WalletwatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}

impl AsRef<str> for WalletAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User issued by the identity provider.
///
/// The bearer token for this user is not stored here; it is fetched on demand
/// through [`crate::auth::IdentityProvider::id_token`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderIdentity {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ProviderIdentity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Identity produced by a verified wallet signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletIdentity {
    pub wallet_address: WalletAddress,
}

impl WalletIdentity {
    pub fn new(wallet_address: WalletAddress) -> Self {
        Self { wallet_address }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Provider(ProviderIdentity),
    Wallet(WalletIdentity),
}

impl Identity {
    pub fn method(&self) -> AuthMethod {
        match self {
            Identity::Provider(_) => AuthMethod::Provider,
            Identity::Wallet(_) => AuthMethod::Wallet,
        }
    }

    pub fn as_wallet(&self) -> Option<&WalletIdentity> {
        match self {
            Identity::Wallet(identity) => Some(identity),
            Identity::Provider(_) => None,
        }
    }

    pub fn as_provider(&self) -> Option<&ProviderIdentity> {
        match self {
            Identity::Provider(identity) => Some(identity),
            Identity::Wallet(_) => None,
        }
    }

    /// Human-readable label: display name, then email, then uid for provider users.
    pub fn label(&self) -> String {
        match self {
            Identity::Provider(user) => user
                .display_name
                .clone()
                .or_else(|| user.email.clone())
                .unwrap_or_else(|| user.uid.clone()),
            Identity::Wallet(wallet) => wallet.wallet_address.short(),
        }
    }
}

impl From<WalletIdentity> for Identity {
    fn from(identity: WalletIdentity) -> Self {
        Identity::Wallet(identity)
    }
}

impl From<ProviderIdentity> for Identity {
    fn from(identity: ProviderIdentity) -> Self {
        Identity::Provider(identity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Provider,
    Wallet,
    #[default]
    None,
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthMethod::Provider => "provider",
            AuthMethod::Wallet => "wallet",
            AuthMethod::None => "none",
        };
        f.write_str(name)
    }
}
