/*
[INPUT]:  Optional YAML configuration file, WALLETWATCH_* environment variables
[OUTPUT]: Parsed CLI configuration
[POS]:    Configuration layer - backend location, session directory, credentials
[UPDATE]: When adding new configuration options
*/

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use walletwatch_client::http::DEFAULT_API_BASE_URL;
use walletwatch_client::{ClientConfig, ProviderIdentity};

/// Top-level configuration for the walletwatch CLI
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CliConfig {
    /// Monitoring backend base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Where the session record lives; defaults to the platform data dir
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_dir: Option<PathBuf>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pre-issued identity-provider account
    #[serde(default)]
    pub provider: Option<ProviderAccountConfig>,
    /// Hex secp256k1 key used by `login-wallet`
    #[serde(default)]
    pub wallet_private_key: Option<String>,
}

/// Identity-provider account available to `login-provider`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderAccountConfig {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Bearer token the provider hands out for this account
    pub id_token: String,
}

impl ProviderAccountConfig {
    pub fn identity(&self) -> ProviderIdentity {
        let mut identity = ProviderIdentity::new(&self.uid);
        if let Some(email) = &self.email {
            identity = identity.with_email(email);
        }
        if let Some(name) = &self.display_name {
            identity = identity.with_display_name(name);
        }
        identity
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            session_dir: None,
            timeout_secs: default_timeout_secs(),
            provider: None,
            wallet_private_key: None,
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl CliConfig {
    /// Load configuration from an optional YAML file, then apply
    /// `WALLETWATCH_*` overrides (`WALLETWATCH_PROVIDER__UID` for nested keys).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
        }

        builder
            .add_source(
                Environment::with_prefix("WALLETWATCH")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("read configuration")?
            .try_deserialize()
            .context("parse configuration")
    }

    /// Starter configuration written by `walletwatch init`
    pub fn template() -> Self {
        Self {
            provider: Some(ProviderAccountConfig {
                uid: "replace-with-provider-uid".to_string(),
                email: Some("you@example.com".to_string()),
                display_name: None,
                id_token: "replace-with-id-token".to_string(),
            }),
            ..Self::default()
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to serialize config to YAML")
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..ClientConfig::default()
        }
    }

    pub fn resolve_session_dir(&self) -> Result<PathBuf> {
        match &self.session_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(dirs::data_dir()
                .ok_or_else(|| anyhow!("Could not determine data directory"))?
                .join("walletwatch")),
        }
    }
}
