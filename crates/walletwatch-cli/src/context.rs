/*
[INPUT]:  CLI configuration
[OUTPUT]: Mounted session facade, wallet flow and resource API for one command
[POS]:    Runtime layer - wires the client library together per invocation
[UPDATE]: When commands need new collaborators or session wiring changes
*/

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::debug;
use walletwatch_client::{
    FileStorage, LocalKeyBridge, MonitorApi, RouteAccess, SessionFacade, SessionStore,
    StaticIdentityProvider, WalletSignatureFlow, WalletwatchClient,
};

use crate::config::CliConfig;

/// Marker kept next to the session record while the provider account is signed in
const PROVIDER_MARKER_FILE: &str = "provider.signed_in";

/// Everything a command needs, mounted over the on-disk session
#[derive(Debug)]
pub struct AppContext {
    pub config: CliConfig,
    pub client: WalletwatchClient,
    pub facade: SessionFacade,
    session_dir: PathBuf,
}

impl AppContext {
    pub fn new(config: CliConfig) -> Result<Self> {
        let client =
            WalletwatchClient::with_config_and_base_url(config.client_config(), &config.api_base_url)
                .context("build HTTP client")?;

        let session_dir = config.resolve_session_dir()?;
        debug!(session_dir = %session_dir.display(), "mounting session");

        let store = SessionStore::new(Arc::new(FileStorage::new(&session_dir)));
        let provider = Self::provider(&config, &session_dir);
        let facade = SessionFacade::mount(store, Arc::new(provider));

        Ok(Self {
            config,
            client,
            facade,
            session_dir,
        })
    }

    /// The configured provider account, signed in when a previous
    /// `login-provider` left its marker behind.
    fn provider(config: &CliConfig, session_dir: &Path) -> StaticIdentityProvider {
        let Some(account) = &config.provider else {
            return StaticIdentityProvider::new();
        };

        let provider = StaticIdentityProvider::new();
        if session_dir.join(PROVIDER_MARKER_FILE).exists() {
            provider.signed_in(account.identity(), account.id_token.clone())
        } else {
            provider.with_account(account.identity(), account.id_token.clone())
        }
    }

    pub fn session_dir(&self) -> &Path {
        &self.session_dir
    }

    /// Wallet flow using the configured local key, or no wallet at all
    pub fn wallet_flow(&self) -> Result<WalletSignatureFlow> {
        match &self.config.wallet_private_key {
            Some(key) => {
                let bridge = LocalKeyBridge::new(key).context("load wallet private key")?;
                Ok(WalletSignatureFlow::new(self.client.clone(), Arc::new(bridge)))
            }
            None => Ok(WalletSignatureFlow::without_bridge(self.client.clone())),
        }
    }

    /// Resource API for commands that require a session
    pub fn api(&self) -> Result<MonitorApi> {
        if self.facade.access() != RouteAccess::Granted {
            bail!("not signed in; run `walletwatch login-wallet` or `walletwatch login-provider` first");
        }
        Ok(MonitorApi::new(self.client.clone(), self.facade.authorizer()))
    }

    pub fn remember_provider_session(&self) -> Result<()> {
        fs::create_dir_all(&self.session_dir)
            .with_context(|| format!("create {}", self.session_dir.display()))?;
        fs::write(self.session_dir.join(PROVIDER_MARKER_FILE), b"")
            .context("record provider session")?;
        Ok(())
    }

    pub fn forget_provider_session(&self) -> Result<()> {
        let marker = self.session_dir.join(PROVIDER_MARKER_FILE);
        if marker.exists() {
            fs::remove_file(&marker).context("clear provider session")?;
        }
        Ok(())
    }
}
