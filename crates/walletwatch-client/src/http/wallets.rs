/*
[INPUT]:  Wallet addresses and aliases
[OUTPUT]: Monitored address list and mutation results
[POS]:    HTTP layer - monitored-wallet endpoints (require a session)
[UPDATE]: When monitored-address endpoints or payloads change
*/

// ### Monitored Wallet Endpoints

use reqwest::Method;

use crate::http::{MonitorApi, Result};
use crate::types::{
    AddWalletRequest, AddWalletResponse, MonitoredAddressesResponse, UpdateAliasRequest,
    UpdateAliasResponse,
};

impl MonitorApi {
    /// Addresses monitored for the signed-in user
    ///
    /// GET /my-addresses
    pub async fn monitored_addresses(&self) -> Result<MonitoredAddressesResponse> {
        let builder = self.authed(Method::GET, "/my-addresses").await?;
        self.send_json(builder).await
    }

    /// Start monitoring `address`
    ///
    /// POST /add-wallet
    pub async fn add_wallet(&self, address: &str, alias: &str) -> Result<AddWalletResponse> {
        let body = AddWalletRequest {
            address: address.trim().to_string(),
            alias: alias.trim().to_string(),
        };
        let builder = self.authed(Method::POST, "/add-wallet").await?.json(&body);
        self.send_json(builder).await
    }

    /// PUT /monitored-addresses/{address}/alias
    pub async fn update_alias(&self, address: &str, alias: &str) -> Result<UpdateAliasResponse> {
        let body = UpdateAliasRequest {
            alias: alias.trim().to_string(),
        };
        let endpoint = format!("/monitored-addresses/{}/alias", address.trim());
        let builder = self.authed(Method::PUT, &endpoint).await?.json(&body);
        self.send_json(builder).await
    }

    /// Stop monitoring `address`
    ///
    /// DELETE /monitored-addresses/{address}
    pub async fn remove_wallet(&self, address: &str) -> Result<()> {
        let endpoint = format!("/monitored-addresses/{}", address.trim());
        let builder = self.authed(Method::DELETE, &endpoint).await?;
        self.send_empty(builder).await
    }
}
