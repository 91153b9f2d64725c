/*
[INPUT]:  Address subcommands and mounted session context
[OUTPUT]: Monitored address listings and mutation results
[POS]:    CLI command layer - monitored wallet management
[UPDATE]: When monitored-address endpoints change
*/

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;

use walletwatch_cli::AppContext;

#[derive(Subcommand, Debug)]
pub enum AddressCommand {
    /// List monitored addresses
    List,
    /// Start monitoring an address
    Add {
        address: String,
        #[arg(long, default_value = "")]
        alias: String,
    },
    /// Rename a monitored address
    Alias { address: String, alias: String },
    /// Stop monitoring an address
    Remove { address: String },
}

pub async fn run_addresses(ctx: &AppContext, command: AddressCommand) -> Result<()> {
    let api = ctx.api()?;

    match command {
        AddressCommand::List => {
            let response = api
                .monitored_addresses()
                .await
                .context("fetch monitored addresses")?;
            if response.monitored_addresses.is_empty() {
                println!("{}", style("No monitored addresses.").dim());
            }
            for address in &response.monitored_addresses {
                println!(
                    "{}  {}  {}",
                    style(address.display_name()).bold(),
                    style(&address.crypto_address).cyan(),
                    style(address.last_checked.as_deref().unwrap_or("never checked")).dim()
                );
            }
        }
        AddressCommand::Add { address, alias } => {
            let response = api
                .add_wallet(&address, &alias)
                .await
                .context("add wallet")?;
            let message = response.message.unwrap_or_else(|| "Wallet added".to_string());
            println!("{} {}", style(message).green(), style(address.trim()).cyan());
        }
        AddressCommand::Alias { address, alias } => {
            let response = api
                .update_alias(&address, &alias)
                .await
                .context("update alias")?;
            println!(
                "{} {} -> {}",
                style(response.message).green(),
                style(response.address).cyan(),
                style(response.alias).bold()
            );
        }
        AddressCommand::Remove { address } => {
            api.remove_wallet(&address).await.context("remove wallet")?;
            println!("{} {}", style("Stopped monitoring").green(), style(address.trim()).cyan());
        }
    }
    Ok(())
}
