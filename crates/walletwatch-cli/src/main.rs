/*
[INPUT]:  CLI arguments, optional YAML configuration file, WALLETWATCH_* environment
[OUTPUT]: Session changes and backend results printed to the terminal
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, or startup flow
*/

mod commands;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::AddressCommand;
use walletwatch_cli::{AppContext, CliConfig};

#[derive(Parser, Debug)]
#[command(name = "walletwatch", version, about = "Wallet monitoring client")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a starter configuration file
    Init {
        #[arg(long, value_name = "PATH", default_value = "walletwatch.yaml")]
        output: PathBuf,
        #[arg(long)]
        force: bool,
    },
    /// Sign in by signing a challenge with the configured wallet key
    LoginWallet,
    /// Sign in with the configured identity-provider account
    LoginProvider,
    /// Show who is signed in
    Whoami,
    /// Sign out of the active session
    Logout,
    /// Manage monitored addresses
    Addresses {
        #[command(subcommand)]
        command: AddressCommand,
    },
    /// Show notification subscription settings
    Subscription,
    /// Query the backend test balance
    Balance,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    if let Command::Init { output, force } = &args.command {
        return commands::run_init(output, *force);
    }

    let config = CliConfig::load(args.config_path.as_deref()).context("load config")?;
    debug!(api_base_url = %config.api_base_url, "configuration loaded");
    let ctx = AppContext::new(config)?;

    match args.command {
        Command::Init { .. } => Ok(()),
        Command::LoginWallet => commands::run_login_wallet(&ctx).await,
        Command::LoginProvider => commands::run_login_provider(&ctx).await,
        Command::Whoami => commands::run_whoami(&ctx),
        Command::Logout => commands::run_logout(&ctx).await,
        Command::Addresses { command } => commands::run_addresses(&ctx, command).await,
        Command::Subscription => commands::run_subscription(&ctx).await,
        Command::Balance => commands::run_balance(&ctx).await,
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}
