/*
[INPUT]:  Mounted session context
[OUTPUT]: Sign-in, sign-out and session status output
[POS]:    CLI command layer - session lifecycle commands
[UPDATE]: When login methods or session display change
*/

use anyhow::{bail, Context, Result};
use chrono::Local;
use console::style;
use walletwatch_client::session::WALLET_TOKEN_KEY;
use walletwatch_client::{AuthMethod, FileStorage, Identity};

use walletwatch_cli::AppContext;

pub async fn run_login_wallet(ctx: &AppContext) -> Result<()> {
    let flow = ctx.wallet_flow()?;
    println!("{}", style("Signing in with wallet...").dim());

    match ctx.facade.connect_wallet(&flow).await.context("wallet login")? {
        Some(identity) => {
            println!(
                "{} {}",
                style("Signed in with wallet").bold().green(),
                style(&identity.wallet_address).cyan()
            );
        }
        None => {
            println!("{}", style("Signed out while signing in; nothing was saved.").yellow());
        }
    }
    Ok(())
}

pub async fn run_login_provider(ctx: &AppContext) -> Result<()> {
    if ctx.config.provider.is_none() {
        bail!("no provider account configured; add a `provider` block to the config file");
    }

    let user = ctx
        .facade
        .login_with_provider()
        .await
        .context("provider login")?;
    ctx.remember_provider_session()?;

    if ctx.facade.method() == AuthMethod::Wallet {
        println!(
            "{}",
            style("A wallet session is active and takes precedence; log out to use the provider account.")
                .yellow()
        );
        return Ok(());
    }

    let label = Identity::Provider(user).label();
    println!(
        "{} {}",
        style("Signed in as").bold().green(),
        style(label).cyan()
    );
    Ok(())
}

pub async fn run_logout(ctx: &AppContext) -> Result<()> {
    let method = ctx.facade.method();
    ctx.facade.logout().await;
    if method == AuthMethod::Provider {
        ctx.forget_provider_session()?;
    }

    match method {
        AuthMethod::None => println!("{}", style("Not signed in.").dim()),
        _ => println!("{} ({method})", style("Signed out").bold()),
    }
    Ok(())
}

pub fn run_whoami(ctx: &AppContext) -> Result<()> {
    let state = ctx.facade.state();
    let Some(identity) = state.identity else {
        println!("{}", style("Not signed in.").dim());
        return Ok(());
    };

    match &identity {
        Identity::Wallet(wallet) => {
            println!("{} {}", style("Wallet:").bold(), style(&wallet.wallet_address).cyan());
            let storage = FileStorage::new(ctx.session_dir());
            if let Some(saved_at) = storage.saved_at(WALLET_TOKEN_KEY) {
                println!(
                    "{} {}",
                    style("Since:").bold(),
                    saved_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
        Identity::Provider(user) => {
            println!("{} {}", style("Account:").bold(), style(identity.label()).cyan());
            println!("{} {}", style("UID:").bold(), user.uid);
        }
    }
    println!("{} {}", style("Method:").bold(), state.method);
    Ok(())
}
