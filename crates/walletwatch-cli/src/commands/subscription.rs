/*
[INPUT]:  Mounted session context
[OUTPUT]: Notification subscription summary and account balance
[POS]:    CLI command layer - read-only account views
[UPDATE]: When subscription or balance endpoints change
*/

use anyhow::{Context, Result};
use console::style;

use walletwatch_cli::AppContext;

fn on_off(enabled: bool) -> console::StyledObject<&'static str> {
    if enabled {
        style("on").green()
    } else {
        style("off").dim()
    }
}

pub async fn run_subscription(ctx: &AppContext) -> Result<()> {
    let api = ctx.api()?;
    let info = api
        .subscription_info()
        .await
        .context("fetch subscription info")?;

    println!("{}", style("--- Notifications ---").bold());
    println!("Email:    {}", on_off(info.user.email_enabled));
    println!("SMS:      {}", on_off(info.user.sms_enabled));
    println!("Telegram: {}", on_off(info.user.telegram_enabled));

    println!("\n{}", style("--- Channels ---").bold());
    for email in &info.emails {
        let primary = if email.is_primary { " (primary)" } else { "" };
        println!("email     {}{}", email.email, style(primary).cyan());
    }
    for phone in &info.phones {
        let primary = if phone.is_primary { " (primary)" } else { "" };
        println!("phone     {}{}", phone.phone_number, style(primary).cyan());
    }
    for chat in &info.telegram_subscriptions {
        let primary = if chat.is_primary { " (primary)" } else { "" };
        println!("telegram  {}{}", chat.telegram_chat_id, style(primary).cyan());
    }
    Ok(())
}

pub async fn run_balance(ctx: &AppContext) -> Result<()> {
    let api = ctx.api()?;
    let balance = api.test_balance().await.context("fetch balance")?;
    println!("{} {}", style("Balance:").bold(), balance.amount);
    Ok(())
}
