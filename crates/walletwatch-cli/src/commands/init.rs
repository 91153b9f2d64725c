/*
[INPUT]:  Output path for the configuration file
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When CliConfig schema changes
*/

use std::path::Path;

use anyhow::{bail, Context, Result};
use console::style;

use walletwatch_cli::CliConfig;

pub fn run_init(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            output.display()
        );
    }

    let yaml = CliConfig::template().to_yaml()?;
    std::fs::write(output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("{}", style("SUCCESS!").bold().green());
    println!("Configuration written to: {}", style(output.display()).cyan());
    println!(
        "{}",
        style("Fill in the provider account or add wallet_private_key, then run a login command.")
            .dim()
    );

    Ok(())
}
