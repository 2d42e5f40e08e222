use anyhow::Result;

use crate::Context;
use crate::cli::ConfigCommand;
use crate::config::config_path;
use crate::ui;

pub fn run(ctx: &Context, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Path => path(ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    ui::header("Configuration");

    let path = source_path(ctx)?;
    let status = if path.exists() { "" } else { " (not found, using defaults)" };
    ui::kv("Config file", &format!("{}{status}", path.display()));
    println!();
    print!("{}", ctx.config.to_toml()?);

    Ok(())
}

fn path(ctx: &Context) -> Result<()> {
    println!("{}", source_path(ctx)?.display());
    Ok(())
}

fn source_path(ctx: &Context) -> Result<std::path::PathBuf> {
    match &ctx.config_path {
        Some(path) => Ok(path.clone()),
        None => config_path(),
    }
}
