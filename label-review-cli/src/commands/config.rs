//! Configuration commands

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use crate::context::Context;
use crate::output::{print_field, print_section, OutputFormat};

/// Configuration inspection commands
#[derive(Debug, Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the effective configuration
    Show,

    /// Get a single configuration value
    Get {
        /// Configuration key (e.g., alerts.imbalance_threshold)
        key: String,
    },

    /// Show where configuration is read from
    Path,
}

/// Execute configuration commands
pub fn execute(ctx: &Context, cmd: ConfigCommands) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(ctx),
        ConfigSubcommand::Get { key } => get(ctx, &key),
        ConfigSubcommand::Path => path(ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ctx.config)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(&ctx.config)?),
        OutputFormat::Table | OutputFormat::Compact => {
            let content =
                toml::to_string_pretty(&ctx.config).context("Failed to serialize config")?;
            print!("{}", content);
        }
    }
    Ok(())
}

fn get(ctx: &Context, key: &str) -> Result<()> {
    let value = serde_json::to_value(&ctx.config)?;
    let found = key
        .split('.')
        .try_fold(&value, |node, part| node.get(part))
        .with_context(|| format!("Unknown configuration key: {}", key))?;

    match found {
        serde_json::Value::String(s) => println!("{}", s),
        other => println!("{}", other),
    }
    Ok(())
}

fn path(ctx: &Context) -> Result<()> {
    print_section("Configuration sources");
    print_field("Defaults", "config/default.{toml,yaml,json}");
    print_field("Local overrides", "config/local.{toml,yaml,json}");
    print_field(
        "Environment",
        &format!("{}__<KEY> (nested keys joined with __)", label_review_lab::config::ENV_PREFIX),
    );
    print_field("Working dataset", &ctx.state_path.display().to_string());
    println!(
        "\n{}",
        "Pass --config <file> to layer an extra file on top.".dimmed()
    );
    Ok(())
}
