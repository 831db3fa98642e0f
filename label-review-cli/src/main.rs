use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;
mod output;

use cli::{Cli, Commands};
use context::Context;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::new(&cli)?;

    let level = if cli.verbose { "debug" } else { ctx.config.log_level.as_str() };
    label_review_lab::telemetry::init_tracing(level, ctx.config.log_format)?;
    tracing::debug!(
        dataset = %ctx.config.dataset_name,
        user = %ctx.config.user,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Import(args) => commands::data::import(&ctx, args),
        Commands::Export { path } => commands::data::export(&ctx, &path),
        Commands::Backup { list } => commands::data::backup(&ctx, list),
        Commands::List(args) => commands::items::list(&ctx, args),
        Commands::Show { index } => commands::items::show(&ctx, index),
        Commands::Update { index, set } => commands::items::update(&ctx, index, &set),
        Commands::Label { index, label } => commands::items::label(&ctx, index, &label),
        Commands::Flag { index, status } => commands::items::flag(&ctx, index, &status),
        Commands::Metrics(args) => commands::metrics::metrics(&ctx, args),
        Commands::Report { out } => commands::metrics::report(&ctx, out.as_deref()),
        Commands::Config(cmd) => commands::config::execute(&ctx, cmd),
    }
}
