use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::config::ConfigCommands;
use crate::output::OutputFormat;

pub const DEFAULT_STATE_FILE: &str = "dataset.json";

/// Review, label and measure annotated text datasets
#[derive(Debug, Parser)]
#[command(name = "label-review", version, about, propagate_version = true)]
pub struct Cli {
    /// Additional configuration file, layered over config/default and the environment
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Annotator recorded in change history
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Working dataset snapshot, created on first import
    #[arg(short, long, global = true, default_value = DEFAULT_STATE_FILE)]
    pub state: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import items from a delimited text file with a header row
    Import(ImportArgs),

    /// List items
    List(ListArgs),

    /// Show one item with its change history
    Show {
        /// Item position as shown by `list`
        index: usize,
    },

    /// Edit label, category or tags
    Update {
        /// Item position as shown by `list`
        index: usize,

        /// Field assignment, e.g. --set label=positive --set tags=a,b
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true, value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Assign a label and mark the item as verified
    Label {
        /// Item position as shown by `list`
        index: usize,

        /// Label to assign
        label: String,
    },

    /// Set an item's review status
    Flag {
        /// Item position as shown by `list`
        index: usize,

        /// Review status
        #[arg(default_value = "needs_review")]
        status: String,
    },

    /// Show dataset quality metrics
    Metrics(MetricsArgs),

    /// Print the analysis report, or write it to a file
    Report {
        /// Output file; `.json` writes JSON, anything else plain text
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Write the dataset as a JSON snapshot
    Export {
        /// Destination file
        path: PathBuf,
    },

    /// Create a timestamped backup
    Backup {
        /// List existing backups instead of creating one
        #[arg(short, long)]
        list: bool,
    },

    /// Inspect configuration
    Config(ConfigCommands),
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Delimited text file
    pub path: PathBuf,

    /// Field delimiter, overriding configuration
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Tag delimiter inside the tags column
    #[arg(long)]
    pub tag_delimiter: Option<char>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only items with this label
    #[arg(short, long)]
    pub label: Option<String>,

    /// Only items not yet verified
    #[arg(long)]
    pub unverified: bool,

    /// Maximum number of items to show
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct MetricsArgs {
    /// Externally measured model accuracy
    #[arg(long)]
    pub accuracy: Option<f64>,

    /// Externally measured model F1 score
    #[arg(long)]
    pub f1: Option<f64>,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected FIELD=VALUE, got {raw:?}"))
}
