//! CLI execution context

use anyhow::{Context as _, Result};
use label_review_lab::{LabConfig, ReviewSession};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::output::{OutputFormat, OutputWriter};

/// Execution context for CLI commands
pub struct Context {
    /// Effective configuration after CLI overrides
    pub config: LabConfig,

    /// Snapshot file holding the working dataset
    pub state_path: PathBuf,

    /// Output format
    pub output_format: OutputFormat,

    /// Output writer
    pub output: OutputWriter,
}

impl Context {
    /// Create a new context from CLI arguments
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = LabConfig::load_from(cli.config.as_deref())?;
        if let Some(user) = &cli.user {
            config.user = user.clone();
        }

        Ok(Self {
            config,
            state_path: cli.state.clone(),
            output_format: cli.output,
            output: OutputWriter::new(cli.output, cli.no_color),
        })
    }

    /// Open the working dataset, or start an empty one if none exists yet
    pub fn load_session(&self) -> Result<ReviewSession> {
        if !self.state_path.exists() {
            tracing::debug!(path = %self.state_path.display(), "No working dataset yet");
            return ReviewSession::from_config(&self.config);
        }

        ReviewSession::open(&self.state_path)
            .with_context(|| format!("Failed to open dataset {}", self.state_path.display()))?
            .configure(&self.config)
    }

    /// Like [`Context::load_session`], but an absent dataset is an error
    pub fn require_session(&self) -> Result<ReviewSession> {
        if !self.state_path.exists() {
            anyhow::bail!(
                "No dataset at {}. Run 'label-review import <file>' first.",
                self.state_path.display()
            );
        }
        self.load_session()
    }

    /// Persist the working dataset; the previous file is replaced only once
    /// the new snapshot is fully written
    pub fn save_session(&self, session: &ReviewSession) -> Result<()> {
        session
            .export_to_path(&self.state_path)
            .with_context(|| format!("Failed to save dataset {}", self.state_path.display()))
    }
}
