//! Import, export and backup commands

use anyhow::{Context as _, Result};
use comfy_table::Cell;
use label_review_storage::BackupRecord;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::cli::ImportArgs;
use crate::context::Context;
use crate::output::{format_bytes, format_timestamp, print_field, print_section, TableDisplay};

#[derive(Debug, Serialize)]
struct ImportSummary {
    source: PathBuf,
    imported: usize,
    first_index: usize,
    total_items: usize,
    dataset_version: u64,
}

impl TableDisplay for ImportSummary {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.source.display()),
            Cell::new(self.imported),
            Cell::new(self.total_items),
        ]
    }

    fn display_single(&self) {
        print_section("Import");
        print_field("Source", &self.source.display().to_string());
        print_field("Imported", &self.imported.to_string());
        print_field("Total items", &self.total_items.to_string());
        print_field("Dataset version", &self.dataset_version.to_string());
    }

    fn display_compact(&self) {
        println!("{}\t{}\t{}", self.source.display(), self.imported, self.total_items);
    }
}

impl TableDisplay for BackupRecord {
    fn to_row(&self) -> Vec<Cell> {
        vec![
            Cell::new(self.path.display()),
            Cell::new(format_bytes(self.size)),
            Cell::new(&self.checksum[..12.min(self.checksum.len())]),
        ]
    }

    fn display_single(&self) {
        print_section("Backup");
        print_field("Path", &self.path.display().to_string());
        print_field("Size", &format_bytes(self.size));
        print_field("SHA-256", &self.checksum);
        print_field("Created", &format_timestamp(&self.created_at));
    }

    fn display_compact(&self) {
        println!("{}\t{}\t{}", self.path.display(), self.size, self.checksum);
    }
}

#[derive(Debug, Serialize)]
struct BackupFile {
    path: PathBuf,
    size: u64,
}

impl TableDisplay for BackupFile {
    fn to_row(&self) -> Vec<Cell> {
        vec![Cell::new(self.path.display()), Cell::new(format_bytes(self.size))]
    }

    fn display_single(&self) {
        print_field("Path", &self.path.display().to_string());
        print_field("Size", &format_bytes(self.size));
    }

    fn display_compact(&self) {
        println!("{}", self.path.display());
    }
}

pub fn import(ctx: &Context, args: ImportArgs) -> Result<()> {
    let mut config = ctx.config.clone();
    if let Some(delimiter) = args.delimiter {
        config.import.delimiter = delimiter;
    }
    if let Some(tag_delimiter) = args.tag_delimiter {
        config.import.tag_delimiter = tag_delimiter;
    }

    let mut session = ctx.load_session()?.with_importer(config.import.importer()?);
    let range = session
        .import_path(&args.path)
        .with_context(|| format!("Failed to import {}", args.path.display()))?;
    ctx.save_session(&session)?;

    ctx.output.success(&format!(
        "Imported {} item(s) into {}",
        range.len(),
        ctx.state_path.display()
    ));
    ctx.output.write(&ImportSummary {
        source: args.path,
        imported: range.len(),
        first_index: range.start,
        total_items: session.metadata().total_items,
        dataset_version: session.metadata().version,
    })
}

pub fn export(ctx: &Context, path: &Path) -> Result<()> {
    let session = ctx.require_session()?;
    session
        .export_to_path(path)
        .with_context(|| format!("Failed to export to {}", path.display()))?;

    ctx.output.success(&format!(
        "Exported {} item(s) to {}",
        session.metadata().total_items,
        path.display()
    ));
    Ok(())
}

pub fn backup(ctx: &Context, list: bool) -> Result<()> {
    let session = ctx.require_session()?;

    if list {
        let files = session
            .backups()
            .list()?
            .into_iter()
            .map(|path| {
                let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                BackupFile { path, size }
            })
            .collect::<Vec<_>>();
        return ctx.output.write_list(&files, &["Path", "Size"]);
    }

    let record = session.create_backup().context("Failed to create backup")?;
    ctx.output.success("Backup created");
    ctx.output.write(&record)
}
