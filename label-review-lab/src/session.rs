//! One annotator's working session over a single dataset.

use label_review_core::{DatasetMetadata, FieldUpdate, Item, ItemStore, Result};
use label_review_metrics::{AnalysisReport, BiasAlert, Metrics, MetricsEngine, ModelScores};
use label_review_storage::{
    read_snapshot, write_snapshot, BackupManager, BackupRecord, TabularImporter,
};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::config::LabConfig;

/// Owns the item store and keeps the dataset metrics current.
///
/// Every mutating call recomputes the metrics before it returns, so readers
/// never observe metrics that lag the items.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    store: ItemStore,
    engine: MetricsEngine,
    metrics: Metrics,
    scores: ModelScores,
    importer: TabularImporter,
    backups: BackupManager,
}

impl ReviewSession {
    pub fn new(store: ItemStore) -> Self {
        let mut session = Self {
            store,
            engine: MetricsEngine::new(),
            metrics: Metrics::default(),
            scores: ModelScores::default(),
            importer: TabularImporter::new(),
            backups: BackupManager::default(),
        };
        session.refresh();
        session
    }

    /// Empty session named and configured from `config`.
    pub fn from_config(config: &LabConfig) -> anyhow::Result<Self> {
        Self::new(ItemStore::try_new(config.dataset_name.clone())?).configure(config)
    }

    /// Apply user, alert thresholds, importer settings and backup directory.
    pub fn configure(mut self, config: &LabConfig) -> anyhow::Result<Self> {
        self.store.set_current_user(config.user.clone());
        self.engine = MetricsEngine::new().with_thresholds(config.alerts);
        self.importer = config.import.importer()?;
        self.backups = BackupManager::new(config.backup_dir.clone());
        Ok(self)
    }

    /// Load a session from a snapshot file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let store = read_snapshot(BufReader::new(file))?.into_store()?;
        tracing::info!(path = %path.display(), items = store.len(), "Opened dataset");
        Ok(Self::new(store))
    }

    pub fn with_importer(mut self, importer: TabularImporter) -> Self {
        self.importer = importer;
        self
    }

    pub fn with_backups(mut self, backups: BackupManager) -> Self {
        self.backups = backups;
        self
    }

    pub fn set_current_user(&mut self, user: impl Into<String>) {
        self.store.set_current_user(user);
    }

    pub fn current_user(&self) -> &str {
        self.store.current_user()
    }

    // ===== Read accessors =====

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        self.store.metadata()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn model_scores(&self) -> ModelScores {
        self.scores
    }

    pub fn alerts(&self) -> Vec<BiasAlert> {
        self.engine.alerts(&self.metrics)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> + Clone {
        self.store.iter()
    }

    pub fn item(&self, index: usize) -> Result<&Item> {
        self.store.get(index)
    }

    pub fn report(&self) -> AnalysisReport {
        AnalysisReport::new(self.store.metadata(), &self.metrics, self.alerts())
    }

    // ===== Mutations =====

    /// Parse delimited text and append it. Nothing is appended if any row is malformed.
    pub fn import<R: Read>(&mut self, reader: R) -> Result<Range<usize>> {
        let records = self.importer.read(reader)?;
        let range = self.store.import(records);
        self.refresh();
        Ok(range)
    }

    pub fn import_path(&mut self, path: &Path) -> Result<Range<usize>> {
        let records = self.importer.read_path(path)?;
        let range = self.store.import(records);
        self.refresh();
        tracing::info!(path = %path.display(), imported = range.len(), "Imported file");
        Ok(range)
    }

    pub fn update_item(&mut self, index: usize, updates: &[FieldUpdate]) -> Result<&Item> {
        self.store.update_item(index, updates)?;
        self.refresh();
        self.store.get(index)
    }

    pub fn update_fields(&mut self, index: usize, fields: &[(&str, &str)]) -> Result<&Item> {
        self.store.update_fields(index, fields)?;
        self.refresh();
        self.store.get(index)
    }

    pub fn quick_label(&mut self, index: usize, label: impl Into<String>) -> Result<&Item> {
        self.store.quick_label(index, label)?;
        self.refresh();
        self.store.get(index)
    }

    pub fn flag_for_review(&mut self, index: usize, status: impl Into<String>) -> Result<&Item> {
        self.store.flag_for_review(index, status)?;
        self.refresh();
        self.store.get(index)
    }

    pub fn record_model_scores(&mut self, scores: ModelScores) {
        self.scores = scores;
        self.refresh();
    }

    /// Recompute metrics from the current items.
    pub fn refresh(&mut self) -> &Metrics {
        self.metrics = self
            .engine
            .compute(self.store.as_slice(), self.store.metadata(), self.scores);
        &self.metrics
    }

    /// Replace the whole dataset with a snapshot. The acting user carries over.
    pub fn restore_snapshot<R: Read>(&mut self, reader: R) -> Result<()> {
        let user = self.store.current_user().to_string();
        let store = read_snapshot(reader)?.into_store()?.with_user(user);
        tracing::info!(dataset = %store.name(), items = store.len(), "Restored snapshot");
        self.store = store;
        self.refresh();
        Ok(())
    }

    // ===== Export =====

    pub fn export_snapshot<W: Write>(&self, writer: W) -> Result<()> {
        write_snapshot(writer, self.store.metadata(), self.store.as_slice())
    }

    /// Write the snapshot next to `path` and rename it into place, so an
    /// interrupted write leaves any previous file untouched.
    pub fn export_to_path(&self, path: &Path) -> Result<()> {
        let staging = staging_path(path);
        if let Err(err) = self.write_staged(&staging) {
            let _ = fs::remove_file(&staging);
            return Err(err);
        }
        fs::rename(&staging, path)?;
        tracing::info!(path = %path.display(), items = self.store.len(), "Exported dataset");
        Ok(())
    }

    fn write_staged(&self, staging: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(staging)?);
        self.export_snapshot(&mut writer)?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        Ok(())
    }

    pub fn create_backup(&self) -> Result<BackupRecord> {
        self.backups.create(self.store.metadata(), self.store.as_slice())
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Write the analysis report; `.json` paths get JSON, anything else plain text.
    pub fn export_report(&self, path: &Path) -> Result<AnalysisReport> {
        let report = self.report();
        let mut writer = BufWriter::new(File::create(path)?);

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::to_writer_pretty(&mut writer, &report)?;
            writer.write_all(b"\n")?;
        } else {
            writer.write_all(report.to_text().as_bytes())?;
        }
        writer.flush()?;

        tracing::info!(path = %path.display(), alerts = report.alerts.len(), "Exported analysis report");
        Ok(report)
    }
}

/// Hidden sibling of `path` used while a snapshot is being written.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset.json".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new(ItemStore::default())
    }
}
