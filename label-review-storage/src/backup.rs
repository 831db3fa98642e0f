//! Timestamped JSON backups with SHA-256 checksums.

use chrono::{DateTime, Utc};
use label_review_core::{DatasetMetadata, Item, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::snapshot::snapshot_bytes;

pub const DEFAULT_BACKUP_DIR: &str = "backups/";
pub const BACKUP_PREFIX: &str = "backup_";
pub const BACKUP_EXTENSION: &str = "json";

/// A backup file written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupRecord {
    pub path: PathBuf,
    /// Size of the file in bytes
    pub size: u64,
    /// SHA-256 of the file contents, hex encoded
    pub checksum: String,
    pub created_at: DateTime<Utc>,
}

impl BackupRecord {
    pub fn compute_checksum(data: &[u8]) -> String {
        hex::encode(Sha256::digest(data))
    }

    pub fn verify(&self, data: &[u8]) -> bool {
        Self::compute_checksum(data) == self.checksum
    }

    /// Re-read the file and compare against the recorded checksum.
    pub fn verify_file(&self) -> Result<bool> {
        let data = fs::read(&self.path)?;
        Ok(self.verify(&data))
    }
}

#[derive(Debug, Clone)]
pub struct BackupManager {
    dir: PathBuf,
}

impl Default for BackupManager {
    fn default() -> Self {
        Self::new(DEFAULT_BACKUP_DIR)
    }
}

impl BackupManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `backup_YYYYMMDD_HHMMSS.json`
    pub fn backup_file_name(at: DateTime<Utc>) -> String {
        format!(
            "{}{}.{}",
            BACKUP_PREFIX,
            at.format("%Y%m%d_%H%M%S"),
            BACKUP_EXTENSION
        )
    }

    pub fn create(&self, metadata: &DatasetMetadata, items: &[Item]) -> Result<BackupRecord> {
        self.create_at(metadata, items, Utc::now())
    }

    /// Write a backup stamped with `at`; a backup from the same second is overwritten.
    pub fn create_at(
        &self,
        metadata: &DatasetMetadata,
        items: &[Item],
        at: DateTime<Utc>,
    ) -> Result<BackupRecord> {
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(Self::backup_file_name(at));
        if path.exists() {
            tracing::warn!(path = %path.display(), "Overwriting existing backup");
        }

        let data = snapshot_bytes(metadata, items)?;
        {
            let mut file = File::create(&path)?;
            file.write_all(&data)?;
            file.flush()?;
        }

        let record = BackupRecord {
            path,
            size: data.len() as u64,
            checksum: BackupRecord::compute_checksum(&data),
            created_at: at,
        };

        tracing::info!(
            path = %record.path.display(),
            size = record.size,
            items = items.len(),
            "Created backup"
        );
        Ok(record)
    }

    /// Backup files in the directory, oldest first. A missing directory has none.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if is_backup_file(&path) {
                backups.push(path);
            }
        }
        // Timestamped names sort chronologically.
        backups.sort();
        Ok(backups)
    }

    pub fn latest(&self) -> Result<Option<PathBuf>> {
        Ok(self.list()?.pop())
    }
}

fn is_backup_file(path: &Path) -> bool {
    let named = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(BACKUP_PREFIX));
    let json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == BACKUP_EXTENSION);
    named && json && path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_backup_file_name_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        assert_eq!(BackupManager::backup_file_name(at), "backup_20240307_090502.json");
    }

    #[test]
    fn test_checksum_is_hex_sha256() {
        let checksum = BackupRecord::compute_checksum(b"abc");
        assert_eq!(
            checksum,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
