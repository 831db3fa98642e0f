//! Structured JSON export and import of a whole dataset.

use label_review_core::{DatasetMetadata, Item, ItemStore, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Exported document: `{ "metadata": {...}, "data": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: DatasetMetadata,
    pub data: Vec<Item>,
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    metadata: &'a DatasetMetadata,
    data: &'a [Item],
}

impl Snapshot {
    pub fn of(store: &ItemStore) -> Self {
        Self {
            metadata: store.metadata().clone(),
            data: store.as_slice().to_vec(),
        }
    }

    /// Rebuild a store, validating ids and item fields.
    pub fn into_store(self) -> Result<ItemStore> {
        ItemStore::restore(self.metadata.name, self.metadata.version, self.data)
    }
}

/// Pretty-printed JSON, flushed before return.
pub fn write_snapshot<W: Write>(
    mut writer: W,
    metadata: &DatasetMetadata,
    items: &[Item],
) -> Result<()> {
    serde_json::to_writer_pretty(
        &mut writer,
        &SnapshotRef {
            metadata,
            data: items,
        },
    )?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_snapshot<R: Read>(reader: R) -> Result<Snapshot> {
    let snapshot: Snapshot = serde_json::from_reader(reader)?;
    tracing::debug!(
        dataset = %snapshot.metadata.name,
        items = snapshot.data.len(),
        "Read dataset snapshot"
    );
    Ok(snapshot)
}

/// In-memory encoding of a snapshot, as written by [`write_snapshot`].
pub fn snapshot_bytes(metadata: &DatasetMetadata, items: &[Item]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_snapshot(&mut buffer, metadata, items)?;
    Ok(buffer)
}
