//! Versioned item collection with per-item audit trail.

use chrono::Utc;
use std::collections::HashSet;
use std::ops::Range;
use validator::Validate;

use crate::domain::{
    DatasetMetadata, FieldUpdate, Item, ItemId, MetadataAggregator, NewItem, REVIEW_STATUS_FIELD,
};
use crate::error::{CoreError, Result};

pub const DEFAULT_USER: &str = "annotator";

/// Owns the annotated items and keeps the dataset metadata in step with them.
///
/// Every successful mutation recomputes the metadata before returning, so
/// `metadata()` never describes a stale collection.
#[derive(Debug, Clone)]
pub struct ItemStore {
    items: Vec<Item>,
    metadata: DatasetMetadata,
    current_user: String,
}

impl ItemStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            metadata: DatasetMetadata::new(name),
            current_user: DEFAULT_USER.to_string(),
        }
    }

    /// Like [`ItemStore::new`], but rejects names that a later
    /// [`ItemStore::restore`] would refuse (empty or over 255 characters).
    pub fn try_new(name: impl Into<String>) -> Result<Self> {
        let store = Self::new(name);
        store.metadata.validate()?;
        Ok(store)
    }

    /// Rebuild a store from previously exported items.
    ///
    /// Ids must be non-zero and unique; every item must pass validation.
    pub fn restore(name: impl Into<String>, version: u64, items: Vec<Item>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.id.value() == 0 {
                return Err(CoreError::MalformedInput(
                    "item id 0 is not valid; ids are 1-based".to_string(),
                ));
            }
            if !seen.insert(item.id) {
                return Err(CoreError::MalformedInput(format!(
                    "duplicate item id {}",
                    item.id
                )));
            }
            item.validate().map_err(|e| {
                CoreError::MalformedInput(format!("item {}: {}", item.id, e))
            })?;
        }

        let mut metadata = DatasetMetadata::new(name);
        metadata.version = version.max(1);
        metadata.validate()?;

        let mut store = Self {
            items,
            metadata,
            current_user: DEFAULT_USER.to_string(),
        };
        store.refresh_metadata();

        tracing::info!(
            dataset = %store.metadata.name,
            items = store.items.len(),
            "Restored item store"
        );
        Ok(store)
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.current_user = user.into();
        self
    }

    pub fn current_user(&self) -> &str {
        &self.current_user
    }

    pub fn set_current_user(&mut self, user: impl Into<String>) {
        self.current_user = user.into();
    }

    pub fn metadata(&self) -> &DatasetMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lazy, restartable iteration in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> + Clone {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn get(&self, index: usize) -> Result<&Item> {
        self.items.get(index).ok_or(CoreError::IndexOutOfRange {
            index,
            len: self.items.len(),
        })
    }

    pub fn find(&self, id: ItemId) -> Option<(usize, &Item)> {
        self.items.iter().enumerate().find(|(_, item)| item.id == id)
    }

    /// Append parsed records as new items with sequential ids.
    ///
    /// Returns the positions of the new items.
    pub fn import(&mut self, records: Vec<NewItem>) -> Range<usize> {
        let start = self.items.len();
        if records.is_empty() {
            return start..start;
        }

        let next_id = self.next_id();
        self.items.extend(
            records
                .into_iter()
                .enumerate()
                .map(|(offset, record)| Item::from_new(ItemId(next_id + offset as u64), record)),
        );

        let end = self.items.len();
        self.commit();
        tracing::info!(
            dataset = %self.metadata.name,
            imported = end - start,
            total = end,
            "Imported items"
        );
        start..end
    }

    /// Apply typed field edits to the item at `index`.
    ///
    /// Each update appends one change record; the item version goes up by one
    /// for the whole call.
    pub fn update_item(&mut self, index: usize, updates: &[FieldUpdate]) -> Result<&Item> {
        self.check_index(index)?;

        let user = self.current_user.clone();
        let item = &mut self.items[index];
        for update in updates {
            let (old, new) = update.apply(item);
            item.history.record(&user, update.field().as_str(), old, new);
        }
        touch(item);

        tracing::debug!(
            item = %self.items[index].id,
            fields = updates.len(),
            version = self.items[index].version,
            "Updated item"
        );
        self.commit();
        Ok(&self.items[index])
    }

    /// Parse `(field, value)` pairs and apply them; an unknown field rejects the whole call.
    pub fn update_fields(&mut self, index: usize, fields: &[(&str, &str)]) -> Result<&Item> {
        self.check_index(index)?;
        let updates = fields
            .iter()
            .map(|(name, value)| FieldUpdate::parse(name, value))
            .collect::<Result<Vec<_>>>()?;
        self.update_item(index, &updates)
    }

    /// Human verification: assign `label` and mark the item as verified by the current user.
    pub fn quick_label(&mut self, index: usize, label: impl Into<String>) -> Result<&Item> {
        self.check_index(index)?;

        let user = self.current_user.clone();
        let update = FieldUpdate::Label(label.into());
        let item = &mut self.items[index];
        let (old, new) = update.apply(item);
        item.history.record(&user, update.field().as_str(), old, new);
        item.user_verified = true;
        item.verified_by = user;
        touch(item);

        tracing::debug!(item = %self.items[index].id, "Verified item label");
        self.commit();
        Ok(&self.items[index])
    }

    /// Set the item's review status, e.g. `needs_review`.
    pub fn flag_for_review(&mut self, index: usize, status: impl Into<String>) -> Result<&Item> {
        self.check_index(index)?;

        let user = self.current_user.clone();
        let status = status.into();
        let item = &mut self.items[index];
        let old = std::mem::replace(&mut item.review_status, status.clone());
        item.history.record(&user, REVIEW_STATUS_FIELD, old, status);
        touch(item);

        tracing::debug!(item = %self.items[index].id, "Flagged item for review");
        self.commit();
        Ok(&self.items[index])
    }

    /// Recompute the derived metadata without touching the items.
    pub fn refresh_metadata(&mut self) -> &DatasetMetadata {
        self.metadata = MetadataAggregator::recompute(&self.metadata, &self.items);
        &self.metadata
    }

    fn next_id(&self) -> u64 {
        self.items
            .iter()
            .map(|item| item.id.value())
            .max()
            .unwrap_or(0)
            .max(self.items.len() as u64)
            + 1
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(CoreError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    fn commit(&mut self) {
        self.metadata.version += 1;
        self.refresh_metadata();
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new(crate::domain::DEFAULT_DATASET_NAME)
    }
}

fn touch(item: &mut Item) {
    item.version += 1;
    item.last_updated = Utc::now();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store_with(labels: &[&str]) -> ItemStore {
        let mut store = ItemStore::new("test").with_user("alice");
        store.import(
            labels
                .iter()
                .enumerate()
                .map(|(i, l)| NewItem::new(format!("text {i}")).with_label(*l))
                .collect(),
        );
        store
    }

    #[test]
    fn test_import_assigns_sequential_ids() {
        let mut store = store_with(&["pos", "neg"]);
        let range = store.import(vec![NewItem::new("third")]);

        assert_eq!(range, 2..3);
        let ids: Vec<u64> = store.iter().map(|i| i.id.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.metadata().total_items, 3);
    }

    #[test]
    fn test_empty_import_is_a_noop() {
        let mut store = store_with(&["pos"]);
        let version = store.metadata().version;

        let range = store.import(Vec::new());
        assert!(range.is_empty());
        assert_eq!(store.metadata().version, version);
    }

    #[test]
    fn test_update_item_records_history() {
        let mut store = store_with(&["pos"]);
        let item = store
            .update_item(
                0,
                &[
                    FieldUpdate::Label("neg".into()),
                    FieldUpdate::Category("news".into()),
                ],
            )
            .unwrap();

        assert_eq!(item.version, 1);
        assert_eq!(item.history.len(), 2);
        let first = &item.history.as_slice()[0];
        assert_eq!(first.field, "label");
        assert_eq!(first.old_value, "pos");
        assert_eq!(first.new_value, "neg");
        assert_eq!(first.user, "alice");
        assert_eq!(store.metadata().labels, vec!["neg"]);
    }

    #[test]
    fn test_update_item_out_of_range() {
        let mut store = store_with(&["pos"]);
        let err = store
            .update_item(5, &[FieldUpdate::Label("neg".into())])
            .unwrap_err();
        assert!(matches!(err, CoreError::IndexOutOfRange { index: 5, len: 1 }));
    }

    #[test]
    fn test_update_fields_unknown_field_applies_nothing() {
        let mut store = store_with(&["pos"]);
        let err = store
            .update_fields(0, &[("label", "neg"), ("text", "changed")])
            .unwrap_err();

        assert!(matches!(err, CoreError::UnknownField(ref f) if f == "text"));
        let item = store.get(0).unwrap();
        assert_eq!(item.label, "pos");
        assert_eq!(item.version, 0);
        assert!(item.history.is_empty());
    }

    #[test]
    fn test_quick_label_verifies() {
        let mut store = store_with(&["", "neg"]);
        let item = store.quick_label(0, "pos").unwrap();

        assert!(item.user_verified);
        assert_eq!(item.verified_by, "alice");
        assert_eq!(item.version, 1);
        assert_eq!(item.history.len(), 1);
        assert_eq!(item.history.latest().unwrap().field, "label");
        assert_eq!(store.metadata().verified_items, 1);
    }

    #[test]
    fn test_flag_for_review() {
        let mut store = store_with(&["pos"]);
        let item = store.flag_for_review(0, "needs_review").unwrap();

        assert_eq!(item.review_status, "needs_review");
        assert_eq!(item.history.latest().unwrap().field, REVIEW_STATUS_FIELD);
        assert_eq!(item.version, 1);
    }

    #[test]
    fn test_metadata_version_tracks_mutations() {
        let mut store = store_with(&["pos"]);
        let after_import = store.metadata().version;

        store.quick_label(0, "neg").unwrap();
        assert_eq!(store.metadata().version, after_import + 1);
    }

    #[test]
    fn test_restore_rejects_duplicate_ids() {
        let items = vec![Item::new(ItemId(1), "a"), Item::new(ItemId(1), "b")];
        let err = ItemStore::restore("dup", 1, items).unwrap_err();
        assert!(matches!(err, CoreError::MalformedInput(_)));
    }

    #[test]
    fn test_restore_then_import_continues_ids() {
        let items = vec![Item::new(ItemId(1), "a"), Item::new(ItemId(4), "b")];
        let mut store = ItemStore::restore("gappy", 3, items).unwrap();
        store.import(vec![NewItem::new("c")]);

        assert_eq!(store.get(2).unwrap().id, ItemId(5));
    }

    #[test]
    fn test_find_by_id() {
        let store = store_with(&["pos", "neg"]);
        let (index, item) = store.find(ItemId(2)).unwrap();
        assert_eq!(index, 1);
        assert_eq!(item.label, "neg");
        assert!(store.find(ItemId(9)).is_none());
    }
}
