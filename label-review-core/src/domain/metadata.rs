use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

use super::item::Item;

pub const DEFAULT_DATASET_NAME: &str = "untitled";

/// Collection-level snapshot derived from the full item collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct DatasetMetadata {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub version: u64,

    pub last_modified: DateTime<Utc>,

    pub total_items: usize,

    pub verified_items: usize,

    /// Distinct labels, sorted ascending. The empty label is included when present.
    pub labels: Vec<String>,

    pub categories: Vec<String>,

    pub tags: Vec<String>,
}

impl DatasetMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 1,
            last_modified: Utc::now(),
            total_items: 0,
            verified_items: 0,
            labels: Vec::new(),
            categories: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn unverified_items(&self) -> usize {
        self.total_items - self.verified_items
    }
}

impl Default for DatasetMetadata {
    fn default() -> Self {
        Self::new(DEFAULT_DATASET_NAME)
    }
}

/// Derives [`DatasetMetadata`] from an item collection with one full scan.
pub struct MetadataAggregator;

impl MetadataAggregator {
    /// Rebuild every derived field; `name` and `version` carry over from `previous`.
    pub fn recompute<'a, I>(previous: &DatasetMetadata, items: I) -> DatasetMetadata
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut total = 0usize;
        let mut verified = 0usize;
        let mut labels = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut tags = BTreeSet::new();

        for item in items {
            total += 1;
            if item.user_verified {
                verified += 1;
            }
            labels.insert(item.label.as_str());
            categories.insert(item.category.as_str());
            for tag in &item.tags {
                tags.insert(tag.as_str());
            }
        }

        tracing::debug!(total, verified, labels = labels.len(), "Recomputed dataset metadata");

        DatasetMetadata {
            name: previous.name.clone(),
            version: previous.version,
            last_modified: Utc::now(),
            total_items: total,
            verified_items: verified,
            labels: into_sorted(labels),
            categories: into_sorted(categories),
            tags: into_sorted(tags),
        }
    }
}

fn into_sorted(set: BTreeSet<&str>) -> Vec<String> {
    set.into_iter().map(str::to_string).collect()
}
