use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One field-level edit on an item.
///
/// Old and new values are captured in display form, not as typed values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeRecord {
    pub timestamp: DateTime<Utc>,
    pub user: String,
    pub field: String,
    pub old_value: String,
    pub new_value: String,
}

impl ChangeRecord {
    pub fn new(
        user: impl Into<String>,
        field: impl Into<String>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            user: user.into(),
            field: field.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.old_value == self.new_value
    }
}

/// Append-only audit trail of an item's field edits, oldest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ChangeLog {
    entries: Vec<ChangeRecord>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record stamped with the current time.
    pub fn record(
        &mut self,
        user: &str,
        field: &str,
        old_value: String,
        new_value: String,
    ) -> &ChangeRecord {
        self.entries
            .push(ChangeRecord::new(user, field, old_value, new_value));
        &self.entries[self.entries.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeRecord> + Clone {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&ChangeRecord> {
        self.entries.last()
    }

    /// Records touching `field`, oldest first.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ChangeRecord> + 'a {
        self.entries.iter().filter(move |r| r.field == field)
    }

    pub fn as_slice(&self) -> &[ChangeRecord] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a ChangeLog {
    type Item = &'a ChangeRecord;
    type IntoIter = std::slice::Iter<'a, ChangeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
