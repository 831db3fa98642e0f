use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype pattern for ItemId
///
/// Ids are 1-based and assigned in import order; they are never reused.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl ItemId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Id for the item stored at `index` in a collection that was built only by appending.
    pub fn for_position(index: usize) -> Self {
        Self(index as u64 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<ItemId> for u64 {
    fn from(id: ItemId) -> Self {
        id.0
    }
}
