use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::item::Item;
use crate::error::CoreError;

/// Separator used when a tag list is written into or parsed from a single value.
pub const TAG_DELIMITER: char = ',';

/// Field name recorded in the change log for review-status edits.
pub const REVIEW_STATUS_FIELD: &str = "review_status";

/// Item fields that can be edited through `ItemStore::update_item`.
///
/// Text and ids are fixed at import and have no variant here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EditableField {
    Label,
    Category,
    Tags,
}

impl EditableField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditableField::Label => "label",
            EditableField::Category => "category",
            EditableField::Tags => "tags",
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditableField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "label" => Ok(EditableField::Label),
            "category" => Ok(EditableField::Category),
            "tags" => Ok(EditableField::Tags),
            _ => Err(CoreError::UnknownField(s.to_string())),
        }
    }
}

/// A typed edit to one editable field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldUpdate {
    Label(String),
    Category(String),
    Tags(Vec<String>),
}

impl FieldUpdate {
    /// Parse a `name = raw` pair; tag values are split on [`TAG_DELIMITER`].
    pub fn parse(name: &str, raw: &str) -> Result<Self, CoreError> {
        Ok(match name.parse::<EditableField>()? {
            EditableField::Label => FieldUpdate::Label(raw.to_string()),
            EditableField::Category => FieldUpdate::Category(raw.to_string()),
            EditableField::Tags => FieldUpdate::Tags(split_tags(raw, TAG_DELIMITER)),
        })
    }

    pub fn field(&self) -> EditableField {
        match self {
            FieldUpdate::Label(_) => EditableField::Label,
            FieldUpdate::Category(_) => EditableField::Category,
            FieldUpdate::Tags(_) => EditableField::Tags,
        }
    }

    /// Write the new value into `item`, returning the (old, new) display strings.
    pub(crate) fn apply(&self, item: &mut Item) -> (String, String) {
        match self {
            FieldUpdate::Label(label) => {
                let old = std::mem::replace(&mut item.label, label.clone());
                (old, label.clone())
            }
            FieldUpdate::Category(category) => {
                let old = std::mem::replace(&mut item.category, category.clone());
                (old, category.clone())
            }
            FieldUpdate::Tags(tags) => {
                let old = std::mem::replace(&mut item.tags, tags.clone());
                (display_tags(&old), display_tags(tags))
            }
        }
    }
}

/// Split a delimited tag cell, trimming fragments and dropping empty ones.
///
/// Duplicates are kept in their original order.
pub fn split_tags(raw: &str, delimiter: char) -> Vec<String> {
    raw.split(delimiter)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn display_tags(tags: &[String]) -> String {
    tags.join(&TAG_DELIMITER.to_string())
}
