use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

use super::change_log::ChangeLog;
use super::ids::ItemId;

/// One annotated training example under review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct Item {
    pub id: ItemId,

    pub text: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub label: String,

    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub confidence: f64,

    #[serde(default)]
    pub user_verified: bool,

    #[serde(default)]
    pub model_predictions: BTreeMap<String, f64>,

    pub last_updated: DateTime<Utc>,

    #[serde(default)]
    pub version: u64,

    #[serde(default)]
    pub verified_by: String,

    #[serde(default)]
    pub review_status: String,

    #[serde(default)]
    pub history: ChangeLog,
}

impl Item {
    pub fn new(id: ItemId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            category: String::new(),
            tags: Vec::new(),
            label: String::new(),
            confidence: 0.0,
            user_verified: false,
            model_predictions: BTreeMap::new(),
            last_updated: Utc::now(),
            version: 0,
            verified_by: String::new(),
            review_status: String::new(),
            history: ChangeLog::new(),
        }
    }

    pub fn from_new(id: ItemId, new: NewItem) -> Self {
        Self {
            category: new.category,
            label: new.label,
            tags: new.tags,
            ..Self::new(id, new.text)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_predictions(mut self, predictions: BTreeMap<String, f64>) -> Self {
        self.model_predictions = predictions;
        self
    }

    /// Length of the raw text in bytes, as used by the text-length bias indicators.
    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// Label with the highest predicted probability, if any prediction exists.
    pub fn top_prediction(&self) -> Option<(&str, f64)> {
        self.model_predictions
            .iter()
            .filter(|(_, p)| !p.is_nan())
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(label, p)| (label.as_str(), *p))
    }
}

/// A parsed record waiting to become an [`Item`]; the store assigns its id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub text: String,
    pub category: String,
    pub label: String,
    pub tags: Vec<String>,
}

impl NewItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_item_from_new_starts_clean() {
        let item = Item::from_new(
            ItemId(3),
            NewItem::new("some text").with_label("pos").with_tags(["a", "b"]),
        );

        assert_eq!(item.id, ItemId(3));
        assert_eq!(item.label, "pos");
        assert_eq!(item.tags, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(item.version, 0);
        assert!(item.history.is_empty());
        assert!(item.model_predictions.is_empty());
        assert!(!item.user_verified);
    }

    #[test]
    fn test_confidence_validation() {
        let mut item = Item::new(ItemId(1), "x");
        item.confidence = 0.75;
        assert!(item.validate().is_ok());

        item.confidence = 1.5;
        assert!(item.validate().is_err());
    }

    #[test]
    fn test_top_prediction() {
        let mut preds = BTreeMap::new();
        preds.insert("neg".to_string(), 0.2);
        preds.insert("pos".to_string(), 0.8);
        let item = Item::new(ItemId(1), "x").with_predictions(preds);

        assert_eq!(item.top_prediction(), Some(("pos", 0.8)));
        assert_eq!(Item::new(ItemId(2), "y").top_prediction(), None);
    }

    #[test]
    fn test_item_json_uses_snake_case_keys() {
        let item = Item::new(ItemId(1), "x");
        let value = serde_json::to_value(&item).unwrap();

        for key in ["user_verified", "model_predictions", "last_updated", "verified_by", "review_status", "history"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }
}
