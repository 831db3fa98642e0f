use label_review_core::{DatasetMetadata, Item, MetricCalculator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DISTRIBUTION_BIAS_KEY: &str = "distribution_bias";
pub const TEXT_LENGTH_PREFIX: &str = "text_length_";

/// Named bias indicators, serialized as a flat map.
///
/// Keys are `distribution_bias` and one `text_length_<label>` per label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiasMetrics(BTreeMap<String, f64>);

impl BiasMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distribution_bias(&self) -> Option<f64> {
        self.0.get(DISTRIBUTION_BIAS_KEY).copied()
    }

    pub fn text_length(&self, label: &str) -> Option<f64> {
        self.0.get(&format!("{TEXT_LENGTH_PREFIX}{label}")).copied()
    }

    /// Average text length per label, keyed by label.
    pub fn text_lengths(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0
            .iter()
            .filter_map(|(k, v)| k.strip_prefix(TEXT_LENGTH_PREFIX).map(|label| (label, *v)))
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.0
    }
}

/// Label-share imbalance and per-label text length.
#[derive(Debug, Clone, Copy, Default)]
pub struct BiasCalculator;

impl BiasCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn compute<'a, I>(items: I) -> BiasMetrics
    where
        I: IntoIterator<Item = &'a Item>,
    {
        let mut per_label: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        let mut total = 0usize;
        for item in items {
            let entry = per_label.entry(item.label.as_str()).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += item.text_len();
            total += 1;
        }

        if per_label.is_empty() {
            return BiasMetrics::new();
        }

        let expected_share = 1.0 / per_label.len() as f64;
        let mut metrics = BTreeMap::new();
        let mut deviation = 0.0;

        for (label, (count, length_sum)) in &per_label {
            let actual_share = *count as f64 / total as f64;
            deviation += (actual_share - expected_share).abs();
            metrics.insert(
                format!("{TEXT_LENGTH_PREFIX}{label}"),
                *length_sum as f64 / *count as f64,
            );
        }

        metrics.insert(
            DISTRIBUTION_BIAS_KEY.to_string(),
            deviation / per_label.len() as f64,
        );
        BiasMetrics(metrics)
    }
}

impl MetricCalculator for BiasCalculator {
    type Output = BiasMetrics;

    fn name(&self) -> &'static str {
        "bias_metrics"
    }

    fn calculate(&self, items: &[Item], _metadata: &DatasetMetadata) -> BiasMetrics {
        Self::compute(items)
    }
}
