use label_review_core::{DatasetMetadata, Item, MetricCalculator};
use statrs::statistics::Statistics;

use super::{label_counts, LabelCounts};

/// How evenly items spread across labels, on a 0–100 scale.
///
/// Perfectly balanced counts score 100. The population variance of the counts
/// is normalised against the squared mean count; heavily skewed data is
/// clamped at 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistributionCalculator;

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionOutput {
    pub label_distribution: LabelCounts,
    pub score: f64,
}

impl DistributionCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn score(counts: &LabelCounts) -> f64 {
        if counts.is_empty() {
            return 0.0;
        }

        let values: Vec<f64> = counts.values().map(|&c| c as f64).collect();
        let expected = values.as_slice().mean();
        if expected == 0.0 {
            return 0.0;
        }

        let variance = values.as_slice().population_variance();
        let ceiling = expected * expected;

        ((1.0 - variance / ceiling) * 100.0).clamp(0.0, 100.0)
    }
}

impl MetricCalculator for DistributionCalculator {
    type Output = DistributionOutput;

    fn name(&self) -> &'static str {
        "distribution_score"
    }

    fn calculate(&self, items: &[Item], _metadata: &DatasetMetadata) -> DistributionOutput {
        let label_distribution = label_counts(items);
        let score = Self::score(&label_distribution);
        DistributionOutput {
            label_distribution,
            score,
        }
    }
}
