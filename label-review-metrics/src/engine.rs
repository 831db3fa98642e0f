use label_review_core::{DatasetMetadata, Item, MetricCalculator};
use serde::{Deserialize, Serialize};

use crate::alerts::{self, AlertThresholds, BiasAlert};
use crate::calculators::{
    quality_score, BiasCalculator, BiasMetrics, DistributionCalculator, LabelCounts,
    VerificationCalculator,
};

/// Model evaluation scores supplied from outside; nothing here computes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelScores {
    pub accuracy: f64,
    pub f1_score: f64,
}

/// Derived dataset statistics. Always rebuilt from the full collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub f1_score: f64,
    pub dataset_size: usize,
    #[serde(rename = "verified_percentage")]
    pub verified_pct: f64,
    pub label_distribution: LabelCounts,
    pub distribution_score: f64,
    pub quality_score: f64,
    pub bias_metrics: BiasMetrics,
}

impl Metrics {
    /// Metrics for a collection with no items.
    pub fn empty(scores: ModelScores) -> Self {
        Self {
            accuracy: scores.accuracy,
            f1_score: scores.f1_score,
            dataset_size: 0,
            verified_pct: 0.0,
            label_distribution: LabelCounts::new(),
            distribution_score: 0.0,
            quality_score: 0.0,
            bias_metrics: BiasMetrics::new(),
        }
    }

    /// Share of the dataset carrying `label`, as a percentage.
    pub fn label_share(&self, label: &str) -> f64 {
        match self.label_distribution.get(label) {
            Some(&count) if self.dataset_size > 0 => count as f64 / self.dataset_size as f64 * 100.0,
            _ => 0.0,
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::empty(ModelScores::default())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    thresholds: AlertThresholds,
}

impl MetricsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(mut self, thresholds: AlertThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    pub fn compute(&self, items: &[Item], metadata: &DatasetMetadata, scores: ModelScores) -> Metrics {
        if items.is_empty() {
            return Metrics::empty(scores);
        }

        let verified_pct = VerificationCalculator.calculate(items, metadata);
        let distribution = DistributionCalculator.calculate(items, metadata);
        let bias_metrics = BiasCalculator.calculate(items, metadata);
        let quality = quality_score(verified_pct, distribution.score);

        tracing::debug!(
            dataset = %metadata.name,
            size = items.len(),
            verified_pct,
            distribution_score = distribution.score,
            quality_score = quality,
            "Computed dataset metrics"
        );

        Metrics {
            accuracy: scores.accuracy,
            f1_score: scores.f1_score,
            dataset_size: items.len(),
            verified_pct,
            label_distribution: distribution.label_distribution,
            distribution_score: distribution.score,
            quality_score: quality,
            bias_metrics,
        }
    }

    pub fn alerts(&self, metrics: &Metrics) -> Vec<BiasAlert> {
        alerts::detect(&metrics.bias_metrics, &self.thresholds)
    }
}
