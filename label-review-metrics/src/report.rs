//! Plain-text and JSON analysis report for a dataset.

use chrono::{DateTime, Utc};
use label_review_core::DatasetMetadata;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::alerts::BiasAlert;
use crate::calculators::BiasMetrics;
use crate::engine::Metrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelShare {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub dataset: String,
    pub dataset_version: u64,
    pub generated_at: DateTime<Utc>,
    pub quality_score: f64,
    pub verified_items: usize,
    pub total_items: usize,
    pub verified_percentage: f64,
    pub distribution_score: f64,
    pub label_distribution: Vec<LabelShare>,
    pub bias_metrics: BiasMetrics,
    pub alerts: Vec<BiasAlert>,
}

impl AnalysisReport {
    pub fn new(metadata: &DatasetMetadata, metrics: &Metrics, alerts: Vec<BiasAlert>) -> Self {
        let label_distribution = metrics
            .label_distribution
            .iter()
            .map(|(label, &count)| LabelShare {
                label: label.clone(),
                count,
                percentage: metrics.label_share(label),
            })
            .collect();

        Self {
            dataset: metadata.name.clone(),
            dataset_version: metadata.version,
            generated_at: Utc::now(),
            quality_score: metrics.quality_score,
            verified_items: metadata.verified_items,
            total_items: metrics.dataset_size,
            verified_percentage: metrics.verified_pct,
            distribution_score: metrics.distribution_score,
            label_distribution,
            bias_metrics: metrics.bias_metrics.clone(),
            alerts,
        }
    }

    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(out, "Dataset: {} (v{})", self.dataset, self.dataset_version);
        let _ = writeln!(out, "Dataset Quality Score: {:.2}%", self.quality_score);
        let _ = writeln!(
            out,
            "Verified Items: {}/{} ({:.1}%)",
            self.verified_items, self.total_items, self.verified_percentage
        );
        let _ = writeln!(out, "Distribution Score: {:.2}", self.distribution_score);
        let _ = writeln!(out, "Label Distribution:");
        for share in &self.label_distribution {
            let label = if share.label.is_empty() { "(unlabeled)" } else { &share.label };
            let _ = writeln!(out, "  {}: {} ({:.1}%)", label, share.count, share.percentage);
        }
        if !self.bias_metrics.is_empty() {
            let _ = writeln!(out, "Bias Metrics:");
            for (key, value) in self.bias_metrics.iter() {
                let _ = writeln!(out, "  {key}: {value:.3}");
            }
        }
        for alert in &self.alerts {
            let _ = writeln!(out, "Potential bias detected: {}", alert.message());
        }
        out
    }
}
