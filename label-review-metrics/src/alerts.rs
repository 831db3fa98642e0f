//! Bias alerts raised from the bias indicators.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::aggregators::MetricAggregator;
use crate::calculators::BiasMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// `distribution_bias` above this flags a significant imbalance.
    #[serde(default = "default_imbalance_threshold")]
    pub imbalance_threshold: f64,

    /// Longest / shortest average text length above this flags a length variation.
    #[serde(default = "default_length_ratio_threshold")]
    pub length_ratio_threshold: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            imbalance_threshold: default_imbalance_threshold(),
            length_ratio_threshold: default_length_ratio_threshold(),
        }
    }
}

fn default_imbalance_threshold() -> f64 {
    0.3
}

fn default_length_ratio_threshold() -> f64 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BiasAlert {
    SignificantImbalance {
        distribution_bias: f64,
    },
    TextLengthVariation {
        ratio: f64,
        shortest_label: String,
        longest_label: String,
    },
}

impl BiasAlert {
    pub fn message(&self) -> &'static str {
        match self {
            BiasAlert::SignificantImbalance { .. } => "Significant imbalance in label distribution",
            BiasAlert::TextLengthVariation { .. } => {
                "Large variation in text lengths between classes"
            }
        }
    }
}

impl fmt::Display for BiasAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BiasAlert::SignificantImbalance { distribution_bias } => {
                write!(f, "{} (bias {:.2})", self.message(), distribution_bias)
            }
            BiasAlert::TextLengthVariation {
                ratio,
                shortest_label,
                longest_label,
            } => write!(
                f,
                "{} ({:?} is {:.1}x longer than {:?})",
                self.message(),
                longest_label,
                ratio,
                shortest_label
            ),
        }
    }
}

/// Every alert that fires for `bias`, imbalance first.
pub fn detect(bias: &BiasMetrics, thresholds: &AlertThresholds) -> Vec<BiasAlert> {
    let mut alerts = Vec::new();

    if let Some(distribution_bias) = bias.distribution_bias() {
        if distribution_bias > thresholds.imbalance_threshold {
            alerts.push(BiasAlert::SignificantImbalance { distribution_bias });
        }
    }

    let lengths: Vec<(&str, f64)> = bias.text_lengths().collect();
    if lengths.len() < 2 {
        return alerts;
    }

    let values: Vec<f64> = lengths.iter().map(|(_, v)| *v).collect();
    let summary = MetricAggregator::aggregate(&values);
    if let Some(ratio) = summary.spread_ratio() {
        if ratio > thresholds.length_ratio_threshold {
            let label_for = |target: f64| {
                lengths
                    .iter()
                    .find(|(_, v)| *v == target)
                    .map(|(l, _)| l.to_string())
                    .unwrap_or_default()
            };
            alerts.push(BiasAlert::TextLengthVariation {
                ratio,
                shortest_label: label_for(summary.min),
                longest_label: label_for(summary.max),
            });
        }
    }

    alerts
}
