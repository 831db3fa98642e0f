use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetrics {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub sum: f64,
}

impl AggregatedMetrics {
    /// `max / min`; infinite when the smallest value is zero and the largest is not.
    pub fn spread_ratio(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        if self.min == 0.0 {
            return if self.max > 0.0 { Some(f64::INFINITY) } else { None };
        }
        Some(self.max / self.min)
    }
}

pub struct MetricAggregator;

impl MetricAggregator {
    pub fn aggregate(values: &[f64]) -> AggregatedMetrics {
        let values: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if values.is_empty() {
            return Self::empty();
        }

        let mut sorted = values.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let sum: f64 = values.iter().sum();
        let mean = sum / values.len() as f64;
        let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64;

        AggregatedMetrics {
            mean,
            median: Self::percentile(&sorted, 50.0),
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            count: values.len(),
            sum,
        }
    }

    fn percentile(sorted_values: &[f64], percentile: f64) -> f64 {
        if sorted_values.is_empty() {
            return 0.0;
        }
        let index = (percentile / 100.0 * (sorted_values.len() - 1) as f64).round() as usize;
        sorted_values[index.min(sorted_values.len() - 1)]
    }

    fn empty() -> AggregatedMetrics {
        AggregatedMetrics {
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            min: 0.0,
            max: 0.0,
            count: 0,
            sum: 0.0,
        }
    }
}
