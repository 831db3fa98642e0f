use label_review_core::{DatasetMetadata, Item, MetricCalculator};

/// Share of items a human has verified, as a percentage.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationCalculator;

impl VerificationCalculator {
    pub fn new() -> Self {
        Self
    }

    /// `verified / total * 100`, or 0 for an empty collection.
    pub fn percentage(verified: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        verified as f64 / total as f64 * 100.0
    }
}

impl MetricCalculator for VerificationCalculator {
    type Output = f64;

    fn name(&self) -> &'static str {
        "verified_percentage"
    }

    fn calculate(&self, _items: &[Item], metadata: &DatasetMetadata) -> f64 {
        Self::percentage(metadata.verified_items, metadata.total_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_percentage() {
        assert_relative_eq!(VerificationCalculator::percentage(1, 4), 25.0);
        assert_relative_eq!(VerificationCalculator::percentage(3, 3), 100.0);
    }

    #[test]
    fn test_percentage_empty_is_zero() {
        let pct = VerificationCalculator::percentage(0, 0);
        assert_eq!(pct, 0.0);
        assert!(!pct.is_nan());
    }
}
