use crate::domain::{DatasetMetadata, Item};

/// A statistic derived from the full item collection.
///
/// Calculators are pure: the same items and metadata always give the same output.
pub trait MetricCalculator {
    type Output;

    fn name(&self) -> &'static str;

    fn calculate(&self, items: &[Item], metadata: &DatasetMetadata) -> Self::Output;
}
