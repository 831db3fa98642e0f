pub mod verification;
pub mod distribution;
pub mod bias;
pub mod quality;

pub use verification::*;
pub use distribution::*;
pub use bias::*;
pub use quality::*;

use label_review_core::Item;
use std::collections::BTreeMap;

/// Occurrences of each distinct label, including the empty label.
pub type LabelCounts = BTreeMap<String, usize>;

/// Count labels across the whole collection in one pass.
pub fn label_counts<'a, I>(items: I) -> LabelCounts
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut counts = LabelCounts::new();
    for item in items {
        *counts.entry(item.label.clone()).or_insert(0) += 1;
    }
    counts
}
