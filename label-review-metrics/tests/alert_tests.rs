use label_review_core::{Item, ItemId};
use label_review_metrics::*;
use pretty_assertions::assert_eq;

fn items(rows: &[(&str, &str)]) -> Vec<Item> {
    rows.iter()
        .enumerate()
        .map(|(i, (text, label))| Item::new(ItemId(i as u64 + 1), *text).with_label(*label))
        .collect()
}

#[test]
fn test_imbalance_alert_fires_above_threshold() {
    let mut rows = vec![("text", "pos"); 9];
    rows.push(("text", "neg"));
    let bias = BiasCalculator::compute(&items(&rows));

    let alerts = detect(&bias, &AlertThresholds::default());
    assert_eq!(alerts.len(), 1);
    assert!(matches!(alerts[0], BiasAlert::SignificantImbalance { .. }));
    assert_eq!(alerts[0].message(), "Significant imbalance in label distribution");
}

#[test]
fn test_balanced_equal_lengths_raise_nothing() {
    let bias = BiasCalculator::compute(&items(&[("abc", "pos"), ("xyz", "neg")]));
    assert!(detect(&bias, &AlertThresholds::default()).is_empty());
}

#[test]
fn test_length_variation_alert() {
    let bias = BiasCalculator::compute(&items(&[("ab", "pos"), ("abcdefgh", "neg")]));

    let alerts = detect(&bias, &AlertThresholds::default());
    assert_eq!(
        alerts,
        vec![BiasAlert::TextLengthVariation {
            ratio: 4.0,
            shortest_label: "pos".to_string(),
            longest_label: "neg".to_string(),
        }]
    );
}

#[test]
fn test_length_alert_needs_two_labels() {
    let bias = BiasCalculator::compute(&items(&[("a", "pos"), ("abcdefghij", "pos")]));

    let alerts = detect(&bias, &AlertThresholds::default());
    assert!(alerts.is_empty());
}

#[test]
fn test_both_alerts_imbalance_first() {
    let mut rows = vec![("a", "pos"); 9];
    rows.push(("a much longer piece of text", "neg"));
    let bias = BiasCalculator::compute(&items(&rows));

    let kinds: Vec<&str> = detect(&bias, &AlertThresholds::default())
        .iter()
        .map(|a| a.message())
        .collect();
    assert_eq!(
        kinds,
        vec![
            "Significant imbalance in label distribution",
            "Large variation in text lengths between classes"
        ]
    );
}

#[test]
fn test_custom_thresholds() {
    let bias = BiasCalculator::compute(&items(&[("ab", "pos"), ("abcdefgh", "neg")]));
    let relaxed = AlertThresholds {
        imbalance_threshold: 0.3,
        length_ratio_threshold: 5.0,
    };

    assert!(detect(&bias, &relaxed).is_empty());
}

#[test]
fn test_alert_display_and_serialization() {
    let alert = BiasAlert::SignificantImbalance { distribution_bias: 0.4 };
    assert_eq!(
        alert.to_string(),
        "Significant imbalance in label distribution (bias 0.40)"
    );

    let value = serde_json::to_value(&alert).unwrap();
    assert_eq!(value["kind"], "significant_imbalance");
}
