/// Composite of verification rate and label balance, both on a 0–100 scale.
pub fn quality_score(verified_pct: f64, distribution_score: f64) -> f64 {
    (verified_pct + distribution_score) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_is_the_mean() {
        assert_eq!(quality_score(50.0, 100.0), 75.0);
        assert_eq!(quality_score(0.0, 0.0), 0.0);
    }
}
