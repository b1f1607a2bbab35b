/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Fraction of `total` that `part` represents. Returns 0.0 when `total` is not positive.
pub fn share(part: f64, total: f64) -> f64 {
    if total <= 0.0 { 0.0 } else { part / total }
}
