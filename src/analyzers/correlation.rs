use crate::analyzers::types::{CorrelationResult, Strength, Trend, YearlyAggregate};

/// Absolute coefficient above which a correlation counts as strong.
pub const STRONG_THRESHOLD: f64 = 0.7;

/// Pearson's r computed from running sums:
///
/// `r = (Σxy − ΣxΣy/n) / sqrt((Σx² − (Σx)²/n)(Σy² − (Σy)²/n))`
///
/// Returns `None` when the slices differ in length, are empty, or either
/// series has no variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n == 0 || n != y.len() {
        return None;
    }
    let n = n as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_x_sq: f64 = x.iter().map(|v| v * v).sum();
    let sum_y_sq: f64 = y.iter().map(|v| v * v).sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();

    let numerator = sum_xy - sum_x * sum_y / n;
    let var_x = sum_x_sq - sum_x * sum_x / n;
    let var_y = sum_y_sq - sum_y * sum_y / n;

    // Cancellation can leave a tiny residue where the variance is really zero.
    if var_x <= f64::EPSILON * sum_x_sq || var_y <= f64::EPSILON * sum_y_sq {
        return None;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    Some((numerator / denominator).clamp(-1.0, 1.0))
}

/// Classifies the magnitude of a coefficient.
///
/// | |r|     | Strength |
/// |---------|----------|
/// | > 0.7   | Strong   |
/// | <= 0.7  | Moderate |
pub fn strength(r: f64) -> Strength {
    if r.abs() > STRONG_THRESHOLD {
        Strength::Strong
    } else {
        Strength::Moderate
    }
}

/// Correlates yearly totals with the year they belong to.
pub fn correlate(pairs: &[(i32, f64)]) -> CorrelationResult {
    if pairs.len() < 2 {
        return CorrelationResult {
            coefficient: 0.0,
            trend: Trend::InsufficientData,
            strength: Strength::None,
        };
    }

    let (x, y): (Vec<f64>, Vec<f64>) = pairs.iter().map(|&(year, total)| (year as f64, total)).unzip();

    match pearson(&x, &y) {
        Some(r) => CorrelationResult {
            coefficient: r,
            trend: if r > 0.0 {
                Trend::Increasing
            } else {
                Trend::Decreasing
            },
            strength: strength(r),
        },
        None => CorrelationResult {
            coefficient: 0.0,
            trend: Trend::NoTrend,
            strength: Strength::None,
        },
    }
}

pub fn correlate_yearly(yearly: &[YearlyAggregate]) -> CorrelationResult {
    let pairs: Vec<(i32, f64)> = yearly.iter().map(|y| (y.year, y.total)).collect();
    correlate(&pairs)
}
