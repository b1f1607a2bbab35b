//! Data types produced by the aggregation step.

use serde::Serialize;
use std::fmt;

/// Total incident count for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyAggregate {
    pub year: i32,
    pub total: f64,
    /// Fraction of the grand total.
    pub share: f64,
}

/// One entry of a station, borough or line ranking.
///
/// `share` is relative to the sum over every group, including groups cut
/// off by a top-N limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedAggregate {
    pub key: String,
    pub total: f64,
    pub share: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    /// Zero variance in years or totals; the coefficient is undefined.
    NoTrend,
    InsufficientData,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::NoTrend => "no trend",
            Trend::InsufficientData => "insufficient data",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Strong,
    Moderate,
    None,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strength::Strong => "strong",
            Strength::Moderate => "moderate",
            Strength::None => "none",
        })
    }
}

/// Pearson correlation of yearly totals against the year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationResult {
    /// In [-1, 1]; 0 when undefined.
    pub coefficient: f64,
    pub trend: Trend,
    pub strength: Strength,
}

/// Headline numbers for the whole dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub grand_total: f64,
    pub record_count: usize,
    pub first_year: i32,
    pub last_year: i32,
    pub average_per_year: f64,
}

/// Everything computed from a non-empty dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetAggregate {
    pub summary: Summary,
    pub yearly: Vec<YearlyAggregate>,
    pub top_stations: Vec<RankedAggregate>,
    pub top_boroughs: Vec<RankedAggregate>,
    pub lines: Vec<RankedAggregate>,
    pub correlation: CorrelationResult,
}
