//! Descriptive statistics over a merged incident dataset.
//!
//! Yearly totals, top-N rankings with shares of the full group total,
//! per-line totals and the year-over-year Pearson correlation.

pub mod aggregate;
pub mod correlation;
pub mod types;
pub mod utility;
