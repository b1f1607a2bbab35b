//! End-to-end run: workbook → dataset → result bundle.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::analyzers::aggregate::aggregate_dataset;
use crate::analyzers::types::DatasetAggregate;
use crate::config::PipelineConfig;
use crate::dataset::Dataset;
use crate::error::PipelineError;
use crate::gender::{GenderDistribution, load_gender_distribution};
use crate::loader::{SheetStatus, load_year_sheets, merge_sheets};
use crate::workbook::{Workbook, XlsxWorkbook};

/// Aggregates handed to the rendering side. Carries no raw rows.
#[derive(Debug, Clone, Serialize)]
pub struct ResultBundle {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub aggregates: DatasetAggregate,
    pub gender: Option<GenderDistribution>,
    pub sheets: Vec<SheetStatus>,
}

#[derive(Debug, Clone)]
pub enum PipelineOutcome {
    Report(Box<ResultBundle>),
    /// No sheet contributed a single row.
    NoData { sheets: Vec<SheetStatus> },
}

/// Opens the configured workbook and runs the pipeline over it.
///
/// # Errors
///
/// Returns [`PipelineError::FileUnreadable`] if the workbook cannot be opened.
/// Every other problem is recovered inside the pipeline.
#[tracing::instrument(skip(config), fields(workbook = %config.workbook_path.display()))]
pub fn run(config: &PipelineConfig) -> Result<PipelineOutcome, PipelineError> {
    let mut workbook = XlsxWorkbook::open(&config.workbook_path)?;
    Ok(run_with_workbook(&mut workbook, config))
}

/// Reads and merges the configured year sheets.
pub fn load_dataset<W: Workbook + ?Sized>(
    workbook: &mut W,
    config: &PipelineConfig,
) -> (Dataset, Vec<SheetStatus>) {
    let loads = load_year_sheets(workbook, &config.years, &config.schema);
    merge_sheets(loads)
}

pub fn run_with_workbook<W: Workbook + ?Sized>(
    workbook: &mut W,
    config: &PipelineConfig,
) -> PipelineOutcome {
    let (dataset, sheets) = load_dataset(workbook, config);

    let Some(aggregates) = aggregate_dataset(&dataset, config.top_stations, config.top_boroughs)
    else {
        warn!(sheets = sheets.len(), "No valid data in any year sheet");
        return PipelineOutcome::NoData { sheets };
    };

    let gender = load_gender_distribution(workbook, &config.gender_sheet);

    info!(
        records = dataset.len(),
        grand_total = aggregates.summary.grand_total,
        trend = %aggregates.correlation.trend,
        gender = gender.is_some(),
        "Pipeline complete"
    );

    PipelineOutcome::Report(Box::new(ResultBundle {
        generated_at: Utc::now(),
        aggregates,
        gender,
        sheets,
    }))
}
