//! Year-sheet loading and merging.
//!
//! Each configured year maps to the sheet of the same name. A sheet that
//! cannot be read or mapped is recorded as skipped and loading continues with
//! the next year.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::cleaner::{CleanedRow, clean_row};
use crate::dataset::{Dataset, IncidentRecord};
use crate::error::SheetError;
use crate::normalize::normalize_header;
use crate::schema::SchemaTable;
use crate::workbook::Workbook;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SheetOutcome {
    Loaded {
        rows_read: usize,
        rows_kept: usize,
        rows_dropped: usize,
        /// Kept rows whose count cell fell back to 0.
        coerced_counts: usize,
    },
    Skipped {
        reason: SheetError,
    },
}

/// What happened to one year sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetStatus {
    pub sheet: String,
    pub year: i32,
    #[serde(flatten)]
    pub outcome: SheetOutcome,
}

impl SheetStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self.outcome, SheetOutcome::Loaded { .. })
    }
}

/// Records kept from one sheet together with its status.
#[derive(Debug, Clone)]
pub struct SheetLoad {
    pub status: SheetStatus,
    pub records: Vec<IncidentRecord>,
}

impl SheetLoad {
    fn skipped(year: i32, reason: SheetError) -> Self {
        Self {
            status: SheetStatus {
                sheet: reason.sheet().to_string(),
                year,
                outcome: SheetOutcome::Skipped { reason },
            },
            records: Vec::new(),
        }
    }
}

/// Loads a single year sheet. Never fails; problems end up in the status.
#[tracing::instrument(skip(workbook, schema))]
pub fn load_year_sheet<W: Workbook + ?Sized>(
    workbook: &mut W,
    year: i32,
    schema: &SchemaTable,
) -> SheetLoad {
    let sheet = year.to_string();

    let table = match workbook.read_sheet(&sheet) {
        Ok(table) => table,
        Err(reason) => {
            warn!(error = %reason, "Skipping unreadable sheet");
            return SheetLoad::skipped(year, reason);
        }
    };

    let headers: Vec<String> = table.headers.iter().map(|h| normalize_header(h)).collect();
    debug!(?headers, "Canonical headers");

    let mapping = match schema.map_headers(&headers) {
        Ok(mapping) => mapping,
        Err(missing) => {
            let reason = SheetError::SchemaIncomplete {
                sheet: sheet.clone(),
                missing,
            };
            warn!(error = %reason, "Skipping sheet with incomplete schema");
            return SheetLoad::skipped(year, reason);
        }
    };

    let mut records = Vec::new();
    let mut rows_dropped = 0;
    let mut coerced_counts = 0;

    for (idx, row) in table.rows.iter().enumerate() {
        match clean_row(row, &mapping, year) {
            CleanedRow::Kept { record, coerced } => {
                if coerced {
                    coerced_counts += 1;
                    debug!(row = idx + 2, "Count cell not numeric, using 0");
                }
                records.push(record);
            }
            CleanedRow::Dropped(reason) => {
                rows_dropped += 1;
                debug!(row = idx + 2, ?reason, "Row dropped");
            }
        }
    }

    let rows_read = table.rows.len();
    let rows_kept = records.len();

    if rows_kept == 0 && rows_read > 0 {
        warn!(rows_read, "No rows survived cleaning");
    }
    info!(rows_read, rows_kept, rows_dropped, coerced_counts, "Sheet loaded");

    SheetLoad {
        status: SheetStatus {
            sheet,
            year,
            outcome: SheetOutcome::Loaded {
                rows_read,
                rows_kept,
                rows_dropped,
                coerced_counts,
            },
        },
        records,
    }
}

/// Loads every configured year in order.
///
/// A year listed more than once is loaded only at its first position, so its
/// rows are never counted twice.
pub fn load_year_sheets<W: Workbook + ?Sized>(
    workbook: &mut W,
    years: &[i32],
    schema: &SchemaTable,
) -> Vec<SheetLoad> {
    let mut seen = HashSet::new();
    let mut loads = Vec::with_capacity(years.len());

    for &year in years {
        if !seen.insert(year) {
            warn!(year, "Year configured more than once, ignoring repeat");
            continue;
        }
        loads.push(load_year_sheet(workbook, year, schema));
    }
    loads
}

/// Concatenates per-sheet records into one [`Dataset`].
///
/// The dataset is empty when every sheet was skipped or kept no rows.
pub fn merge_sheets(loads: Vec<SheetLoad>) -> (Dataset, Vec<SheetStatus>) {
    let mut records = Vec::new();
    let mut statuses = Vec::with_capacity(loads.len());

    for load in loads {
        records.extend(load.records);
        statuses.push(load.status);
    }

    let loaded = statuses.iter().filter(|s| s.is_loaded()).count();
    info!(
        sheets = statuses.len(),
        loaded,
        records = records.len(),
        "Sheets merged"
    );

    (Dataset::new(records), statuses)
}
