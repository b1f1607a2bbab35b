//! Per-row value coercion for year sheets.

use crate::dataset::{IncidentRecord, UNKNOWN_LINE};
use crate::schema::{ColumnMapping, Role};
use crate::workbook::Cell;

/// Why a row was left out of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    MissingStation,
    MissingBorough,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CleanedRow {
    /// `coerced` is set when the count cell was not numeric and defaulted to 0.
    Kept { record: IncidentRecord, coerced: bool },
    Dropped(DropReason),
}

/// Cleans one data row of a year sheet.
///
/// The year comes from the sheet the row was read from, never from the row.
pub fn clean_row(row: &[Cell], mapping: &ColumnMapping, year: i32) -> CleanedRow {
    let cell = move |role: Role| mapping.get(role).and_then(|idx| row.get(idx));
    let text = |role: Role| cell(role).and_then(Cell::as_text);

    let Some(station) = text(Role::Station) else {
        return CleanedRow::Dropped(DropReason::MissingStation);
    };
    let Some(borough) = text(Role::Borough) else {
        return CleanedRow::Dropped(DropReason::MissingBorough);
    };

    let (count, coerced) = coerce_count(cell(Role::Count));
    let line = canonical_line(text(Role::Line).as_deref());

    CleanedRow::Kept {
        record: IncidentRecord {
            year,
            borough,
            line,
            station,
            count,
        },
        coerced,
    }
}

/// Reads a count cell, falling back to 0 for anything non-numeric.
///
/// Negative values are clamped to 0. The flag is true when the fallback or
/// the clamp was applied.
pub fn coerce_count(cell: Option<&Cell>) -> (f64, bool) {
    match cell.and_then(Cell::as_number) {
        Some(n) if n >= 0.0 => (n, false),
        _ => (0.0, true),
    }
}

/// Canonical line key: `"LÍNEA 1"`, `"Linea 1"`, `" L1 "` and `1` all map to `"L1"`.
///
/// Blank input maps to [`UNKNOWN_LINE`].
pub fn canonical_line(raw: Option<&str>) -> String {
    let upper = raw.unwrap_or_default().trim().to_uppercase();
    let compact: String = upper
        .replace("LÍNEA", "L")
        .replace("LINEA", "L")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if compact.is_empty() || compact == "NAN" {
        UNKNOWN_LINE.to_string()
    } else if compact.chars().all(|c| c.is_ascii_digit()) {
        format!("L{compact}")
    } else {
        compact
    }
}
