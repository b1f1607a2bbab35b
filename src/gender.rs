//! Loader for the categorical gender sheet.
//!
//! Runs independently of the year sheets and reports absence instead of
//! failing: any problem with the sheet yields `None`.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analyzers::utility::share;
use crate::normalize::normalize_header;
use crate::schema::{Role, SchemaTable};
use crate::workbook::{Cell, Workbook};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderShare {
    pub label: String,
    pub frequency: f64,
    pub share: f64,
}

/// Frequency per category label, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderDistribution {
    pub total: f64,
    pub entries: Vec<GenderShare>,
}

impl GenderDistribution {
    /// Builds a distribution, summing repeated labels. `None` if `pairs` is empty.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, f64)>) -> Option<Self> {
        let mut totals: Vec<(String, f64)> = Vec::new();

        for (label, frequency) in pairs {
            match totals.iter_mut().find(|(existing, _)| *existing == label) {
                Some((_, sum)) => *sum += frequency,
                None => totals.push((label, frequency)),
            }
        }

        if totals.is_empty() {
            return None;
        }

        let total: f64 = totals.iter().map(|(_, f)| f).sum();
        let entries = totals
            .into_iter()
            .map(|(label, frequency)| GenderShare {
                share: share(frequency, total),
                label,
                frequency,
            })
            .collect();

        Some(Self { total, entries })
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.frequency)
    }
}

/// Reads the gender sheet named `sheet`.
///
/// Returns `None` if the sheet is unreadable, lacks the `genero` or
/// `frecuencia` columns, or has no row with both a label and a non-negative
/// numeric frequency.
#[tracing::instrument(skip(workbook))]
pub fn load_gender_distribution<W: Workbook + ?Sized>(
    workbook: &mut W,
    sheet: &str,
) -> Option<GenderDistribution> {
    let table = match workbook.read_sheet(sheet) {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "Gender sheet unavailable");
            return None;
        }
    };

    let headers: Vec<String> = table.headers.iter().map(|h| normalize_header(h)).collect();
    let mapping = match SchemaTable::gender_sheet().map_headers(&headers) {
        Ok(mapping) => mapping,
        Err(missing) => {
            warn!(?missing, ?headers, "Gender sheet is missing required columns");
            return None;
        }
    };

    let category = mapping.get(Role::Category)?;
    let frequency = mapping.get(Role::Frequency)?;

    let mut dropped = 0usize;
    let pairs: Vec<(String, f64)> = table
        .rows
        .iter()
        .filter_map(|row| {
            let label = row.get(category).and_then(Cell::as_text);
            let value = row
                .get(frequency)
                .and_then(Cell::as_number)
                .filter(|v| *v >= 0.0);

            match (label, value) {
                (Some(label), Some(value)) => Some((label, value)),
                _ => {
                    dropped += 1;
                    None
                }
            }
        })
        .collect();

    if dropped > 0 {
        debug!(dropped, "Gender rows dropped");
    }

    let distribution = GenderDistribution::from_pairs(pairs);
    match &distribution {
        Some(d) => info!(categories = d.entries.len(), total = d.total, "Gender distribution loaded"),
        None => warn!("Gender sheet has no usable rows"),
    }

    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::MemoryWorkbook;

    fn workbook(grid: Vec<Vec<Cell>>) -> MemoryWorkbook {
        MemoryWorkbook::new().with_sheet("Hoja1", grid)
    }

    #[test]
    fn test_loads_distribution() {
        let mut wb = workbook(vec![
            vec![Cell::from(" Género "), Cell::from("Frecuencia")],
            vec![Cell::from("Mujer"), Cell::Number(60.0)],
            vec![Cell::from("Hombre"), Cell::from("30")],
            vec![Cell::from("No especificado"), Cell::Number(10.0)],
        ]);

        let dist = load_gender_distribution(&mut wb, "Hoja1").unwrap();

        assert_eq!(dist.total, 100.0);
        assert_eq!(dist.entries.len(), 3);
        assert_eq!(dist.get("Hombre"), Some(30.0));
        assert!((dist.entries[0].share - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_drops_non_numeric_frequency() {
        let mut wb = workbook(vec![
            vec![Cell::from("genero"), Cell::from("frecuencia")],
            vec![Cell::from("Mujer"), Cell::from("muchos")],
            vec![Cell::from("Hombre"), Cell::Number(5.0)],
            vec![Cell::Empty, Cell::Number(7.0)],
        ]);

        let dist = load_gender_distribution(&mut wb, "Hoja1").unwrap();
        assert_eq!(dist.entries.len(), 1);
        assert_eq!(dist.get("Mujer"), None);
        assert_eq!(dist.total, 5.0);
    }

    #[test]
    fn test_missing_sheet_is_none() {
        let mut wb = MemoryWorkbook::new();
        assert!(load_gender_distribution(&mut wb, "Hoja1").is_none());
    }

    #[test]
    fn test_missing_column_is_none() {
        let mut wb = workbook(vec![
            vec![Cell::from("genero"), Cell::from("total")],
            vec![Cell::from("Mujer"), Cell::Number(3.0)],
        ]);
        assert!(load_gender_distribution(&mut wb, "Hoja1").is_none());
    }

    #[test]
    fn test_no_surviving_rows_is_none() {
        let mut wb = workbook(vec![
            vec![Cell::from("genero"), Cell::from("frecuencia")],
            vec![Cell::from("Mujer"), Cell::from("?")],
        ]);
        assert!(load_gender_distribution(&mut wb, "Hoja1").is_none());
    }

    #[test]
    fn test_from_pairs_sums_repeated_labels() {
        let dist = GenderDistribution::from_pairs(vec![
            ("Mujer".to_string(), 2.0),
            ("Hombre".to_string(), 1.0),
            ("Mujer".to_string(), 1.0),
        ])
        .unwrap();

        assert_eq!(dist.entries.len(), 2);
        assert_eq!(dist.entries[0].label, "Mujer");
        assert_eq!(dist.get("Mujer"), Some(3.0));
        assert!((dist.entries[0].share - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_from_pairs_empty_is_none() {
        assert!(GenderDistribution::from_pairs(Vec::new()).is_none());
    }
}
