//! Canonical incident rows and the merged dataset built from them.

use serde::Serialize;

/// Line key given to rows whose line cell is blank or missing.
pub const UNKNOWN_LINE: &str = "DESCONOCIDA";

/// A single cleaned row from one year sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncidentRecord {
    pub year: i32,
    pub borough: String,
    pub line: String,
    pub station: String,
    pub count: f64,
}

/// Every record that survived cleaning, across all loaded sheets.
///
/// Built once by [`crate::loader::merge_sheets`] and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<IncidentRecord>,
}

impl Dataset {
    pub fn new(records: Vec<IncidentRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of `count` over every record.
    pub fn total_count(&self) -> f64 {
        self.records.iter().map(|r| r.count).sum()
    }
}
