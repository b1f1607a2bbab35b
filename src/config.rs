//! Pipeline configuration.
//!
//! Stored as a JSON object on disk; every field is optional and falls back
//! to its default:
//! ```json
//! {
//!   "workbook_path": "data/INCIDENCIA DELICTIVA NUEVA.xlsx",
//!   "years": [2020, 2021, 2022, 2023, 2024],
//!   "gender_sheet": "Hoja1",
//!   "top_stations": 10,
//!   "top_boroughs": 15
//! }
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::analyzers::aggregate::{TOP_BOROUGHS, TOP_STATIONS};
use crate::schema::SchemaTable;

/// Environment variable that overrides [`PipelineConfig::workbook_path`].
pub const WORKBOOK_ENV: &str = "INCIDENT_WORKBOOK";

pub const DEFAULT_WORKBOOK: &str = "INCIDENCIA DELICTIVA NUEVA.xlsx";
pub const DEFAULT_GENDER_SHEET: &str = "Hoja1";
pub const DEFAULT_YEARS: [i32; 5] = [2020, 2021, 2022, 2023, 2024];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub workbook_path: PathBuf,
    /// Year sheets to read, in order. Each year's sheet is named after it.
    pub years: Vec<i32>,
    pub gender_sheet: String,
    pub top_stations: usize,
    pub top_boroughs: usize,
    /// Column roles for the year sheets.
    pub schema: SchemaTable,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workbook_path: PathBuf::from(DEFAULT_WORKBOOK),
            years: DEFAULT_YEARS.to_vec(),
            gender_sheet: DEFAULT_GENDER_SHEET.to_string(),
            top_stations: TOP_STATIONS,
            top_boroughs: TOP_BOROUGHS,
            schema: SchemaTable::year_sheet(),
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config '{}'", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config '{}'", path.display()))?;
        Ok(config)
    }

    /// Replaces the workbook path when `workbook` is set.
    pub fn with_workbook(mut self, workbook: Option<PathBuf>) -> Self {
        if let Some(path) = workbook {
            self.workbook_path = path;
        }
        self
    }

    /// Applies [`WORKBOOK_ENV`] if it is set and non-empty.
    pub fn with_env_overrides(self) -> Self {
        let workbook = std::env::var(WORKBOOK_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        self.with_workbook(workbook)
    }

    pub fn validate(&self) -> Result<()> {
        if self.years.is_empty() {
            bail!("at least one year sheet must be configured");
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.years.iter().find(|y| !seen.insert(**y)) {
            bail!("year {dup} is configured more than once");
        }

        if self.top_stations == 0 || self.top_boroughs == 0 {
            bail!("ranking sizes must be at least 1");
        }

        if self.gender_sheet.trim().is_empty() {
            bail!("gender sheet name must not be empty");
        }

        Ok(())
    }
}
