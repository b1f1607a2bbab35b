use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use tracing::debug;

use super::{Cell, SheetTable, Workbook};
use crate::error::{PipelineError, SheetError};

/// A workbook file on disk. Format (xlsx, xls, xlsb, ods) is detected by calamine.
pub struct XlsxWorkbook {
    path: PathBuf,
    inner: Sheets<BufReader<File>>,
}

impl XlsxWorkbook {
    /// Opens the workbook at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::FileUnreadable`] if the file is missing or is
    /// not a spreadsheet calamine can decode.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let inner = open_workbook_auto(path).map_err(|e| PipelineError::FileUnreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), "Workbook opened");

        Ok(Self {
            path: path.to_path_buf(),
            inner,
        })
    }

    /// Path the workbook was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Workbook for XlsxWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.inner.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, SheetError> {
        let range = self
            .inner
            .worksheet_range(name)
            .map_err(|e| SheetError::SheetUnreadable {
                sheet: name.to_string(),
                reason: e.to_string(),
            })?;

        let (height, width) = range.get_size();
        debug!(sheet = name, height, width, "Sheet range read");

        let grid = range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();

        Ok(SheetTable::from_grid(grid))
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}
