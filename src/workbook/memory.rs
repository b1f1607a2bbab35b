use super::{Cell, SheetTable, Workbook};
use crate::error::SheetError;

/// A workbook whose sheets are supplied directly as cell grids.
///
/// The first row of each grid is the header row.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<(String, Vec<Vec<Cell>>)>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sheet, replacing any existing sheet with the same name.
    pub fn with_sheet(mut self, name: impl Into<String>, grid: Vec<Vec<Cell>>) -> Self {
        let name = name.into();
        self.sheets.retain(|(existing, _)| *existing != name);
        self.sheets.push((name, grid));
        self
    }
}

impl Workbook for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, SheetError> {
        self.sheets
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, grid)| SheetTable::from_grid(grid.clone()))
            .ok_or_else(|| SheetError::SheetUnreadable {
                sheet: name.to_string(),
                reason: "sheet not found".to_string(),
            })
    }
}
