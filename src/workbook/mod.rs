//! Sheet-level access to a spreadsheet workbook.
//!
//! [`Workbook`] is the seam the loaders read through. [`XlsxWorkbook`] reads
//! files on disk with calamine; [`MemoryWorkbook`] holds sheets built in code.

mod cell;
mod memory;
mod xlsx;

pub use cell::Cell;
pub use memory::MemoryWorkbook;
pub use xlsx::XlsxWorkbook;

use crate::error::SheetError;

/// A sheet split into its header row and the data rows below it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl SheetTable {
    /// Uses the first row as headers. An empty grid yields no headers and no rows.
    pub fn from_grid(mut grid: Vec<Vec<Cell>>) -> Self {
        if grid.is_empty() {
            return Self::default();
        }

        let rows = grid.split_off(1);
        let headers = grid
            .remove(0)
            .iter()
            .map(|cell| cell.as_text().unwrap_or_default())
            .collect();

        Self { headers, rows }
    }
}

pub trait Workbook {
    fn sheet_names(&self) -> Vec<String>;

    /// Reads one sheet by name.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::SheetUnreadable`] if the sheet is absent or its
    /// contents cannot be decoded.
    fn read_sheet(&mut self, name: &str) -> Result<SheetTable, SheetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_grid_splits_header_row() {
        let table = SheetTable::from_grid(vec![
            vec![Cell::from("Estación"), Cell::Number(2021.0)],
            vec![Cell::from("Zócalo"), Cell::Number(4.0)],
        ]);

        assert_eq!(table.headers, vec!["Estación".to_string(), "2021".to_string()]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][1], Cell::Number(4.0));
    }

    #[test]
    fn test_from_grid_empty() {
        let table = SheetTable::from_grid(vec![]);
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_from_grid_blank_header_cell() {
        let table = SheetTable::from_grid(vec![vec![Cell::Empty, Cell::from("robos")]]);
        assert_eq!(table.headers, vec![String::new(), "robos".to_string()]);
        assert!(table.rows.is_empty());
    }
}
