//! Result sheets handed to the spreadsheet writer.

use super::CellValue;

/// A named table with a fixed column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSheet {
    /// Sheet name (e.g. `Netos`).
    pub name: String,
    /// Output column names in order.
    pub columns: Vec<String>,
    /// Rows, each aligned with `columns`.
    pub rows: Vec<Vec<CellValue>>,
}

impl ResultSheet {
    /// Index of the output column named `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    ///
    /// Returns `None` if the sheet has no such column.
    pub fn column(&self, name: &str) -> Option<Vec<&CellValue>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the sheet has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
