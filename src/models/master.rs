//! Master employee table.
//!
//! The master table is owned by an external source; the consolidator only
//! reads it. Column names are trimmed on construction so that every later
//! lookup (join key, salary, projection) works on clean names.

use rust_decimal::prelude::ToPrimitive;

use super::CellValue;

/// One row of the master table, cells aligned with [`MasterTable::columns`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterRecord {
    /// Cells in column order.
    pub cells: Vec<CellValue>,
}

impl MasterRecord {
    /// Creates a record from its cells.
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Returns the cell at `index`, or `Empty` for a short row.
    pub fn get(&self, index: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.cells.get(index).unwrap_or(EMPTY)
    }
}

/// The employee master table.
///
/// # Example
///
/// ```
/// use payroll_consolidator::models::{CellValue, MasterRecord, MasterTable};
///
/// let table = MasterTable::new(
///     vec![" Nº pers. ".to_string(), "Número ID".to_string()],
///     vec![MasterRecord::new(vec![CellValue::infer("12345"), CellValue::infer("80123456")])],
/// );
/// assert_eq!(table.column_index("Nº pers."), Some(0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterTable {
    columns: Vec<String>,
    rows: Vec<MasterRecord>,
}

impl MasterTable {
    /// Creates a table, trimming every column name.
    pub fn new(columns: Vec<String>, rows: Vec<MasterRecord>) -> Self {
        let columns = columns.into_iter().map(|c| c.trim().to_string()).collect();
        Self { columns, rows }
    }

    /// Trimmed column names in original order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in original order.
    pub fn rows(&self) -> &[MasterRecord] {
        &self.rows
    }

    /// Index of the first column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Coerces a master join-key cell to a personnel number.
///
/// Integral non-negative numbers and digit text (optionally written as
/// `12345.0`, as spreadsheets tend to export whole numbers) become the key;
/// anything else never matches a report identifier.
pub fn coerce_key(cell: &CellValue) -> Option<u64> {
    match cell {
        CellValue::Number(number) if number.fract().is_zero() => number.to_u64(),
        CellValue::Text(text) => {
            let text = text.trim();
            let digits = text
                .strip_suffix(".0")
                .or_else(|| text.strip_suffix(",0"))
                .unwrap_or(text);
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                digits.parse().ok()
            } else {
                None
            }
        }
        _ => None,
    }
}
