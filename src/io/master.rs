//! Master data readers.
//!
//! The reader is chosen by file extension: delimited text goes through the
//! `csv` crate, workbooks through `calamine`. Either way the first row is the
//! header and the table keeps cell types (numbers, text, dates, booleans).

use std::fs;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use tracing::info;

use crate::error::{ConsolidationError, ConsolidationResult};
use crate::models::{CellValue, MasterRecord, MasterTable};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Supported master data formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterFormat {
    /// Comma-separated UTF-8 text.
    Csv,
    /// Any workbook calamine opens: xlsx, xlsm, xlsb, xls, ods.
    Workbook,
}

impl MasterFormat {
    /// Picks the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> ConsolidationResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(MasterFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(MasterFormat::Workbook),
            _ => Err(ConsolidationError::UnsupportedMasterFormat {
                path: path.display().to_string(),
                extension,
            }),
        }
    }
}

/// Reads the master table at `path`.
///
/// # Returns
///
/// The table with trimmed column names, or an error if:
/// - The extension is not supported (`UnsupportedMasterFormat`)
/// - The file cannot be opened or decoded (`MasterDataRead`)
/// - The workbook has no worksheet (`MasterSheetMissing`)
pub fn read_master<P: AsRef<Path>>(path: P) -> ConsolidationResult<MasterTable> {
    let path = path.as_ref();
    let table = match MasterFormat::from_path(path)? {
        MasterFormat::Csv => {
            let bytes = fs::read(path).map_err(|e| read_error(path, e))?;
            parse_csv(&bytes).map_err(|e| read_error(path, e))?
        }
        MasterFormat::Workbook => read_workbook(path)?,
    };

    info!(
        path = %path.display(),
        rows = table.rows().len(),
        columns = table.columns().len(),
        "Loaded master data"
    );
    Ok(table)
}

fn read_error(path: &Path, error: impl ToString) -> ConsolidationError {
    ConsolidationError::MasterDataRead {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

/// Parses CSV master data from memory.
///
/// A leading UTF-8 byte-order mark is skipped. Rows may be shorter or longer
/// than the header; missing cells read as empty.
///
/// # Example
///
/// ```
/// use payroll_consolidator::io::parse_csv;
/// use payroll_consolidator::models::CellValue;
/// use rust_decimal::Decimal;
///
/// let table = parse_csv("Nº pers.,Nombre\n12345,Ana\n".as_bytes())?;
/// assert_eq!(table.columns(), &["Nº pers.".to_string(), "Nombre".to_string()]);
/// assert_eq!(table.rows()[0].get(0), &CellValue::Number(Decimal::from(12345)));
/// # Ok::<(), csv::Error>(())
/// ```
pub fn parse_csv(bytes: &[u8]) -> Result<MasterTable, csv::Error> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|record| {
            record.map(|record| MasterRecord::new(record.iter().map(CellValue::infer).collect()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MasterTable::new(columns, rows))
}

fn read_workbook(path: &Path) -> ConsolidationResult<MasterTable> {
    let mut workbook = open_workbook_auto(path).map_err(|e| read_error(path, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConsolidationError::MasterSheetMissing {
            path: path.display().to_string(),
        })?
        .map_err(|e| read_error(path, e))?;

    let mut rows = range.rows();
    let columns: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();
    let records = rows
        .map(|row| MasterRecord::new(row.iter().map(cell_from_data).collect()))
        .collect();

    Ok(MasterTable::new(columns, records))
}

/// Converts a workbook cell to a [`CellValue`].
pub fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(text) => {
            if text.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(text.clone())
            }
        }
        Data::Int(value) => CellValue::Number(Decimal::from(*value)),
        Data::Float(value) => Decimal::from_f64(*value).map_or(CellValue::Empty, CellValue::Number),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => value
            .as_datetime()
            .map_or(CellValue::Empty, |dt| CellValue::Date(dt.date())),
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
        Data::Error(error) => CellValue::Text(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            MasterFormat::from_path(Path::new("MASTERDATA.CSV")).unwrap(),
            MasterFormat::Csv
        );
        for name in ["m.xlsx", "m.xlsb", "m.xls", "m.xlsm", "m.ods"] {
            assert_eq!(
                MasterFormat::from_path(Path::new(name)).unwrap(),
                MasterFormat::Workbook
            );
        }
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let result = MasterFormat::from_path(Path::new("master.json"));
        match result {
            Err(ConsolidationError::UnsupportedMasterFormat { extension, .. }) => {
                assert_eq!(extension, "json");
            }
            other => panic!("Expected UnsupportedMasterFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_csv_with_bom_and_padded_headers() {
        let csv = "\u{FEFF} Nº pers. ,Salario Base,Fecha\n12345,\"1.300.000\",2020-01-15\n";
        let table = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.column_index("Nº pers."), Some(0));
        let row = &table.rows()[0];
        assert_eq!(row.get(1), &CellValue::Text("1.300.000".to_string()));
        assert_eq!(row.get(2), &CellValue::Text("2020-01-15".to_string()));
    }

    #[test]
    fn test_csv_short_rows_read_as_empty() {
        let table = parse_csv(b"a,b,c\n1\n").unwrap();
        assert_eq!(table.rows()[0].get(2), &CellValue::Empty);
    }

    #[test]
    fn test_read_master_csv_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all("Nº pers.,Número ID\n12345,1010\n".as_bytes())
            .unwrap();
        let table = read_master(file.path()).unwrap();
        assert_eq!(table.rows().len(), 1);
    }

    #[test]
    fn test_corrupt_workbook_is_a_read_error() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"not a zip archive").unwrap();
        let result = read_master(file.path());
        assert!(matches!(result, Err(ConsolidationError::MasterDataRead { .. })));
    }

    fn create_test_workbook() -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, " Nº pers. ").unwrap();
        sheet.write_string(0, 1, "Sueldo Básico").unwrap();
        sheet.write_number(1, 0, 12345.0).unwrap();
        sheet.write_string(1, 1, "1.300.000").unwrap();
        workbook.save(file.path()).unwrap();
        file
    }

    #[test]
    fn test_read_master_workbook_from_disk() {
        let file = create_test_workbook();
        let table = read_master(file.path()).unwrap();

        assert_eq!(table.columns().to_vec(), vec!["Nº pers.", "Sueldo Básico"]);
        assert_eq!(table.rows().len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.get(0), &CellValue::Number(Decimal::from(12345)));
        assert_eq!(row.get(1), &CellValue::Text("1.300.000".to_string()));

        let index = crate::reconcile::MasterIndex::build(&table, "Nº pers.").unwrap();
        assert_eq!(index.matches(Some(12345)).len(), 1);
    }

    #[test]
    fn test_workbook_cells_keep_types() {
        assert_eq!(
            cell_from_data(&Data::Float(1300000.0)),
            CellValue::Number(Decimal::from(1300000))
        );
        assert_eq!(cell_from_data(&Data::Int(7)), CellValue::Number(Decimal::from(7)));
        assert_eq!(cell_from_data(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(cell_from_data(&Data::String("  ".to_string())), CellValue::Empty);
    }
}
