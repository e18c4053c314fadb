//! Result writers.
//!
//! Both writers render every sheet fully in memory before touching the
//! filesystem, so a failure while rendering leaves no output behind. A CSV
//! pair that fails on its second file removes the first one.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet, XlsxError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ConsolidationError, ConsolidationResult};
use crate::models::{CellValue, ResultSheet};

/// How the result sheets are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One workbook with a worksheet per result sheet.
    #[default]
    Xlsx,
    /// One CSV file per result sheet, named `<stem>_<sheet>.csv`.
    Csv,
}

impl OutputFormat {
    /// File extension of the primary output.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Writes the result sheets to `path`.
///
/// # Returns
///
/// The paths actually written: the workbook itself, or one CSV file per
/// sheet next to `path`. Fails with `OutputWrite` if rendering or writing
/// fails.
pub fn write_sheets(
    path: &Path,
    format: OutputFormat,
    sheets: &[&ResultSheet],
) -> ConsolidationResult<Vec<PathBuf>> {
    let written = match format {
        OutputFormat::Xlsx => {
            let buffer = render_workbook(sheets).map_err(|e| write_error(path, e))?;
            fs::write(path, buffer).map_err(|e| write_error(path, e))?;
            vec![path.to_path_buf()]
        }
        OutputFormat::Csv => {
            let rendered = sheets
                .iter()
                .map(|sheet| {
                    let target = csv_sheet_path(path, &sheet.name);
                    render_csv(sheet)
                        .map(|buffer| (target, buffer))
                        .map_err(|e| write_error(path, e))
                })
                .collect::<ConsolidationResult<Vec<_>>>()?;
            let mut written: Vec<PathBuf> = Vec::with_capacity(rendered.len());
            for (target, buffer) in rendered {
                if let Err(e) = fs::write(&target, buffer) {
                    remove_written(&written);
                    return Err(write_error(&target, e));
                }
                written.push(target);
            }
            written
        }
    };

    for path in &written {
        info!(path = %path.display(), "Wrote consolidated output");
    }
    Ok(written)
}

/// Removes the files of a CSV pair that failed halfway.
fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "Failed to remove partial output");
        }
    }
}

fn write_error(path: &Path, error: impl ToString) -> ConsolidationError {
    ConsolidationError::OutputWrite {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

/// Path of the CSV file holding `sheet` for the output `path`.
///
/// # Example
///
/// ```
/// use payroll_consolidator::io::csv_sheet_path;
/// use std::path::Path;
///
/// let path = csv_sheet_path(Path::new("out/Nomina.xlsx"), "Netos");
/// assert_eq!(path, Path::new("out/Nomina_Netos.csv"));
/// ```
pub fn csv_sheet_path(path: &Path, sheet: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}_{}.csv", stem, sheet))
}

/// Renders the sheets into an in-memory XLSX workbook.
pub fn render_workbook(sheets: &[&ResultSheet]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date = Format::new().set_num_format("yyyy-mm-dd");

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        for (col, name) in sheet.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, name, &header)?;
        }
        for (row_index, row) in sheet.rows.iter().enumerate() {
            let row_number = (row_index + 1) as u32;
            for (col, cell) in row.iter().enumerate() {
                write_cell(worksheet, row_number, col as u16, cell, &date)?;
            }
        }
    }

    workbook.save_to_buffer()
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    date: &Format,
) -> Result<(), XlsxError> {
    match cell {
        CellValue::Empty => {}
        CellValue::Text(text) => {
            worksheet.write_string(row, col, text)?;
        }
        CellValue::Number(number) => match number.to_f64() {
            Some(value) => {
                worksheet.write_number(row, col, value)?;
            }
            None => {
                worksheet.write_string(row, col, number.to_string())?;
            }
        },
        CellValue::Bool(value) => {
            worksheet.write_boolean(row, col, *value)?;
        }
        CellValue::Date(value) => {
            let year = u16::try_from(value.year()).unwrap_or(0);
            match ExcelDateTime::from_ymd(year, value.month() as u8, value.day() as u8) {
                Ok(datetime) => {
                    worksheet.write_datetime_with_format(row, col, &datetime, date)?;
                }
                // Outside Excel's date range.
                Err(_) => {
                    worksheet.write_string(row, col, cell.to_string())?;
                }
            }
        }
    }
    Ok(())
}

/// Renders one sheet as CSV: a header row, then one line per row.
pub fn render_csv(sheet: &ResultSheet) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&sheet.columns)?;
    for row in &sheet.rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
