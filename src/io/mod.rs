//! File input and output.
//!
//! Everything that touches the filesystem lives here: decoding the report
//! bytes, reading the master table and writing the result sheets. The
//! consolidation itself never does I/O.

mod master;
mod report;
mod writer;

pub use master::{MasterFormat, cell_from_data, parse_csv, read_master};
pub use report::{ReportEncoding, read_report};
pub use writer::{OutputFormat, csv_sheet_path, render_csv, render_workbook, write_sheets};
