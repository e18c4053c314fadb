//! Core data models for the payroll consolidator.
//!
//! This module contains the records passed between pipeline stages: raw
//! report lines, parsed concept and net-total records, the master table and
//! the result sheets.

mod cell;
mod master;
mod records;
mod sheet;
mod summary;

pub use cell::CellValue;
pub use master::{MasterRecord, MasterTable, coerce_key};
pub use records::{ConceptRecord, NetTotalRecord, ParsedReport, ReportLine, ReportRecord};
pub use sheet::ResultSheet;
pub use summary::{RunSummary, RunWarning};
