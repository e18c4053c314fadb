//! Configuration loading and management for the payroll consolidator.
//!
//! This module provides functionality to load the report layout, master data
//! settings and result sheet tables from a YAML file. Every value has a
//! built-in default matching the standard liquidation export, so the file is
//! optional.
//!
//! # Example
//!
//! ```no_run
//! use payroll_consolidator::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default.yaml").unwrap();
//! println!("Net totals sheet: {}", config.config().sheets.net_totals.name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ColumnRange, ColumnSource, ColumnSpec, ConceptLayout, ConsolidationConfig, MasterConfig,
    NetTotalLayout, OutputConfig, ReportField, ReportLayout, SalaryConfig, SheetLayout,
    SheetsConfig,
};
