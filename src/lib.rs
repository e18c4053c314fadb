//! Payroll liquidation consolidator.
//!
//! This crate parses fixed-width payroll liquidation reports into concept and
//! net-total records, joins them with an employee master table and projects
//! the result into two spreadsheet-ready sheets.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod parsing;
pub mod pipeline;
pub mod reconcile;
