//! Reconciliation of parsed report records with master data.
//!
//! This module joins report records to the master employee table, resolves
//! the salary column and projects the joined rows into the two result
//! sheets.

mod join;
mod projection;
mod salary;

pub use join::{JoinOutcome, JoinedRow, MasterIndex, left_join};
pub use projection::SheetProjection;
pub use salary::{SalaryResolver, SalarySource, normalize_column_name};
