//! Run summary and non-fatal warnings.
//!
//! The summary is an interface-boundary artifact: it carries a run id and a
//! generation timestamp, which never reach the result sheets themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A non-fatal condition noticed during a run.
///
/// # Example
///
/// ```
/// use payroll_consolidator::models::RunWarning;
///
/// let warning = RunWarning::SalaryUnresolved;
/// assert_eq!(warning.code(), "SALARY_UNRESOLVED");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunWarning {
    /// Records that precede the first personnel header and carry no identifier.
    MissingIdentifier {
        /// Number of affected records.
        count: usize,
    },
    /// No master column resembles a salary; the salary column is all-null.
    SalaryUnresolved,
    /// Several master rows share a personnel number; joined rows fan out.
    DuplicateMasterKey {
        /// The duplicated personnel number.
        key: u64,
        /// How many master rows carry it.
        rows: usize,
    },
    /// Records without a master match; their master fields are null.
    UnmatchedRecords {
        /// Sheet the records belong to.
        sheet: String,
        /// Number of unmatched records.
        count: usize,
    },
}

impl RunWarning {
    /// Stable warning code.
    pub fn code(&self) -> &'static str {
        match self {
            RunWarning::MissingIdentifier { .. } => "MISSING_IDENTIFIER",
            RunWarning::SalaryUnresolved => "SALARY_UNRESOLVED",
            RunWarning::DuplicateMasterKey { .. } => "DUPLICATE_MASTER_KEY",
            RunWarning::UnmatchedRecords { .. } => "UNMATCHED_RECORDS",
        }
    }
}

/// Counts and diagnostics of one consolidation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run was performed.
    pub generated_at: DateTime<Utc>,
    /// Concept records extracted from the report.
    pub concept_records: usize,
    /// Net-total records extracted from the report.
    pub net_total_records: usize,
    /// Rows in the master table.
    pub master_records: usize,
    /// Concept records without a master match.
    pub unmatched_concepts: usize,
    /// Net-total records without a master match.
    pub unmatched_net_totals: usize,
    /// Master column the salary was taken from, if any.
    pub salary_source: Option<String>,
    /// Where the result was written, once written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// Non-fatal conditions.
    pub warnings: Vec<RunWarning>,
}
