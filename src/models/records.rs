//! Records recovered from the liquidation report.
//!
//! This module defines the raw [`ReportLine`], the two parsed record kinds
//! ([`ConceptRecord`] and [`NetTotalRecord`]) and the [`ReportRecord`] trait
//! through which the join and the projection read them generically.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ReportField;

use super::CellValue;

/// A single non-blank line of the source report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    /// 1-based line number in the source file.
    pub line_number: usize,
    /// Line text with carriage returns removed.
    pub text: String,
}

/// One payroll line item.
///
/// # Example
///
/// ```
/// use payroll_consolidator::models::ConceptRecord;
/// use rust_decimal::Decimal;
///
/// let record = ConceptRecord {
///     code: "Y200".to_string(),
///     label: "Auxilio de Transporte".to_string(),
///     quantity: Decimal::from(30),
///     value: Decimal::from(140606),
///     employee_id: Some(12345),
///     line_number: 7,
/// };
/// assert!(record.code.starts_with('Y'));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptRecord {
    /// Class code (e.g. `Y200`, `/560`, `9100`).
    pub code: String,
    /// Concept description, cut at the quantity column.
    pub label: String,
    /// Quantity column, zero when blank or unparsable.
    pub quantity: Decimal,
    /// Signed value column, zero when blank or unparsable.
    pub value: Decimal,
    /// Personnel number in force on this line.
    pub employee_id: Option<u64>,
    /// Source line number.
    pub line_number: usize,
}

/// One net-pay summary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetTotalRecord {
    /// Fixed descriptive text (e.g. `Total General:`).
    pub label: String,
    /// Net amount, zero when blank or unparsable.
    pub value: Decimal,
    /// Personnel number in force on this line.
    pub employee_id: Option<u64>,
    /// Source line number.
    pub line_number: usize,
}

/// Read access to a parsed report record by field.
pub trait ReportRecord {
    /// The personnel number used as join key.
    fn employee_id(&self) -> Option<u64>;

    /// The value of `field`, or `Empty` when this record kind lacks it.
    fn field(&self, field: ReportField) -> CellValue;
}

impl ReportRecord for ConceptRecord {
    fn employee_id(&self) -> Option<u64> {
        self.employee_id
    }

    fn field(&self, field: ReportField) -> CellValue {
        match field {
            ReportField::Code => CellValue::Text(self.code.clone()),
            ReportField::Label => CellValue::Text(self.label.clone()),
            ReportField::Quantity => CellValue::Number(self.quantity),
            ReportField::Value => CellValue::Number(self.value),
            ReportField::EmployeeId => self.employee_id.into(),
        }
    }
}

impl ReportRecord for NetTotalRecord {
    fn employee_id(&self) -> Option<u64> {
        self.employee_id
    }

    fn field(&self, field: ReportField) -> CellValue {
        match field {
            ReportField::Label => CellValue::Text(self.label.clone()),
            ReportField::Value => CellValue::Number(self.value),
            ReportField::EmployeeId => self.employee_id.into(),
            ReportField::Code | ReportField::Quantity => CellValue::Empty,
        }
    }
}

/// Both record sets extracted from one report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReport {
    /// Concept records in file order.
    pub concepts: Vec<ConceptRecord>,
    /// Net-total records in file order.
    pub net_totals: Vec<NetTotalRecord>,
}

impl ParsedReport {
    /// True when neither record set has a row.
    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty() && self.net_totals.is_empty()
    }
}
