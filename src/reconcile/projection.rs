//! Output projection: joined rows to a result sheet.
//!
//! Each result sheet is described by a declarative column table (see
//! [`SheetLayout`]). Projection only selects, renames and orders; it never
//! computes.

use tracing::debug;

use crate::config::{ColumnSource, ReportField, SheetLayout};
use crate::models::{CellValue, MasterTable, ReportRecord, ResultSheet};

use super::join::JoinedRow;
use super::salary::SalarySource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolvedSource {
    Report(ReportField),
    Master(usize),
    Salary,
}

/// A sheet layout resolved against one master table.
///
/// Master columns absent from the table are dropped here, so the sheet
/// never carries a synthesized empty column. The salary column is always
/// kept.
#[derive(Debug, Clone)]
pub struct SheetProjection {
    name: String,
    columns: Vec<(String, ResolvedSource)>,
}

impl SheetProjection {
    /// Resolves `layout` against the columns of `table`.
    pub fn resolve(layout: &SheetLayout, table: &MasterTable) -> Self {
        let columns = layout
            .columns
            .iter()
            .filter_map(|spec| {
                let source = match &spec.source {
                    ColumnSource::Report { field } => ResolvedSource::Report(*field),
                    ColumnSource::Salary => ResolvedSource::Salary,
                    ColumnSource::Master { column } => match table.column_index(column.trim()) {
                        Some(index) => ResolvedSource::Master(index),
                        None => {
                            debug!(
                                sheet = %layout.name,
                                column = %column,
                                "Master column absent; omitting output column"
                            );
                            return None;
                        }
                    },
                };
                Some((spec.output.clone(), source))
            })
            .collect();

        Self {
            name: layout.name.clone(),
            columns,
        }
    }

    /// Output column names, in order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Projects joined rows into a result sheet.
    pub fn apply<R: ReportRecord>(
        &self,
        rows: &[JoinedRow<'_, R>],
        salary: &SalarySource,
    ) -> ResultSheet {
        let rows = rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|(_, source)| match source {
                        ResolvedSource::Report(field) => row.record.field(*field),
                        ResolvedSource::Master(index) => row
                            .master
                            .map_or(CellValue::Empty, |master| master.get(*index).clone()),
                        ResolvedSource::Salary => salary.value(row.master),
                    })
                    .collect()
            })
            .collect();

        ResultSheet {
            name: self.name.clone(),
            columns: self.column_names(),
            rows,
        }
    }
}
