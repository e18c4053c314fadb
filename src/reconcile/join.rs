//! Left outer join of report records against master data.
//!
//! Every report record survives the join. A record whose identifier has no
//! master row keeps empty master fields; a record whose identifier has
//! several master rows is emitted once per row (fan-out).

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::{ConsolidationError, ConsolidationResult};
use crate::models::{MasterRecord, MasterTable, ReportRecord, coerce_key};

/// Master rows indexed by their coerced join key.
#[derive(Debug)]
pub struct MasterIndex<'t> {
    table: &'t MasterTable,
    rows_by_key: HashMap<u64, Vec<usize>>,
}

impl<'t> MasterIndex<'t> {
    /// Indexes `table` on the `join_key` column.
    ///
    /// # Returns
    ///
    /// Returns the index, or `MissingJoinKey` listing the columns actually
    /// found when the key column does not exist. Key cells that are not
    /// personnel numbers are left out of the index and never match.
    pub fn build(table: &'t MasterTable, join_key: &str) -> ConsolidationResult<Self> {
        let key_column = table
            .column_index(join_key.trim())
            .ok_or_else(|| ConsolidationError::MissingJoinKey {
                column: join_key.to_string(),
                available: table.columns().to_vec(),
            })?;

        let mut rows_by_key: HashMap<u64, Vec<usize>> = HashMap::new();
        let mut unkeyed = 0usize;
        for (row, record) in table.rows().iter().enumerate() {
            match coerce_key(record.get(key_column)) {
                Some(key) => rows_by_key.entry(key).or_default().push(row),
                None => unkeyed += 1,
            }
        }

        debug!(
            join_key,
            keys = rows_by_key.len(),
            unkeyed_rows = unkeyed,
            "Indexed master data"
        );
        Ok(Self { table, rows_by_key })
    }

    /// Master rows whose key equals `employee_id`, in table order.
    pub fn matches(&self, employee_id: Option<u64>) -> Vec<&'t MasterRecord> {
        let table = self.table;
        employee_id
            .and_then(|id| self.rows_by_key.get(&id))
            .map(|rows| rows.iter().map(|&row| &table.rows()[row]).collect())
            .unwrap_or_default()
    }

    /// Number of master rows sharing `key`.
    pub fn row_count(&self, key: u64) -> usize {
        self.rows_by_key.get(&key).map_or(0, Vec::len)
    }
}

/// One output row of the join.
#[derive(Debug, Clone, Copy)]
pub struct JoinedRow<'a, R> {
    /// The report record.
    pub record: &'a R,
    /// The matched master row, `None` when unmatched.
    pub master: Option<&'a MasterRecord>,
}

/// The joined rows plus match statistics.
#[derive(Debug, Clone)]
pub struct JoinOutcome<'a, R> {
    /// Joined rows in report order, fanned out where keys repeat.
    pub rows: Vec<JoinedRow<'a, R>>,
    /// Report records with no master match.
    pub unmatched: usize,
    /// Keys that fanned out, with the number of master rows for each.
    pub fan_out: BTreeMap<u64, usize>,
}

/// Left-joins report records against the master index.
///
/// # Arguments
///
/// * `records` - Report records in file order
/// * `index` - Master rows indexed on the join key
///
/// # Returns
///
/// A `JoinOutcome` whose rows keep report order. Each record appears once
/// when it matches zero or one master rows, and once per match otherwise.
pub fn left_join<'a, R: ReportRecord>(
    records: &'a [R],
    index: &MasterIndex<'a>,
) -> JoinOutcome<'a, R> {
    let mut rows = Vec::with_capacity(records.len());
    let mut unmatched = 0;
    let mut fan_out = BTreeMap::new();

    for record in records {
        let matches = index.matches(record.employee_id());
        match matches.as_slice() {
            [] => {
                unmatched += 1;
                rows.push(JoinedRow {
                    record,
                    master: None,
                });
            }
            [single] => rows.push(JoinedRow {
                record,
                master: Some(*single),
            }),
            many => {
                if let Some(key) = record.employee_id() {
                    fan_out.insert(key, index.row_count(key));
                }
                rows.extend(many.iter().map(|master| JoinedRow {
                    record,
                    master: Some(*master),
                }));
            }
        }
    }

    JoinOutcome {
        rows,
        unmatched,
        fan_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellValue, NetTotalRecord};
    use rust_decimal::Decimal;

    fn create_test_table() -> MasterTable {
        MasterTable::new(
            vec![" Nº pers. ".to_string(), "Número ID".to_string()],
            vec![
                MasterRecord::new(vec![CellValue::infer("12345"), CellValue::infer("1010")]),
                MasterRecord::new(vec![CellValue::infer("67890"), CellValue::infer("2020")]),
                MasterRecord::new(vec![CellValue::infer("67890"), CellValue::infer("3030")]),
                MasterRecord::new(vec![CellValue::infer("n/a"), CellValue::infer("4040")]),
            ],
        )
    }

    fn create_test_net(employee_id: Option<u64>) -> NetTotalRecord {
        NetTotalRecord {
            label: "Total General:".to_string(),
            value: Decimal::from(100),
            employee_id,
            line_number: 1,
        }
    }

    #[test]
    fn test_missing_key_column_lists_available_columns() {
        let table = create_test_table();
        let error = MasterIndex::build(&table, "Legajo").unwrap_err();
        match error {
            ConsolidationError::MissingJoinKey { column, available } => {
                assert_eq!(column, "Legajo");
                assert_eq!(available, vec!["Nº pers.", "Número ID"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unmatched_and_unidentified_records_are_kept() {
        let table = create_test_table();
        let index = MasterIndex::build(&table, "Nº pers.").unwrap();
        let records = vec![create_test_net(Some(99999)), create_test_net(None)];
        let outcome = left_join(&records, &index);
        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.unmatched, 2);
        assert!(outcome.rows.iter().all(|row| row.master.is_none()));
    }

    #[test]
    fn test_duplicate_keys_fan_out_in_table_order() {
        let table = create_test_table();
        let index = MasterIndex::build(&table, "Nº pers.").unwrap();
        let records = vec![create_test_net(Some(12345)), create_test_net(Some(67890))];
        let outcome = left_join(&records, &index);

        let ids: Vec<&CellValue> = outcome
            .rows
            .iter()
            .map(|row| row.master.unwrap().get(1))
            .collect();
        assert_eq!(
            ids,
            vec![
                &CellValue::infer("1010"),
                &CellValue::infer("2020"),
                &CellValue::infer("3030"),
            ]
        );
        assert_eq!(outcome.unmatched, 0);
        assert_eq!(outcome.fan_out.get(&67890), Some(&2));
        assert!(!outcome.fan_out.contains_key(&12345));
    }

    #[test]
    fn test_non_numeric_keys_never_match() {
        let table = create_test_table();
        let index = MasterIndex::build(&table, "Nº pers.").unwrap();
        assert_eq!(index.row_count(0), 0);
        assert!(index.matches(None).is_empty());
    }
}
