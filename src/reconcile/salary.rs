//! Salary column resolution.
//!
//! Master data exports name their salary column inconsistently ("Salario
//! Base", "Sueldo básico ", "IMPORTE"). The resolver picks one column once per
//! run so that every output row carries a salary field.

use serde::{Deserialize, Serialize};

use crate::config::SalaryConfig;
use crate::models::{CellValue, MasterRecord};
use crate::parsing::to_number;

/// Normalizes a column name for salary matching.
///
/// Lowercases, folds the accented vowels `á é í ó ú` to their plain form and
/// drops every character outside `a-z0-9`.
///
/// # Example
///
/// ```
/// use payroll_consolidator::reconcile::normalize_column_name;
///
/// assert_eq!(normalize_column_name(" Sueldo Básico "), "sueldobasico");
/// assert_eq!(normalize_column_name("Nº pers."), "npers");
/// ```
pub fn normalize_column_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            other => other,
        })
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Where the salary field of a run comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SalarySource {
    /// A column already carries the canonical salary name; values pass
    /// through unchanged.
    Canonical {
        /// Column name.
        column: String,
        /// Column position in the master table.
        index: usize,
    },
    /// The first column whose normalized name contains a salary stem.
    Matched {
        /// Column name.
        column: String,
        /// Column position in the master table.
        index: usize,
        /// The stem that matched.
        stem: String,
    },
    /// No salary-like column exists; the salary field is empty.
    Unresolved,
}

impl SalarySource {
    /// The master column feeding the salary field, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            SalarySource::Canonical { column, .. } | SalarySource::Matched { column, .. } => {
                Some(column)
            }
            SalarySource::Unresolved => None,
        }
    }

    /// Returns the salary value for a joined row.
    ///
    /// Rows without a master match have an empty salary. Text taken from a
    /// matched column is read as a locale-formatted number; other values
    /// pass through.
    pub fn value(&self, master: Option<&MasterRecord>) -> CellValue {
        let Some(master) = master else {
            return CellValue::Empty;
        };
        match self {
            SalarySource::Canonical { index, .. } => master.get(*index).clone(),
            SalarySource::Matched { index, .. } => match master.get(*index) {
                CellValue::Text(text) => CellValue::Number(to_number(text)),
                other => other.clone(),
            },
            SalarySource::Unresolved => CellValue::Empty,
        }
    }
}

/// Chooses the salary column from a list of master column names.
#[derive(Debug, Clone)]
pub struct SalaryResolver {
    canonical: String,
    stems: Vec<String>,
}

impl SalaryResolver {
    /// Creates a resolver from the salary settings.
    pub fn new(config: &SalaryConfig) -> Self {
        Self {
            canonical: config.canonical.clone(),
            stems: config
                .candidates
                .iter()
                .map(|stem| normalize_column_name(stem))
                .filter(|stem| !stem.is_empty())
                .collect(),
        }
    }

    /// Resolves the salary source for the given (trimmed) column names.
    ///
    /// # Arguments
    ///
    /// * `columns` - Master column names in table order
    ///
    /// # Returns
    ///
    /// The canonical column if present. Otherwise the first column, in
    /// table order, whose normalized name contains any stem as a substring.
    /// Column order decides ties, not stem order or similarity.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_consolidator::config::SalaryConfig;
    /// use payroll_consolidator::reconcile::SalaryResolver;
    ///
    /// let resolver = SalaryResolver::new(&SalaryConfig::default());
    /// let columns = vec!["Salario Base".to_string(), "Importe Neto".to_string()];
    /// assert_eq!(resolver.resolve(&columns).column(), Some("Salario Base"));
    /// ```
    pub fn resolve(&self, columns: &[String]) -> SalarySource {
        if let Some(index) = columns.iter().position(|c| *c == self.canonical) {
            return SalarySource::Canonical {
                column: columns[index].clone(),
                index,
            };
        }

        for (index, column) in columns.iter().enumerate() {
            let normalized = normalize_column_name(column);
            if let Some(stem) = self.stems.iter().find(|stem| normalized.contains(stem.as_str())) {
                return SalarySource::Matched {
                    column: column.clone(),
                    index,
                    stem: stem.clone(),
                };
            }
        }

        SalarySource::Unresolved
    }
}
