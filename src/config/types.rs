//! Configuration types for report layout and consolidation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML. Every struct implements [`Default`] with the
//! layout of the standard liquidation export, so a partial YAML file only
//! needs to name the values it changes.

use serde::{Deserialize, Serialize};

/// A half-open character range `[start, end)` within a report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRange {
    /// First character offset (inclusive).
    pub start: usize,
    /// Last character offset (exclusive).
    pub end: usize,
}

impl ColumnRange {
    /// Creates a new range.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Layout of payroll concept lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConceptLayout {
    /// Spelled-out currency footer; lines containing it are never concepts.
    pub boilerplate: String,
    /// A trimmed line must be strictly longer than this to be a concept.
    pub min_length: usize,
    /// Accepted code prefixes, checked with `starts_with`.
    pub code_prefixes: Vec<String>,
    /// Character offset where the label stops (the quantity column starts).
    pub label_end: usize,
    /// Quantity column.
    pub quantity: ColumnRange,
    /// Value column.
    pub value: ColumnRange,
    /// Drop lines carrying the net-total marker from the concept pass.
    pub exclude_net_totals: bool,
}

impl Default for ConceptLayout {
    fn default() -> Self {
        Self {
            boilerplate: "PESOS CON 00/100".to_string(),
            min_length: 30,
            code_prefixes: ["Y", "Z", "9", "2", "/5"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            label_end: 50,
            quantity: ColumnRange::new(50, 70),
            value: ColumnRange::new(69, 89),
            exclude_net_totals: false,
        }
    }
}

/// Layout of net-total summary lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetTotalLayout {
    /// Literal marker identifying a net-total line.
    pub marker: String,
    /// Label column.
    pub label: ColumnRange,
    /// Width of the value field, measured back from the end of the line.
    pub value_width: usize,
}

impl Default for NetTotalLayout {
    fn default() -> Self {
        Self {
            marker: "Total General".to_string(),
            label: ColumnRange::new(0, 32),
            value_width: 20,
        }
    }
}

/// Layout of the liquidation report as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    /// WHATWG encoding label of the report bytes (`latin1` is ISO-8859-1).
    pub encoding: String,
    /// Personnel-number header labels. Several spellings are listed because
    /// the legacy export drops accented characters.
    pub header_labels: Vec<String>,
    /// Concept line layout.
    pub concept: ConceptLayout,
    /// Net-total line layout.
    pub net_total: NetTotalLayout,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            encoding: "latin1".to_string(),
            header_labels: vec!["Núm. Personal".to_string(), "Nm. Personal".to_string()],
            concept: ConceptLayout::default(),
            net_total: NetTotalLayout::default(),
        }
    }
}

/// Salary column resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryConfig {
    /// Canonical salary column name. A master column with exactly this name
    /// is used as-is.
    pub canonical: String,
    /// Ordered salary-like stems matched against normalized column names.
    pub candidates: Vec<String>,
}

impl Default for SalaryConfig {
    fn default() -> Self {
        Self {
            canonical: "SALARIO".to_string(),
            candidates: [
                "importe",
                "importebase",
                "salario",
                "salariobase",
                "sueldo",
                "sueldobase",
                "basico",
                "basicos",
                "basicointegral",
                "remuneracion",
                "remuneraciones",
                "valorbase",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

/// Master data settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasterConfig {
    /// Column holding the personnel number (matched after trimming).
    pub join_key: String,
    /// Salary resolution.
    pub salary: SalaryConfig,
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            join_key: "Nº pers.".to_string(),
            salary: SalaryConfig::default(),
        }
    }
}

/// A field taken from a parsed report record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportField {
    /// Concept code.
    Code,
    /// Concept or net-total label.
    Label,
    /// Concept quantity.
    Quantity,
    /// Concept or net-total value.
    Value,
    /// Propagated personnel number.
    EmployeeId,
}

/// Where an output column takes its values from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSource {
    /// A field of the parsed report record.
    Report {
        /// The record field.
        field: ReportField,
    },
    /// A master data column, omitted from the output when absent.
    Master {
        /// The trimmed master column name.
        column: String,
    },
    /// The resolved salary, always present.
    Salary,
}

/// One output column: its source and its output name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column header in the result sheet.
    pub output: String,
    /// Where the values come from.
    pub source: ColumnSource,
}

impl ColumnSpec {
    /// Column fed by a report record field.
    pub fn report(output: &str, field: ReportField) -> Self {
        Self {
            output: output.to_string(),
            source: ColumnSource::Report { field },
        }
    }

    /// Column fed by a master data column.
    pub fn master(output: &str, column: &str) -> Self {
        Self {
            output: output.to_string(),
            source: ColumnSource::Master {
                column: column.to_string(),
            },
        }
    }

    /// Column fed by the resolved salary.
    pub fn salary(output: &str) -> Self {
        Self {
            output: output.to_string(),
            source: ColumnSource::Salary,
        }
    }
}

/// A result sheet: its name and its ordered column table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Sheet name.
    pub name: String,
    /// Columns in output order.
    pub columns: Vec<ColumnSpec>,
}

/// The two result sheets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Net totals sheet.
    pub net_totals: SheetLayout,
    /// Converted concepts sheet.
    pub concepts: SheetLayout,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            net_totals: SheetLayout {
                name: "Netos".to_string(),
                columns: vec![
                    ColumnSpec::report("NETO", ReportField::Label),
                    ColumnSpec::report("Valor", ReportField::Value),
                    ColumnSpec::report("SAP", ReportField::EmployeeId),
                    ColumnSpec::master("CÉDULA", "Número ID"),
                    ColumnSpec::master("NOMBRE", "Número de personal"),
                    ColumnSpec::master("REGIONAL", "División de personal"),
                    ColumnSpec::master("CE_COSTE", "Ce.coste"),
                    ColumnSpec::salary("SALARIO"),
                    ColumnSpec::master("F. ING", "Fecha"),
                    ColumnSpec::master("CARGO", "Función"),
                    ColumnSpec::master("NIVEL", "Área de personal"),
                ],
            },
            concepts: SheetLayout {
                name: "Preno_Convertida".to_string(),
                columns: vec![
                    ColumnSpec::report("CÓDIGO", ReportField::Code),
                    ColumnSpec::report("CONCEPTO", ReportField::Label),
                    ColumnSpec::report("CANTIDAD", ReportField::Quantity),
                    ColumnSpec::report("VALOR", ReportField::Value),
                    ColumnSpec::report("SAP", ReportField::EmployeeId),
                    ColumnSpec::master("CÉDULA", "Número ID"),
                    ColumnSpec::master("NOMBRE", "Número de personal"),
                    ColumnSpec::salary("SALARIO"),
                    ColumnSpec::master("F. INGRESO", "Fecha"),
                    ColumnSpec::master("CARGO", "Función"),
                    ColumnSpec::master("NIVEL", "Área de personal"),
                ],
            },
        }
    }
}

/// Output naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix of the timestamped default output file name.
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_prefix: "Nomina_Consolidado".to_string(),
        }
    }
}

/// The complete consolidation configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Report layout.
    pub report: ReportLayout,
    /// Master data settings.
    pub master: MasterConfig,
    /// Result sheet tables.
    pub sheets: SheetsConfig,
    /// Output naming.
    pub output: OutputConfig,
}
