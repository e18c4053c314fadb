//! The consolidation pipeline.
//!
//! [`Consolidator::consolidate`] is the pure core: decoded report text and a
//! master table in, two result sheets and a run summary out. It does no I/O.
//! [`Consolidator::run`] wraps it with the file readers and writers.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{ConfigLoader, ConsolidationConfig, SheetLayout};
use crate::error::{ConsolidationError, ConsolidationResult};
use crate::io::{OutputFormat, read_master, read_report, write_sheets};
use crate::models::{MasterTable, ParsedReport, ReportRecord, ResultSheet, RunSummary, RunWarning};
use crate::parsing::ReportParser;
use crate::reconcile::{
    JoinOutcome, MasterIndex, SalaryResolver, SalarySource, SheetProjection, left_join,
};

/// The outcome of a consolidation: both result sheets and the run summary.
#[derive(Debug, Clone)]
pub struct Consolidation {
    /// The net totals sheet.
    pub net_totals: ResultSheet,
    /// The converted concepts sheet.
    pub concepts: ResultSheet,
    /// Counts, salary source and warnings for this run.
    pub summary: RunSummary,
}

impl Consolidation {
    /// Both sheets in workbook order.
    pub fn sheets(&self) -> [&ResultSheet; 2] {
        [&self.net_totals, &self.concepts]
    }
}

/// File locations for a full run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    /// The liquidation report text file.
    pub report: PathBuf,
    /// The master data file.
    pub master: PathBuf,
    /// Where the result goes.
    pub output: PathBuf,
    /// How the result is written.
    pub format: OutputFormat,
}

/// Consolidates liquidation reports against master data.
///
/// # Example
///
/// ```
/// use payroll_consolidator::models::{CellValue, MasterRecord, MasterTable};
/// use payroll_consolidator::pipeline::Consolidator;
///
/// let consolidator = Consolidator::with_defaults()?;
/// let report = format!(
///     "Núm. Personal.....12345\n{:<50}{:<19}{:>20}\n{:<40}{:>20}",
///     "Y200 Auxilio de Transporte", "30", "140.606", "Total General:", "2.450.000"
/// );
/// let master = MasterTable::new(
///     vec!["Nº pers.".to_string(), "Sueldo".to_string()],
///     vec![MasterRecord::new(vec![CellValue::infer("12345"), CellValue::infer("1300000")])],
/// );
///
/// let result = consolidator.consolidate(&report, &master)?;
/// assert_eq!(result.concepts.len(), 1);
/// assert_eq!(result.net_totals.len(), 1);
/// assert_eq!(result.summary.salary_source.as_deref(), Some("Sueldo"));
/// # Ok::<(), payroll_consolidator::error::ConsolidationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Consolidator {
    config: ConsolidationConfig,
    parser: ReportParser,
    salary: SalaryResolver,
}

impl Consolidator {
    /// Creates a consolidator from a validated configuration.
    pub fn new(loader: ConfigLoader) -> ConsolidationResult<Self> {
        let config = loader.into_config();
        Ok(Self {
            parser: ReportParser::new(&config.report)?,
            salary: SalaryResolver::new(&config.master.salary),
            config,
        })
    }

    /// Creates a consolidator with the built-in configuration.
    pub fn with_defaults() -> ConsolidationResult<Self> {
        Self::new(ConfigLoader::from_config(ConsolidationConfig::default())?)
    }

    /// The configuration in use.
    pub fn config(&self) -> &ConsolidationConfig {
        &self.config
    }

    /// Parses report text into concept and net-total records.
    pub fn parse_report(&self, text: &str) -> ParsedReport {
        self.parser.parse(text)
    }

    /// Consolidates decoded report text against a master table.
    ///
    /// # Returns
    ///
    /// Both result sheets and a run summary, or an error if:
    /// - The report yields no concept and no net-total record (`EmptyExtraction`)
    /// - The master table lacks the join key column (`MissingJoinKey`)
    ///
    /// One empty record set is not an error: its sheet has a header row and
    /// no data rows.
    pub fn consolidate(
        &self,
        report_text: &str,
        master: &MasterTable,
    ) -> ConsolidationResult<Consolidation> {
        self.consolidate_parsed(self.parse_report(report_text), master)
    }

    fn consolidate_parsed(
        &self,
        parsed: ParsedReport,
        master: &MasterTable,
    ) -> ConsolidationResult<Consolidation> {
        if parsed.is_empty() {
            return Err(ConsolidationError::EmptyExtraction);
        }
        info!(
            concepts = parsed.concepts.len(),
            net_totals = parsed.net_totals.len(),
            "Extracted report records"
        );

        let index = MasterIndex::build(master, &self.config.master.join_key)?;
        let salary = self.salary.resolve(master.columns());
        let mut warnings = Vec::new();

        match salary.column() {
            Some(column) => info!(column, "Resolved salary column"),
            None => {
                warn!("No salary-like column in master data; salary will be empty");
                warnings.push(RunWarning::SalaryUnresolved);
            }
        }

        let missing = parsed
            .concepts
            .iter()
            .map(|r| r.employee_id())
            .chain(parsed.net_totals.iter().map(|r| r.employee_id()))
            .filter(Option::is_none)
            .count();
        if missing > 0 {
            warn!(count = missing, "Records precede the first personnel header");
            warnings.push(RunWarning::MissingIdentifier { count: missing });
        }

        let sheets = &self.config.sheets;
        let net_join = left_join(&parsed.net_totals, &index);
        let concept_join = left_join(&parsed.concepts, &index);

        let mut fan_out = net_join.fan_out.clone();
        fan_out.extend(concept_join.fan_out.iter().map(|(k, v)| (*k, *v)));
        for (key, rows) in fan_out {
            warn!(key, rows, "Personnel number repeats in master data; rows fan out");
            warnings.push(RunWarning::DuplicateMasterKey { key, rows });
        }

        let net_totals = project(&sheets.net_totals, master, &salary, &net_join, &mut warnings);
        let concepts = project(&sheets.concepts, master, &salary, &concept_join, &mut warnings);

        let summary = RunSummary {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            concept_records: parsed.concepts.len(),
            net_total_records: parsed.net_totals.len(),
            master_records: master.rows().len(),
            unmatched_concepts: concept_join.unmatched,
            unmatched_net_totals: net_join.unmatched,
            salary_source: salary.column().map(str::to_string),
            output_path: None,
            warnings,
        };

        Ok(Consolidation {
            net_totals,
            concepts,
            summary,
        })
    }

    /// Runs a full consolidation from files to files.
    ///
    /// Nothing is written unless the whole consolidation succeeds. The master
    /// file is only read once the report has yielded records.
    pub fn run(&self, paths: &RunPaths) -> ConsolidationResult<RunSummary> {
        let report_text = read_report(&paths.report, &self.config.report.encoding)?;
        let parsed = self.parse_report(&report_text);
        if parsed.is_empty() {
            return Err(ConsolidationError::EmptyExtraction);
        }
        let master = read_master(&paths.master)?;
        let consolidation = self.consolidate_parsed(parsed, &master)?;

        let written = write_sheets(&paths.output, paths.format, &consolidation.sheets())?;
        let mut summary = consolidation.summary;
        summary.output_path = written.first().map(|p| p.display().to_string());
        Ok(summary)
    }

    /// The timestamped default output file name, e.g.
    /// `Nomina_Consolidado_20240131_174501.xlsx`.
    pub fn default_output_name(&self, format: OutputFormat) -> String {
        format!(
            "{}_{}.{}",
            self.config.output.file_prefix,
            Utc::now().format("%Y%m%d_%H%M%S"),
            format.extension()
        )
    }
}

fn project<R: ReportRecord>(
    layout: &SheetLayout,
    master: &MasterTable,
    salary: &SalarySource,
    joined: &JoinOutcome<'_, R>,
    warnings: &mut Vec<RunWarning>,
) -> ResultSheet {
    if joined.unmatched > 0 {
        warn!(
            sheet = %layout.name,
            count = joined.unmatched,
            "Records without a master data match"
        );
        warnings.push(RunWarning::UnmatchedRecords {
            sheet: layout.name.clone(),
            count: joined.unmatched,
        });
    }
    SheetProjection::resolve(layout, master).apply(&joined.rows, salary)
}
