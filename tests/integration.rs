//! End-to-end tests for the payroll consolidator.
//!
//! This suite drives the public API from files on disk to written output:
//! - The reference scenario (one employee, one concept, one net total)
//! - Master data in CSV and workbook form
//! - Fatal errors and the absence of partial output
//! - Idempotence of the record sets
//! - Reports with only one of the two record kinds

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, open_workbook_auto};
use rust_decimal::Decimal;
use tempfile::TempDir;

use payroll_consolidator::config::{ConfigLoader, ConsolidationConfig};
use payroll_consolidator::error::ConsolidationError;
use payroll_consolidator::io::{OutputFormat, csv_sheet_path};
use payroll_consolidator::models::{CellValue, RunWarning};
use payroll_consolidator::pipeline::{Consolidator, RunPaths};

// =============================================================================
// Test Helpers
// =============================================================================

const MASTER_HEADER: &str =
    "Nº pers.,Número ID,Número de personal,División de personal,Ce.coste,Salario Base,Fecha,Función,Área de personal";

fn concept_line(code_and_label: &str, quantity: &str, value: &str) -> String {
    format!("{:<50}{:<19}{:>20}", code_and_label, quantity, value)
}

fn net_line(value: &str) -> String {
    format!("{:<40}{:>20}", "Total General:", value)
}

fn create_reference_report() -> String {
    [
        "JERONIMO MARTINS COLOMBIA SAS".to_string(),
        "LIQUIDACION DE NOMINA  PERIODO 01.2024".to_string(),
        "Núm. Personal.........12345   PEREZ GOMEZ JUAN".to_string(),
        concept_line("Y200 Auxilio de Transporte", "30", "140606"),
        "DOS MILLONES CUATROCIENTOS CINCUENTA MIL PESOS CON 00/100".to_string(),
        net_line("2450000"),
    ]
    .join("\r\n")
}

/// Writes the report as ISO-8859-1 bytes, the way the payroll system exports it.
fn write_report(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("liquidacion.txt");
    let bytes: Vec<u8> = text.chars().map(|c| c as u32 as u8).collect();
    fs::write(&path, bytes).unwrap();
    path
}

fn write_master_csv(dir: &Path, rows: &[&str]) -> PathBuf {
    let path = dir.join("MASTERDATA.csv");
    let mut content = String::from(MASTER_HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    fs::write(&path, content).unwrap();
    path
}

fn reference_master_row() -> &'static str {
    "12345,1010101010,PEREZ GOMEZ JUAN,Bogotá,CC100,\"1.300.000\",2019-03-01,Cajero,Operativo"
}

fn run_paths(dir: &Path, report: PathBuf, master: PathBuf, format: OutputFormat) -> RunPaths {
    RunPaths {
        report,
        master,
        output: dir.join("Nomina_Consolidado.xlsx"),
        format,
    }
}

fn read_csv(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

// =============================================================================
// Reference Scenario
// =============================================================================

#[test]
fn test_reference_scenario_in_memory() {
    let consolidator = Consolidator::with_defaults().unwrap();
    let master = payroll_consolidator::io::parse_csv(
        format!("{}\n{}\n", MASTER_HEADER, reference_master_row()).as_bytes(),
    )
    .unwrap();

    let result = consolidator
        .consolidate(&create_reference_report(), &master)
        .unwrap();

    assert_eq!(
        result.concepts.columns,
        vec![
            "CÓDIGO",
            "CONCEPTO",
            "CANTIDAD",
            "VALOR",
            "SAP",
            "CÉDULA",
            "NOMBRE",
            "SALARIO",
            "F. INGRESO",
            "CARGO",
            "NIVEL"
        ]
    );
    assert_eq!(result.concepts.rows.len(), 1);
    let concept = &result.concepts.rows[0];
    assert_eq!(concept[0], CellValue::from("Y200"));
    assert_eq!(concept[1], CellValue::from("Auxilio de Transporte"));
    assert_eq!(concept[2], CellValue::Number(Decimal::from(30)));
    assert_eq!(concept[3], CellValue::Number(Decimal::from(140606)));
    assert_eq!(concept[4], CellValue::from(Some(12345)));
    assert_eq!(concept[5], CellValue::Number(Decimal::from(1010101010u64)));
    assert_eq!(concept[6], CellValue::from("PEREZ GOMEZ JUAN"));
    assert_eq!(concept[7], CellValue::Number(Decimal::from(1300000)));

    assert_eq!(
        result.net_totals.columns,
        vec![
            "NETO", "Valor", "SAP", "CÉDULA", "NOMBRE", "REGIONAL", "CE_COSTE", "SALARIO",
            "F. ING", "CARGO", "NIVEL"
        ]
    );
    assert_eq!(result.net_totals.rows.len(), 1);
    let net = &result.net_totals.rows[0];
    assert_eq!(net[0], CellValue::from("Total General:"));
    assert_eq!(net[1], CellValue::Number(Decimal::from(2450000)));
    assert_eq!(net[2], CellValue::from(Some(12345)));
    assert_eq!(net[5], CellValue::from("Bogotá"));
    assert_eq!(net[7], CellValue::Number(Decimal::from(1300000)));

    assert_eq!(result.summary.salary_source.as_deref(), Some("Salario Base"));
    assert!(result.summary.warnings.is_empty());
}

#[test]
fn test_reference_scenario_to_csv_files() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), &create_reference_report());
    let master = write_master_csv(dir.path(), &[reference_master_row()]);
    let paths = run_paths(dir.path(), report, master, OutputFormat::Csv);

    let summary = Consolidator::with_defaults().unwrap().run(&paths).unwrap();
    assert_eq!(summary.concept_records, 1);
    assert_eq!(summary.net_total_records, 1);

    let netos = read_csv(&csv_sheet_path(&paths.output, "Netos"));
    assert_eq!(netos[0][0], "NETO");
    assert_eq!(netos[1][..3], ["Total General:", "2450000", "12345"]);

    let conceptos = read_csv(&csv_sheet_path(&paths.output, "Preno_Convertida"));
    assert_eq!(
        conceptos[1][..5],
        ["Y200", "Auxilio de Transporte", "30", "140606", "12345"]
    );
    assert_eq!(conceptos[1][7], "1300000");
}

#[test]
fn test_reference_scenario_to_workbook() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), &create_reference_report());
    let master = write_master_csv(dir.path(), &[reference_master_row()]);
    let paths = run_paths(dir.path(), report, master, OutputFormat::Xlsx);

    let summary = Consolidator::with_defaults().unwrap().run(&paths).unwrap();
    assert_eq!(
        summary.output_path.as_deref(),
        Some(paths.output.display().to_string().as_str())
    );

    let mut workbook = open_workbook_auto(&paths.output).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Netos", "Preno_Convertida"]);

    let netos = workbook.worksheet_range("Netos").unwrap();
    assert_eq!(netos.get((0, 0)), Some(&Data::String("NETO".to_string())));
    assert_eq!(netos.get((1, 1)), Some(&Data::Float(2450000.0)));

    let conceptos = workbook.worksheet_range("Preno_Convertida").unwrap();
    assert_eq!(conceptos.get((1, 0)), Some(&Data::String("Y200".to_string())));
    assert_eq!(conceptos.get((1, 4)), Some(&Data::Float(12345.0)));
}

#[test]
fn test_workbook_master_with_padded_header_joins() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), &create_reference_report());
    let master = dir.path().join("MASTERDATA.xlsx");
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, " Nº pers. ").unwrap();
    sheet.write_string(0, 1, "Sueldo Básico").unwrap();
    sheet.write_number(1, 0, 12345.0).unwrap();
    sheet.write_string(1, 1, "1.300.000").unwrap();
    workbook.save(&master).unwrap();
    let paths = run_paths(dir.path(), report, master, OutputFormat::Csv);

    let summary = Consolidator::with_defaults().unwrap().run(&paths).unwrap();
    assert_eq!(summary.unmatched_net_totals, 0);
    assert_eq!(summary.salary_source.as_deref(), Some("Sueldo Básico"));

    let netos = read_csv(&csv_sheet_path(&paths.output, "Netos"));
    assert_eq!(netos[0], ["NETO", "Valor", "SAP", "SALARIO"]);
    assert_eq!(netos[1], ["Total General:", "2450000", "12345", "1300000"]);
}

// =============================================================================
// Fatal Errors
// =============================================================================

#[test]
fn test_unrecognized_report_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), "this is not a liquidation report\nat all\n");
    let master = write_master_csv(dir.path(), &[reference_master_row()]);
    let paths = run_paths(dir.path(), report, master, OutputFormat::Xlsx);

    let result = Consolidator::with_defaults().unwrap().run(&paths);
    assert!(matches!(result, Err(ConsolidationError::EmptyExtraction)));
    assert!(!paths.output.exists());
}

#[test]
fn test_unrecognized_report_is_reported_before_master_is_read() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), "this is not a liquidation report\n");
    let master = dir.path().join("MASTERDATA.xlsx");
    fs::write(&master, "not a workbook").unwrap();
    let paths = run_paths(dir.path(), report, master, OutputFormat::Xlsx);

    let result = Consolidator::with_defaults().unwrap().run(&paths);
    assert!(matches!(result, Err(ConsolidationError::EmptyExtraction)));
}

#[test]
fn test_missing_join_key_names_found_columns() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), &create_reference_report());
    let master = dir.path().join("MASTERDATA.csv");
    fs::write(&master, "Legajo,Nombre\n12345,Juan\n").unwrap();
    let paths = run_paths(dir.path(), report, master, OutputFormat::Xlsx);

    let error = Consolidator::with_defaults().unwrap().run(&paths).unwrap_err();
    let message = error.to_string();
    assert!(message.contains("Nº pers."), "{}", message);
    assert!(message.contains("Legajo, Nombre"), "{}", message);
    assert!(!paths.output.exists());
}

#[test]
fn test_unsupported_master_format() {
    let dir = TempDir::new().unwrap();
    let report = write_report(dir.path(), &create_reference_report());
    let master = dir.path().join("MASTERDATA.json");
    fs::write(&master, "{}").unwrap();
    let paths = run_paths(dir.path(), report, master, OutputFormat::Xlsx);

    let result = Consolidator::with_defaults().unwrap().run(&paths);
    assert!(matches!(
        result,
        Err(ConsolidationError::UnsupportedMasterFormat { .. })
    ));
}

// =============================================================================
// Run Properties
// =============================================================================

#[test]
fn test_repeated_runs_yield_identical_sheets() {
    let consolidator = Consolidator::with_defaults().unwrap();
    let master = payroll_consolidator::io::parse_csv(
        format!("{}\n{}\n", MASTER_HEADER, reference_master_row()).as_bytes(),
    )
    .unwrap();
    let report = create_reference_report();

    let first = consolidator.consolidate(&report, &master).unwrap();
    let second = consolidator.consolidate(&report, &master).unwrap();
    assert_eq!(first.net_totals, second.net_totals);
    assert_eq!(first.concepts, second.concepts);
    assert_ne!(first.summary.run_id, second.summary.run_id);
}

#[test]
fn test_concepts_only_report_writes_empty_net_sheet() {
    let dir = TempDir::new().unwrap();
    let text = [
        "Núm. Personal.........12345".to_string(),
        concept_line("Y200 Auxilio de Transporte", "30", "140606"),
    ]
    .join("\n");
    let report = write_report(dir.path(), &text);
    let master = write_master_csv(dir.path(), &[reference_master_row()]);
    let paths = run_paths(dir.path(), report, master, OutputFormat::Csv);

    let summary = Consolidator::with_defaults().unwrap().run(&paths).unwrap();
    assert_eq!(summary.net_total_records, 0);

    let netos = read_csv(&csv_sheet_path(&paths.output, "Netos"));
    assert_eq!(netos.len(), 1);
    assert_eq!(netos[0][0], "NETO");
}

#[test]
fn test_missing_master_columns_are_omitted_and_unmatched_rows_kept() {
    let consolidator = Consolidator::with_defaults().unwrap();
    let master =
        payroll_consolidator::io::parse_csv("Nº pers.,Sueldo\n99999,100\n".as_bytes()).unwrap();
    let result = consolidator
        .consolidate(&create_reference_report(), &master)
        .unwrap();

    assert_eq!(result.net_totals.columns, vec!["NETO", "Valor", "SAP", "SALARIO"]);
    assert_eq!(result.net_totals.rows[0][3], CellValue::Empty);
    assert_eq!(result.summary.unmatched_net_totals, 1);
    assert!(result.summary.warnings.contains(&RunWarning::UnmatchedRecords {
        sheet: "Preno_Convertida".to_string(),
        count: 1,
    }));
}

#[test]
fn test_custom_configuration_changes_join_key() {
    let mut config = ConsolidationConfig::default();
    config.master.join_key = "Legajo".to_string();
    let consolidator = Consolidator::new(ConfigLoader::from_config(config).unwrap()).unwrap();
    let master = payroll_consolidator::io::parse_csv(b"Legajo,SALARIO\n12345,1.300.000\n").unwrap();

    let result = consolidator
        .consolidate(&create_reference_report(), &master)
        .unwrap();
    // A canonical salary column passes through unconverted.
    assert_eq!(
        result.net_totals.column("SALARIO").unwrap(),
        vec![&CellValue::Text("1.300.000".to_string())]
    );
    assert_eq!(result.summary.unmatched_net_totals, 0);
}
