//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a consolidation
//! configuration from a YAML file and validating it before any report is read.

use std::fs;
use std::path::Path;

use crate::error::{ConsolidationError, ConsolidationResult};
use crate::io::ReportEncoding;

use super::types::{ColumnRange, ColumnSource, ConsolidationConfig, ReportField, SheetLayout};

/// Loads, validates and provides access to a consolidation configuration.
///
/// # Example
///
/// ```no_run
/// use payroll_consolidator::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default.yaml")?;
/// println!("Join key: {}", loader.config().master.join_key);
/// # Ok::<(), payroll_consolidator::error::ConsolidationError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: ConsolidationConfig,
}

impl ConfigLoader {
    /// Loads configuration from a YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file is not valid YAML for the configuration (`ConfigParseError`)
    /// - A value is unusable, e.g. an empty column range (`InvalidConfig`)
    pub fn load<P: AsRef<Path>>(path: P) -> ConsolidationResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ConsolidationError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config: ConsolidationConfig =
            serde_yaml::from_str(&content).map_err(|e| ConsolidationError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Self::from_config(config)
    }

    /// Wraps an in-memory configuration after validating it.
    pub fn from_config(config: ConsolidationConfig) -> ConsolidationResult<Self> {
        validate(&config)?;
        Ok(Self { config })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ConsolidationConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> ConsolidationConfig {
        self.config
    }
}

fn invalid(field: &str, message: impl Into<String>) -> ConsolidationError {
    ConsolidationError::InvalidConfig {
        field: field.to_string(),
        message: message.into(),
    }
}

fn validate_range(field: &str, range: ColumnRange) -> ConsolidationResult<()> {
    if range.start >= range.end {
        return Err(invalid(
            field,
            format!("start {} must be below end {}", range.start, range.end),
        ));
    }
    Ok(())
}

fn validate_sheet(
    field: &str,
    sheet: &SheetLayout,
    allowed: &[ReportField],
) -> ConsolidationResult<()> {
    if sheet.name.trim().is_empty() {
        return Err(invalid(field, "sheet name must not be empty"));
    }
    for column in &sheet.columns {
        if let ColumnSource::Report { field: report_field } = &column.source {
            if !allowed.contains(report_field) {
                return Err(invalid(
                    field,
                    format!(
                        "column '{}' uses report field {:?}, which this sheet's records do not carry",
                        column.output, report_field
                    ),
                ));
            }
        }
    }
    Ok(())
}

fn validate(config: &ConsolidationConfig) -> ConsolidationResult<()> {
    let report = &config.report;

    if ReportEncoding::from_label(&report.encoding).is_none() {
        return Err(invalid(
            "report.encoding",
            format!("unknown encoding label '{}'", report.encoding),
        ));
    }
    if report.header_labels.iter().all(|l| l.is_empty()) {
        return Err(invalid("report.header_labels", "at least one label is required"));
    }
    if report.concept.code_prefixes.is_empty() {
        return Err(invalid("report.concept.code_prefixes", "at least one prefix is required"));
    }
    validate_range("report.concept.quantity", report.concept.quantity)?;
    validate_range("report.concept.value", report.concept.value)?;
    validate_range("report.net_total.label", report.net_total.label)?;
    if report.net_total.marker.is_empty() {
        return Err(invalid("report.net_total.marker", "marker must not be empty"));
    }
    if report.net_total.value_width == 0 {
        return Err(invalid("report.net_total.value_width", "width must be positive"));
    }

    if config.master.join_key.trim().is_empty() {
        return Err(invalid("master.join_key", "join key column must not be empty"));
    }

    validate_sheet(
        "sheets.net_totals",
        &config.sheets.net_totals,
        &[ReportField::Label, ReportField::Value, ReportField::EmployeeId],
    )?;
    validate_sheet(
        "sheets.concepts",
        &config.sheets.concepts,
        &[
            ReportField::Code,
            ReportField::Label,
            ReportField::Quantity,
            ReportField::Value,
            ReportField::EmployeeId,
        ],
    )?;
    if config.sheets.net_totals.name == config.sheets.concepts.name {
        return Err(invalid("sheets", "the two sheets need distinct names"));
    }

    Ok(())
}
