//! Export module for SiteBudget
//!
//! Writes the budget sheet and the execution report in three formats:
//! - CSV: one record per item, spreadsheet-friendly decimals
//! - JSON: versioned envelope, amounts as stored
//! - YAML: same envelope, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

pub use self::csv::{export_execution_csv, export_sheet_csv};
pub use json::{export_json, ReportExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_yaml;

use crate::error::{BudgetError, BudgetResult};
use crate::reports::{BudgetSheet, ExecutionReport};

/// Output format of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportFormat {
    /// One record per item, spreadsheet-friendly
    #[default]
    Csv,
    /// Versioned envelope, amounts as stored
    Json,
    /// Same envelope as JSON, human-readable
    #[value(alias = "yml")]
    Yaml,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "yaml" | "yml" => Ok(ExportFormat::Yaml),
            other => Err(BudgetError::Export(format!(
                "Unknown format '{}'. Use csv, json or yaml",
                other
            ))),
        }
    }
}

/// Write a budget sheet in the given format
pub fn export_sheet<W: Write>(
    sheet: &BudgetSheet,
    format: ExportFormat,
    writer: &mut W,
) -> BudgetResult<()> {
    match format {
        ExportFormat::Csv => export_sheet_csv(sheet, writer),
        ExportFormat::Json => export_json("budget", sheet, writer),
        ExportFormat::Yaml => export_yaml("budget", sheet, writer),
    }
}

/// Write an execution report in the given format
pub fn export_execution<W: Write>(
    report: &ExecutionReport,
    format: ExportFormat,
    writer: &mut W,
) -> BudgetResult<()> {
    match format {
        ExportFormat::Csv => export_execution_csv(report, writer),
        ExportFormat::Json => export_json("execution", report, writer),
        ExportFormat::Yaml => export_yaml("execution", report, writer),
    }
}
