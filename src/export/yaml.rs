//! YAML export
//!
//! Same envelope as the JSON export, for reading by people.

use std::io::Write;

use serde::Serialize;

use super::json::ReportExport;
use crate::error::BudgetResult;

/// Write a report as YAML with a short comment header
pub fn export_yaml<T: Serialize, W: Write>(
    kind: &'static str,
    report: &T,
    writer: &mut W,
) -> BudgetResult<()> {
    let export = ReportExport::new(kind, report);

    writeln!(writer, "# SiteBudget {} export", kind)?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# Amounts in cents, quantities in thousandths, rates in basis points")?;
    writeln!(writer)?;

    serde_yaml::to_writer(writer, &export)?;
    Ok(())
}
