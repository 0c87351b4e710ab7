//! JSON export
//!
//! Wraps a report in a versioned envelope. Amounts are integer cents,
//! quantities thousandths of a unit and percentages hundredths of a percent,
//! exactly as stored.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::BudgetResult;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Export envelope around a report
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExport<'a, T: Serialize> {
    /// Schema version for compatibility checking
    pub schema_version: &'static str,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: &'static str,

    /// `budget` or `execution`
    pub kind: &'static str,

    pub report: &'a T,
}

impl<'a, T: Serialize> ReportExport<'a, T> {
    pub fn new(kind: &'static str, report: &'a T) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            kind,
            report,
        }
    }
}

/// Write a report as pretty-printed JSON
pub fn export_json<T: Serialize, W: Write>(
    kind: &'static str,
    report: &T,
    writer: &mut W,
) -> BudgetResult<()> {
    serde_json::to_writer_pretty(&mut *writer, &ReportExport::new(kind, report))?;
    writeln!(writer)?;
    Ok(())
}
