//! CLI commands for data export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{BudgetError, BudgetResult};
use crate::export::{export_execution, export_sheet, ExportFormat};
use crate::reports::BudgetSheet;
use crate::services::{BudgetService, ReconciliationService};
use crate::storage::BudgetStore;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export the sheet of a budget
    Budget {
        /// Budget id (or a prefix of it)
        budget: String,

        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export the execution report of a site
    Execution {
        /// Site id (or a prefix of it)
        site: String,

        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn open_output(output: &Option<PathBuf>) -> BudgetResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                BudgetError::Export(format!("Failed to create {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn report_written(output: &Option<PathBuf>, what: &str, format: ExportFormat) {
    if let Some(path) = output {
        eprintln!("Exported {} as {} to {}", what, format, path.display());
    }
}

/// Handle export commands
pub fn handle_export_command(store: &dyn BudgetStore, cmd: ExportCommands) -> BudgetResult<()> {
    match cmd {
        ExportCommands::Budget {
            budget,
            format,
            output,
        } => {
            let budget = BudgetService::new(store).find(&budget)?;
            let sheet = BudgetSheet::generate(&budget);

            let mut writer = open_output(&output)?;
            export_sheet(&sheet, format, &mut writer)?;
            writer.flush()?;
            report_written(&output, "budget", format);
        }

        ExportCommands::Execution {
            site,
            format,
            output,
        } => {
            let site_id = BudgetService::new(store).find_site(&site)?;
            let report = ReconciliationService::new(store).execution_report(site_id)?;

            let mut writer = open_output(&output)?;
            export_execution(&report, format, &mut writer)?;
            writer.flush()?;
            report_written(&output, "execution report", format);
        }
    }

    Ok(())
}
