//! Report CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::BudgetResult;
use crate::services::{BudgetService, ReconciliationService};
use crate::storage::BudgetStore;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Budgeted vs. realized for the approved budget of a site
    Execution {
        /// Site id (or a prefix of it)
        site: String,
    },
}

/// Handle a report command
pub fn handle_report_command(
    store: &dyn BudgetStore,
    settings: &Settings,
    cmd: ReportCommands,
) -> BudgetResult<()> {
    match cmd {
        ReportCommands::Execution { site } => {
            let site_id = BudgetService::new(store).find_site(&site)?;
            let report = ReconciliationService::new(store).execution_report(site_id)?;
            print!("{}", report.format_terminal(&settings.currency_symbol));
        }
    }
    Ok(())
}
