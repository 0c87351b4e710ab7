//! Realized amount CLI commands

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::services::{BudgetService, ReconciliationService};
use crate::storage::BudgetStore;

use super::{parse_money, resolve_item};

/// Realized amount subcommands
#[derive(Subcommand)]
pub enum RealizedCommands {
    /// Record what has been invoiced against one item of the approved budget
    Set {
        /// Site id (or a prefix of it)
        site: String,
        /// Item id prefix or code
        item: String,
        /// Realized amount, with "," or "." as decimal separator
        amount: String,
    },

    /// Import realized amounts from a CSV with budgetItemId,realizedAmount columns
    Import {
        /// Site id (or a prefix of it)
        site: String,
        /// Path to the CSV file
        file: PathBuf,
    },
}

/// Handle a realized command
pub fn handle_realized_command(
    store: &dyn BudgetStore,
    settings: &Settings,
    cmd: RealizedCommands,
) -> BudgetResult<()> {
    let budgets = BudgetService::new(store);
    let service = ReconciliationService::new(store);

    match cmd {
        RealizedCommands::Set { site, item, amount } => {
            let site_id = budgets.find_site(&site)?;
            let budget = service.approved_budget(site_id)?;
            let item_id = resolve_item(&budget, &item)?;
            let amount = parse_money(&amount)?;

            let entry = service.set_realized(site_id, item_id, amount)?;
            println!(
                "Recorded {} realized on {}",
                entry
                    .realized_amount
                    .format_with_symbol(&settings.currency_symbol),
                entry.budget_item_id
            );
        }

        RealizedCommands::Import { site, file } => {
            let site_id = budgets.find_site(&site)?;
            let reader = File::open(&file).map(BufReader::new).map_err(|e| {
                BudgetError::Import(format!("Cannot open {}: {}", file.display(), e))
            })?;

            let result = service.import_realized_csv(site_id, reader)?;
            println!("Imported {} realized amount(s)", result.recorded);
            if result.unknown_items > 0 {
                println!(
                    "  Skipped {} row(s) for items outside the approved budget",
                    result.unknown_items
                );
            }
            let mut errors: Vec<_> = result.errors.iter().collect();
            errors.sort_by_key(|(row, _)| **row);
            for (row, message) in errors {
                println!("  Row {}: {}", row, message);
            }
        }
    }

    Ok(())
}
