//! Budget CLI commands
//!
//! Creating, listing and showing budgets, copying them to other sites,
//! approval and the administrative fee.

use chrono::Local;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_budget_list;
use crate::error::BudgetResult;
use crate::models::SiteId;
use crate::reports::BudgetSheet;
use crate::services::BudgetService;
use crate::storage::BudgetStore;

use super::{parse_date, parse_percentage};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create an empty budget
    New {
        /// Site id; a new site is created when omitted
        #[arg(short, long)]
        site: Option<String>,
        /// Base date of the prices (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Administrative fee rate in percent (e.g. "10" or "12,5")
        #[arg(short, long)]
        fee: Option<String>,
    },

    /// List budgets with their grand totals
    #[command(alias = "ls")]
    List {
        /// Only budgets of this site
        #[arg(short, long)]
        site: Option<String>,
    },

    /// Show the coded, costed sheet of a budget
    Show {
        /// Budget id (or a prefix of it)
        budget: String,
    },

    /// Copy a budget onto another site
    Copy {
        /// Budget id (or a prefix of it)
        budget: String,
        /// Target site id; a new site is created when omitted
        #[arg(short, long)]
        site: Option<String>,
    },

    /// Mark a budget as in use
    Approve {
        /// Budget id (or a prefix of it)
        budget: String,
    },

    /// Change the administrative fee rate
    Fee {
        /// Budget id (or a prefix of it)
        budget: String,
        /// Rate in percent
        rate: String,
    },
}

/// Handle a budget command
pub fn handle_budget_command(
    store: &dyn BudgetStore,
    settings: &Settings,
    cmd: BudgetCommands,
) -> BudgetResult<()> {
    let service = BudgetService::new(store);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::New { site, date, fee } => {
            let site_id = match site {
                Some(reference) => service.find_site(&reference)?,
                None => SiteId::new(),
            };
            let base_date = match date {
                Some(text) => parse_date(&text, &settings.date_format)?,
                None => Local::now().date_naive(),
            };
            let rate = match fee {
                Some(text) => parse_percentage(&text)?,
                None => settings.default_fee_rate,
            };

            let budget = service.create(site_id, base_date, rate)?;
            println!("Created budget {} for site {}", budget.id, site_id);
            println!("  Budget id:  {}", budget.id.as_uuid());
            println!("  Site id:    {}", site_id.as_uuid());
            println!("  Base date:  {}", base_date.format(&settings.date_format));
            println!("  Admin fee:  {}", rate);
        }

        BudgetCommands::List { site } => {
            let budgets = match site {
                Some(reference) => service.list_for_site(service.find_site(&reference)?)?,
                None => service.list()?,
            };
            println!("{}", format_budget_list(&budgets, symbol));
        }

        BudgetCommands::Show { budget } => {
            let budget = service.find(&budget)?;
            print!("{}", BudgetSheet::generate(&budget).format_terminal(symbol));
        }

        BudgetCommands::Copy { budget, site } => {
            let source = service.find(&budget)?;
            let site_id = match site {
                Some(reference) => service.find_site(&reference)?,
                None => SiteId::new(),
            };
            let copy = service.copy_to_site(source.id, site_id)?;
            println!(
                "Copied budget {} to site {} as {} ({} items)",
                source.id,
                site_id,
                copy.id,
                copy.items.len()
            );
            println!("  Budget id:  {}", copy.id.as_uuid());
            println!("  Site id:    {}", site_id.as_uuid());
        }

        BudgetCommands::Approve { budget } => {
            let budget = service.find(&budget)?;
            let approved = service.approve(budget.id)?;
            println!(
                "Budget {} is now {} for site {}",
                approved.id, approved.status, approved.site_id
            );
        }

        BudgetCommands::Fee { budget, rate } => {
            let budget = service.find(&budget)?;
            let updated = service.set_fee_rate(budget.id, parse_percentage(&rate)?)?;
            let sheet = BudgetSheet::generate(&updated);
            println!(
                "Administrative fee of {} set to {} ({} on {}, grand total {})",
                updated.id,
                updated.administrative_fee_rate,
                sheet.totals.administrative_fee_amount.format_with_symbol(symbol),
                sheet.totals.subtotal.format_with_symbol(symbol),
                sheet.totals.grand_total.format_with_symbol(symbol),
            );
        }
    }

    Ok(())
}
