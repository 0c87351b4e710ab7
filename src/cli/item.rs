//! Budget item CLI commands
//!
//! Each command opens an editing session on the budget, applies its change
//! and saves. Numeric values go through the same draft and commit path as
//! interactive typing, so `--quantity abc` commits the default of one unit
//! and `--quantity ""` clears the field.

use clap::{Args, Subcommand};

use crate::config::settings::Settings;
use crate::engine::{coder, rollup, BudgetEditor, ItemUpdate, NumericField};
use crate::error::BudgetResult;
use crate::models::{BudgetItemId, ItemLevel};
use crate::services::BudgetService;
use crate::storage::BudgetStore;

use super::resolve_item;

/// Field values shared by `item add` and `item set`
#[derive(Args, Debug, Default)]
pub struct ItemFields {
    /// Description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Unit of measure (services only; empty to clear)
    #[arg(short, long)]
    pub unit: Option<String>,
    /// Quantity (services only; empty to clear)
    #[arg(short, long)]
    pub quantity: Option<String>,
    /// Unit material cost (services only; empty to clear)
    #[arg(short, long)]
    pub material: Option<String>,
    /// Unit labor cost (services only; empty to clear)
    #[arg(short, long)]
    pub labor: Option<String>,
}

/// Item subcommands
#[derive(Subcommand)]
pub enum ItemCommands {
    /// Add an item at the end of a budget, or after another item
    Add {
        /// Budget id (or a prefix of it)
        budget: String,
        /// site, stage, substage or service
        level: ItemLevel,
        /// Insert right after this item (id prefix or code)
        #[arg(long)]
        after: Option<String>,
        #[command(flatten)]
        fields: ItemFields,
    },

    /// Change fields of an item
    Set {
        /// Budget id (or a prefix of it)
        budget: String,
        /// Item id prefix or code
        item: String,
        /// Move the item to another level
        #[arg(long)]
        level: Option<ItemLevel>,
        #[command(flatten)]
        fields: ItemFields,
    },

    /// Remove one item; items below it are kept
    #[command(alias = "rm")]
    Remove {
        /// Budget id (or a prefix of it)
        budget: String,
        /// Item id prefix or code
        item: String,
    },
}

fn apply_fields(
    editor: &mut BudgetEditor,
    id: BudgetItemId,
    fields: ItemFields,
) -> BudgetResult<()> {
    if let Some(description) = fields.description {
        editor.update(id, ItemUpdate::Description(description))?;
    }
    if let Some(unit) = fields.unit {
        let unit = Some(unit).filter(|u| !u.trim().is_empty());
        editor.update(id, ItemUpdate::Unit(unit))?;
    }

    let numeric = [
        (NumericField::Quantity, fields.quantity),
        (NumericField::UnitMaterialCost, fields.material),
        (NumericField::UnitLaborCost, fields.labor),
    ];
    for (field, raw) in numeric {
        if let Some(raw) = raw {
            editor.set_draft(id, field, raw)?;
            editor.commit_draft(id, field)?;
        }
    }
    Ok(())
}

fn describe(editor: &BudgetEditor, id: BudgetItemId) -> String {
    let Some(index) = editor.budget().position(id) else {
        return id.to_string();
    };
    let item = &editor.items()[index];
    let code = coder::code(editor.items(), index).unwrap_or_default();
    format!("{} {} {} ({})", item.level, code, item.description, item.id)
}

/// Handle an item command
pub fn handle_item_command(
    store: &dyn BudgetStore,
    settings: &Settings,
    cmd: ItemCommands,
) -> BudgetResult<()> {
    let service = BudgetService::new(store);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ItemCommands::Add {
            budget,
            level,
            after,
            fields,
        } => {
            let budget = service.find(&budget)?;
            let anchor = after
                .map(|reference| resolve_item(&budget, &reference))
                .transpose()?;
            let mut editor = BudgetEditor::new(budget);

            let id = match anchor {
                Some(anchor) => editor.insert_after(anchor, level),
                None => editor.append(level),
            };
            apply_fields(&mut editor, id, fields)?;

            let summary = describe(&editor, id);
            let budget = service.save(editor)?;
            println!("Added {}", summary);
            println!(
                "  Grand total: {}",
                rollup::budget_totals(&budget.items, budget.administrative_fee_rate)
                    .grand_total
                    .format_with_symbol(symbol)
            );
        }

        ItemCommands::Set {
            budget,
            item,
            level,
            fields,
        } => {
            let budget = service.find(&budget)?;
            let id = resolve_item(&budget, &item)?;
            let mut editor = BudgetEditor::new(budget);

            if let Some(level) = level {
                editor.set_level(id, level)?;
            }
            apply_fields(&mut editor, id, fields)?;

            if !editor.is_dirty() {
                println!("Nothing to change.");
                return Ok(());
            }
            let summary = describe(&editor, id);
            let totals = editor.totals();
            service.save(editor)?;
            println!("Updated {}", summary);
            println!("  Grand total: {}", totals.grand_total.format_with_symbol(symbol));
        }

        ItemCommands::Remove { budget, item } => {
            let budget = service.find(&budget)?;
            let id = resolve_item(&budget, &item)?;
            let mut editor = BudgetEditor::new(budget);

            let summary = describe(&editor, id);
            editor.remove(id)?;
            service.save(editor)?;
            println!("Removed {}", summary);
        }
    }

    Ok(())
}
