//! Budget list table

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::engine::rollup;
use crate::models::Budget;

/// One line of `budget list`
#[derive(Debug, Clone, Tabled)]
pub struct BudgetListRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Site")]
    pub site: String,
    #[tabled(rename = "Base date")]
    pub base_date: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Items")]
    pub items: usize,
    #[tabled(rename = "Fee")]
    pub fee: String,
    #[tabled(rename = "Grand total")]
    pub grand_total: String,
}

impl BudgetListRow {
    pub fn from_budget(budget: &Budget, currency_symbol: &str) -> Self {
        let totals = rollup::budget_totals(&budget.items, budget.administrative_fee_rate);
        Self {
            id: budget.id.to_string(),
            site: budget.site_id.to_string(),
            base_date: budget.base_date.to_string(),
            status: budget.status.to_string(),
            items: budget.items.len(),
            fee: budget.administrative_fee_rate.to_string(),
            grand_total: totals.grand_total.format_with_symbol(currency_symbol),
        }
    }
}

/// Render budgets as a table
pub fn format_budget_list(budgets: &[Budget], currency_symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.".to_string();
    }
    let rows: Vec<_> = budgets
        .iter()
        .map(|b| BudgetListRow::from_budget(b, currency_symbol))
        .collect();
    Table::new(rows).with(Style::sharp()).to_string()
}
