//! Execution report
//!
//! Budgeted vs. realized for the approved budget of a site.

use serde::Serialize;

use crate::display::{self, format_percentage};
use crate::engine::{coder, merge, rollup, BudgetTotals};
use crate::models::{Budget, BudgetId, Money, Percentage, RealizedMap, SiteId};

use super::budget_sheet::SheetRow;

/// A sheet row with what has been invoiced against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRow {
    #[serde(flatten)]
    pub line: SheetRow,
    pub realized: Money,
    pub percent_executed: Option<Percentage>,
}

impl ExecutionRow {
    /// Whether more has been invoiced than budgeted
    pub fn is_over_budget(&self) -> bool {
        self.line
            .total_item
            .map(|total| self.realized > total)
            .unwrap_or(false)
    }
}

/// Reconciliation of a site's approved budget
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub budget_id: BudgetId,
    pub site_id: SiteId,
    pub rows: Vec<ExecutionRow>,
    #[serde(flatten)]
    pub totals: BudgetTotals,
    pub realized: Money,
    /// Realized against the subtotal
    pub percent_executed: Option<Percentage>,
}

impl ExecutionReport {
    /// Join a budget with the realized amounts of its items
    pub fn generate(budget: &Budget, realized: &RealizedMap) -> Self {
        let items = &budget.items;
        let merged = merge::merge(items, realized);
        let aggregate = merge::totals(&merged);
        let totals = rollup::budget_totals(items, budget.administrative_fee_rate);

        let rows = coder::codes(items)
            .into_iter()
            .zip(merged.iter())
            .enumerate()
            .map(|(index, (code, reconciled))| ExecutionRow {
                line: SheetRow::build(items, index, code),
                realized: reconciled.realized,
                percent_executed: reconciled.percent_executed,
            })
            .collect();

        Self {
            budget_id: budget.id,
            site_id: budget.site_id,
            rows,
            totals,
            realized: aggregate.realized,
            percent_executed: aggregate.percent_executed,
        }
    }

    /// Rows invoiced beyond their budget
    pub fn over_budget(&self) -> Vec<&ExecutionRow> {
        self.rows.iter().filter(|r| r.is_over_budget()).collect()
    }

    /// Format for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let width = 100;
        let mut output = String::new();

        output.push_str(&format!(
            "Execution - site {} - budget {}\n",
            self.site_id, self.budget_id
        ));
        output.push_str(&display::double_separator(width));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:<36} {:>14} {:>14} {:>10}\n",
            "Code", "Description", "Budgeted", "Realized", "Executed"
        ));
        output.push_str(&display::separator(width));
        output.push('\n');

        for row in &self.rows {
            let description =
                display::truncate(&display::indent(row.line.level, &row.line.description), 36);
            if row.line.is_service() {
                let marker = if row.is_over_budget() { " *" } else { "" };
                output.push_str(&format!(
                    "{:<12} {:<36} {:>14} {:>14} {:>10}{}\n",
                    row.line.code,
                    description,
                    row.line.line_total().format_with_symbol(currency_symbol),
                    row.realized.format_with_symbol(currency_symbol),
                    format_percentage(row.percent_executed),
                    marker,
                ));
            } else {
                output.push_str(&format!(
                    "{:<12} {:<36} {:>14}\n",
                    row.line.code,
                    description.to_uppercase(),
                    row.line.line_total().format_with_symbol(currency_symbol),
                ));
            }
        }

        output.push_str(&display::separator(width));
        output.push('\n');
        output.push_str(&format!(
            "{:<49} {:>14} {:>14} {:>10}\n",
            "TOTAL",
            self.totals.subtotal.format_with_symbol(currency_symbol),
            self.realized.format_with_symbol(currency_symbol),
            format_percentage(self.percent_executed),
        ));

        let over = self.over_budget().len();
        if over > 0 {
            output.push_str(&format!("\n* {} service(s) realized beyond budget\n", over));
        }

        output
    }
}
