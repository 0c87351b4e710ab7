//! Budget sheet
//!
//! The coded, costed view of a budget: one row per item in list order with
//! its hierarchical code and derived totals, followed by the budget totals.
//! Terminal output, the list view and every exporter render from this.

use chrono::NaiveDate;
use serde::Serialize;

use crate::display::{self, format_entered_money, format_entered_quantity};
use crate::engine::{coder, rollup, BudgetTotals};
use crate::models::{
    Budget, BudgetId, BudgetItem, BudgetItemId, BudgetStatus, ItemLevel, Money, Percentage,
    Quantity, SiteId,
};

/// One item of the sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRow {
    pub id: BudgetItemId,
    pub code: String,
    pub level: ItemLevel,
    pub description: String,
    pub unit: Option<String>,
    pub quantity: Option<Quantity>,
    pub unit_material_cost: Option<Money>,
    pub unit_labor_cost: Option<Money>,
    /// Service totals; absent on grouping rows
    pub total_material: Option<Money>,
    pub total_labor: Option<Money>,
    pub total_item: Option<Money>,
    /// Sum of the services below a grouping row
    pub group_total: Option<Money>,
}

impl SheetRow {
    pub(crate) fn build(items: &[BudgetItem], index: usize, code: String) -> Self {
        let item = &items[index];
        let totals = rollup::service_totals(item);
        Self {
            id: item.id,
            code,
            level: item.level,
            description: item.description.clone(),
            unit: item.unit.clone(),
            quantity: item.quantity,
            unit_material_cost: item.unit_material_cost,
            unit_labor_cost: item.unit_labor_cost,
            total_material: totals.map(|t| t.total_material),
            total_labor: totals.map(|t| t.total_labor),
            total_item: totals.map(|t| t.total_item),
            group_total: rollup::group_total(items, index),
        }
    }

    pub fn is_service(&self) -> bool {
        self.level.is_cost_bearing()
    }

    /// Total shown in the sheet's right-hand column
    pub fn line_total(&self) -> Money {
        self.total_item.or(self.group_total).unwrap_or_default()
    }
}

/// A costed budget ready for display or export
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSheet {
    pub budget_id: BudgetId,
    pub site_id: SiteId,
    pub base_date: NaiveDate,
    pub status: BudgetStatus,
    pub administrative_fee_rate: Percentage,
    pub rows: Vec<SheetRow>,
    #[serde(flatten)]
    pub totals: BudgetTotals,
}

impl BudgetSheet {
    /// Build the sheet of a budget
    pub fn generate(budget: &Budget) -> Self {
        let items = &budget.items;
        let rows = coder::codes(items)
            .into_iter()
            .enumerate()
            .map(|(index, code)| SheetRow::build(items, index, code))
            .collect();

        Self {
            budget_id: budget.id,
            site_id: budget.site_id,
            base_date: budget.base_date,
            status: budget.status,
            administrative_fee_rate: budget.administrative_fee_rate,
            rows,
            totals: rollup::budget_totals(items, budget.administrative_fee_rate),
        }
    }

    /// Number of service rows
    pub fn service_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_service()).count()
    }

    /// Format for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let width = 110;
        let mut output = String::new();

        output.push_str(&format!(
            "Budget {} - site {} - base date {} ({})\n",
            self.budget_id, self.site_id, self.base_date, self.status
        ));
        output.push_str(&display::double_separator(width));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:<32} {:<6} {:>8} {:>12} {:>12} {:>14}\n",
            "Code", "Description", "Unit", "Qty", "Material", "Labor", "Total"
        ));
        output.push_str(&display::separator(width));
        output.push('\n');

        for row in &self.rows {
            let description =
                display::truncate(&display::indent(row.level, &row.description), 32);
            if row.is_service() {
                output.push_str(&format!(
                    "{:<12} {:<32} {:<6} {:>8} {:>12} {:>12} {:>14}\n",
                    row.code,
                    description,
                    row.unit.as_deref().unwrap_or(display::NOT_ENTERED),
                    format_entered_quantity(row.quantity),
                    format_entered_money(row.unit_material_cost, currency_symbol),
                    format_entered_money(row.unit_labor_cost, currency_symbol),
                    row.line_total().format_with_symbol(currency_symbol),
                ));
            } else {
                output.push_str(&format!(
                    "{:<12} {:<32} {:<6} {:>8} {:>12} {:>12} {:>14}\n",
                    row.code,
                    description.to_uppercase(),
                    "",
                    "",
                    "",
                    "",
                    row.line_total().format_with_symbol(currency_symbol),
                ));
            }
        }

        output.push_str(&display::separator(width));
        output.push('\n');
        output.push_str(&format!(
            "{:>95} {:>14}\n",
            "Subtotal",
            self.totals.subtotal.format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!(
            "{:>95} {:>14}\n",
            format!("Administrative fee ({})", self.administrative_fee_rate),
            self.totals
                .administrative_fee_amount
                .format_with_symbol(currency_symbol)
        ));
        output.push_str(&format!(
            "{:>95} {:>14}\n",
            "Grand total",
            self.totals.grand_total.format_with_symbol(currency_symbol)
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn scenario_budget() -> Budget {
        let mut budget = Budget::new(
            SiteId::new(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            Percentage::from_whole(10),
        );
        budget.items = vec![
            BudgetItem::group(ItemLevel::Site, "North lot"),
            BudgetItem::group(ItemLevel::Stage, "Structure"),
            BudgetItem::group(ItemLevel::Substage, "Masonry"),
            BudgetItem::service(
                "Block wall",
                "m²",
                Quantity::from_units(2),
                Money::from_cents(1000),
                Money::from_cents(500),
            ),
        ];
        budget
    }

    #[test]
    fn test_rows_carry_codes_and_totals() {
        let sheet = BudgetSheet::generate(&scenario_budget());

        let codes: Vec<_> = sheet.rows.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["01", "01.01", "01.01.01", "01.01.01.01"]);

        let service = &sheet.rows[3];
        assert_eq!(service.total_material, Some(Money::from_cents(2000)));
        assert_eq!(service.total_labor, Some(Money::from_cents(1000)));
        assert_eq!(service.total_item, Some(Money::from_cents(3000)));
        assert_eq!(service.group_total, None);

        let stage = &sheet.rows[1];
        assert_eq!(stage.total_item, None);
        assert_eq!(stage.group_total, Some(Money::from_cents(3000)));

        assert_eq!(sheet.totals.subtotal, Money::from_cents(3000));
        assert_eq!(sheet.totals.administrative_fee_amount, Money::from_cents(300));
        assert_eq!(sheet.totals.grand_total, Money::from_cents(3300));
        assert_eq!(sheet.service_count(), 1);
    }

    #[test]
    fn test_empty_budget() {
        let mut budget = scenario_budget();
        budget.items.clear();
        let sheet = BudgetSheet::generate(&budget);
        assert!(sheet.rows.is_empty());
        assert_eq!(sheet.totals.grand_total, Money::zero());
    }

    #[test]
    fn test_format_terminal() {
        let sheet = BudgetSheet::generate(&scenario_budget());
        let text = sheet.format_terminal("$");

        assert!(text.contains("01.01.01.01"));
        assert!(text.contains("Block wall"));
        assert!(text.contains("STRUCTURE"));
        assert!(text.contains("$30.00"));
        assert!(text.contains("Administrative fee (10.00%)"));
        assert!(text.contains("$33.00"));
    }

    #[test]
    fn test_unentered_service_values_show_placeholder() {
        let mut budget = scenario_budget();
        budget.items.push(BudgetItem::new(ItemLevel::Service));
        let text = BudgetSheet::generate(&budget).format_terminal("$");
        let last = text
            .lines()
            .find(|l| l.starts_with("01.01.01.02"))
            .unwrap();
        assert!(last.contains(" - "));
    }

    #[test]
    fn test_serialized_shape() {
        let sheet = BudgetSheet::generate(&scenario_budget());
        let json = serde_json::to_value(&sheet).unwrap();

        assert_eq!(json["grandTotal"], 3300);
        assert_eq!(json["administrativeFeeAmount"], 300);
        assert_eq!(json["rows"][3]["code"], "01.01.01.01");
        assert_eq!(json["rows"][3]["totalItem"], 3000);
        assert_eq!(json["rows"][1]["totalItem"], serde_json::Value::Null);
    }
}
