//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod export;
pub mod item;
pub mod realized;
pub mod report;

pub use budget::{handle_budget_command, BudgetCommands};
pub use export::{handle_export_command, ExportCommands};
pub use item::{handle_item_command, ItemCommands};
pub use realized::{handle_realized_command, RealizedCommands};
pub use report::{handle_report_command, ReportCommands};

use chrono::NaiveDate;

use crate::engine::coder;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, BudgetItemId, Money, Percentage};

/// Resolve an item by id prefix or by its current code
///
/// A code only resolves when exactly one item carries it.
pub fn resolve_item(budget: &Budget, reference: &str) -> BudgetResult<BudgetItemId> {
    let by_id: Vec<_> = budget
        .items
        .iter()
        .filter(|item| item.id.matches_ref(reference))
        .map(|item| item.id)
        .collect();
    if by_id.len() == 1 {
        return Ok(by_id[0]);
    }

    let codes = coder::codes(&budget.items);
    let by_code: Vec<_> = budget
        .items
        .iter()
        .zip(&codes)
        .filter(|(_, code)| code.as_str() == reference.trim())
        .map(|(item, _)| item.id)
        .collect();

    match (by_id.len(), by_code.len()) {
        (_, 1) => Ok(by_code[0]),
        (0, 0) => Err(BudgetError::item_not_found(reference)),
        _ => Err(BudgetError::Validation(format!(
            "'{}' matches more than one item; use the item id",
            reference
        ))),
    }
}

/// Parse a date with the configured format, falling back to ISO
pub fn parse_date(input: &str, format: &str) -> BudgetResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), format)
        .or_else(|_| NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d"))
        .map_err(|_| BudgetError::Parse(format!("Invalid date: {}", input)))
}

pub fn parse_percentage(input: &str) -> BudgetResult<Percentage> {
    Percentage::parse(input).ok_or_else(|| BudgetError::Parse(format!("Invalid rate: {}", input)))
}

pub fn parse_money(input: &str) -> BudgetResult<Money> {
    Money::parse(input).map_err(|e| BudgetError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetItem, ItemLevel, SiteId};

    fn budget() -> Budget {
        let mut budget = Budget::new(
            SiteId::new(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            Percentage::zero(),
        );
        budget.items = vec![
            BudgetItem::group(ItemLevel::Site, "Site"),
            BudgetItem::group(ItemLevel::Stage, "Stage"),
            BudgetItem::group(ItemLevel::Stage, "Stage 2"),
        ];
        budget
    }

    #[test]
    fn test_resolve_by_code() {
        let budget = budget();
        assert_eq!(resolve_item(&budget, "01.02").unwrap(), budget.items[2].id);
        assert_eq!(resolve_item(&budget, "01").unwrap(), budget.items[0].id);
        assert!(resolve_item(&budget, "09.09").unwrap_err().is_not_found());
    }

    #[test]
    fn test_resolve_by_id() {
        let budget = budget();
        let id = budget.items[1].id;
        assert_eq!(resolve_item(&budget, &id.to_string()).unwrap(), id);
        assert_eq!(resolve_item(&budget, &id.as_uuid().to_string()).unwrap(), id);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(
            parse_date("2025-03-01", "%d/%m/%Y").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(parse_date("yesterday", "%Y-%m-%d").is_err());
        assert_eq!(parse_percentage("12,5").unwrap(), Percentage::from_basis_points(1250));
        assert_eq!(parse_money("10,50").unwrap(), Money::from_cents(1050));
        assert!(parse_money("ten").is_err());
    }
}
