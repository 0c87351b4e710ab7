//! Terminal formatting helpers
//!
//! Shared by the report renderers and the CLI so that "not entered" and
//! "not applicable" read the same everywhere.

pub mod budget;

pub use budget::{format_budget_list, BudgetListRow};

use crate::models::{ItemLevel, Money, Percentage, Quantity};

/// Placeholder for values that do not apply to a row
pub const NOT_APPLICABLE: &str = "n/a";

/// Placeholder for service values not entered yet
pub const NOT_ENTERED: &str = "-";

pub fn format_money(amount: Money, symbol: &str) -> String {
    amount.format_with_symbol(symbol)
}

/// Money on a service row: `-` when not entered
pub fn format_entered_money(amount: Option<Money>, symbol: &str) -> String {
    amount
        .map(|m| m.format_with_symbol(symbol))
        .unwrap_or_else(|| NOT_ENTERED.to_string())
}

pub fn format_entered_quantity(quantity: Option<Quantity>) -> String {
    quantity
        .map(|q| q.to_string())
        .unwrap_or_else(|| NOT_ENTERED.to_string())
}

/// Percentage, or `n/a` when it cannot be computed
pub fn format_percentage(pct: Option<Percentage>) -> String {
    pct.map(|p| p.to_string())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

/// Indent a description by nesting depth
pub fn indent(level: ItemLevel, text: &str) -> String {
    format!("{}{}", "  ".repeat(level.depth() - 1), text)
}

/// Cut text to `width` characters, marking the cut with `…`
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Format a double separator line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entered_vs_not_entered() {
        assert_eq!(format_entered_money(None, "$"), "-");
        assert_eq!(format_entered_money(Some(Money::zero()), "$"), "$0.00");
        assert_eq!(format_entered_quantity(Some(Quantity::from_thousandths(1500))), "1.5");
    }

    #[test]
    fn test_percentage_not_applicable() {
        assert_eq!(format_percentage(None), "n/a");
        assert_eq!(format_percentage(Some(Percentage::from_whole(50))), "50.00%");
    }

    #[test]
    fn test_indent_and_truncate() {
        assert_eq!(indent(ItemLevel::Site, "A"), "A");
        assert_eq!(indent(ItemLevel::Service, "A"), "      A");
        assert_eq!(truncate("Foundations", 6), "Found…");
        assert_eq!(truncate("Wall", 6), "Wall");
    }
}
