//! Budgeted vs. realized reconciliation
//!
//! Joins budget items with the realized amounts reported for them. The output
//! keeps the order of the items so codes computed over the same list line up
//! row by row.

use tracing::warn;

use crate::models::{BudgetItem, Money, Percentage, RealizedMap};

use super::rollup::{self, ServiceTotals};

/// One budget item alongside what has actually been invoiced against it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledItem<'a> {
    pub item: &'a BudgetItem,
    /// Service totals; `None` for grouping items
    pub totals: Option<ServiceTotals>,
    pub realized: Money,
    /// `None` when the budgeted total is zero or the item is not a service
    pub percent_executed: Option<Percentage>,
}

impl ReconciledItem<'_> {
    /// Budgeted total of the line, zero for grouping items
    pub fn total_item(&self) -> Money {
        self.totals.map(|t| t.total_item).unwrap_or_default()
    }

    /// Budgeted minus realized
    pub fn remaining(&self) -> Money {
        self.total_item() - self.realized
    }

    /// Whether more has been invoiced than budgeted
    pub fn is_over_budget(&self) -> bool {
        self.realized > self.total_item()
    }
}

/// Aggregate of a reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconciliationTotals {
    pub budgeted: Money,
    pub realized: Money,
    pub percent_executed: Option<Percentage>,
}

/// Percent of a service total already realized
///
/// Returns `None` instead of dividing by a zero total.
pub fn percent_executed(realized: Money, total_item: Money) -> Option<Percentage> {
    realized.ratio_of(total_item)
}

/// Join items with realized amounts
///
/// Items without a realized entry get zero. Realized entries whose id matches
/// no item are ignored.
pub fn merge<'a>(items: &'a [BudgetItem], realized: &RealizedMap) -> Vec<ReconciledItem<'a>> {
    let unmatched = realized
        .ids()
        .filter(|id| !items.iter().any(|item| item.id == **id))
        .count();
    if unmatched > 0 {
        warn!(unmatched, "ignoring realized amounts for unknown budget items");
    }

    items
        .iter()
        .map(|item| {
            let totals = rollup::service_totals(item);
            let realized = realized.get(item.id).unwrap_or_default();
            let percent_executed =
                totals.and_then(|t| percent_executed(realized, t.total_item));
            ReconciledItem {
                item,
                totals,
                realized,
                percent_executed,
            }
        })
        .collect()
}

/// Budgeted subtotal against everything realized on the listed items
pub fn totals(rows: &[ReconciledItem<'_>]) -> ReconciliationTotals {
    let budgeted: Money = rows.iter().map(ReconciledItem::total_item).sum();
    let realized: Money = rows.iter().map(|r| r.realized).sum();
    ReconciliationTotals {
        budgeted,
        realized,
        percent_executed: percent_executed(realized, budgeted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::coder;
    use crate::models::{BudgetItemId, ItemLevel, Quantity, RealizedAmount};

    fn sample() -> Vec<BudgetItem> {
        vec![
            BudgetItem::group(ItemLevel::Site, "Site"),
            BudgetItem::group(ItemLevel::Stage, "Stage"),
            BudgetItem::service(
                "Walls",
                "m²",
                Quantity::from_units(2),
                Money::from_cents(1000),
                Money::from_cents(500),
            ),
            BudgetItem::new(ItemLevel::Service),
        ]
    }

    #[test]
    fn test_percent_executed_scenario() {
        let items = sample();
        let mut realized = RealizedMap::new();
        realized.add(items[2].id, Money::from_cents(1500));

        let rows = merge(&items, &realized);

        assert_eq!(rows[2].total_item(), Money::from_cents(3000));
        assert_eq!(rows[2].realized, Money::from_cents(1500));
        assert_eq!(rows[2].percent_executed, Some(Percentage::from_whole(50)));
        assert_eq!(rows[2].remaining(), Money::from_cents(1500));
        assert!(!rows[2].is_over_budget());
    }

    #[test]
    fn test_zero_total_is_not_applicable() {
        let items = sample();
        let mut realized = RealizedMap::new();
        realized.add(items[3].id, Money::from_cents(100));

        let rows = merge(&items, &realized);

        assert_eq!(rows[3].total_item(), Money::zero());
        assert_eq!(rows[3].percent_executed, None);
        assert!(rows[3].is_over_budget());
        assert_eq!(percent_executed(Money::zero(), Money::zero()), None);
    }

    #[test]
    fn test_unmatched_items_get_zero_and_order_is_kept() {
        let items = sample();
        let rows = merge(&items, &RealizedMap::new());

        assert_eq!(rows.len(), items.len());
        for (row, item) in rows.iter().zip(&items) {
            assert_eq!(row.item.id, item.id);
            assert_eq!(row.realized, Money::zero());
        }
        assert_eq!(rows[2].percent_executed, Some(Percentage::zero()));
        assert_eq!(rows[0].percent_executed, None);

        // Codes over the same list line up with the rows
        let codes = coder::codes(&items);
        assert_eq!(codes[2], "01.01.01");
    }

    #[test]
    fn test_unknown_realized_entries_are_ignored() {
        let items = sample();
        let realized: RealizedMap = vec![
            RealizedAmount::new(BudgetItemId::new(), Money::from_cents(99_999)),
            RealizedAmount::new(items[2].id, Money::from_cents(600)),
        ]
        .into_iter()
        .collect();

        let rows = merge(&items, &realized);
        let aggregate = totals(&rows);

        assert_eq!(aggregate.budgeted, Money::from_cents(3000));
        assert_eq!(aggregate.realized, Money::from_cents(600));
        assert_eq!(aggregate.percent_executed, Some(Percentage::from_whole(20)));
    }

    #[test]
    fn test_empty_aggregate() {
        let aggregate = totals(&[]);
        assert_eq!(aggregate.budgeted, Money::zero());
        assert_eq!(aggregate.percent_executed, None);
    }
}
