//! Cost rollup
//!
//! Derives service totals, group totals, subtotal, administrative fee and
//! grand total from an item list. Nothing here is stored; every figure is a
//! pure function of the current items.

use serde::Serialize;

use crate::models::{BudgetItem, ItemLevel, Money, Percentage};

/// Totals of a single service line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTotals {
    pub total_material: Money,
    pub total_labor: Money,
    pub total_item: Money,
}

/// Budget-level totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTotals {
    pub subtotal: Money,
    pub administrative_fee_amount: Money,
    pub grand_total: Money,
}

/// Totals of a service; `None` for grouping items
///
/// A missing quantity or unit cost counts as zero here only.
pub fn service_totals(item: &BudgetItem) -> Option<ServiceTotals> {
    if !item.is_cost_bearing() {
        return None;
    }

    let quantity = item.quantity.unwrap_or_default();
    let total_material = item.unit_material_cost.unwrap_or_default().times(quantity);
    let total_labor = item.unit_labor_cost.unwrap_or_default().times(quantity);

    Some(ServiceTotals {
        total_material,
        total_labor,
        total_item: total_material + total_labor,
    })
}

/// `totalItem` of a service, zero for grouping items
pub fn total_item(item: &BudgetItem) -> Money {
    service_totals(item)
        .map(|totals| totals.total_item)
        .unwrap_or_default()
}

/// Sum of every service total
pub fn subtotal(items: &[BudgetItem]) -> Money {
    items.iter().filter_map(service_totals).map(|t| t.total_item).sum()
}

/// Subtotal, administrative fee and grand total
pub fn budget_totals(items: &[BudgetItem], administrative_fee_rate: Percentage) -> BudgetTotals {
    let subtotal = subtotal(items);
    let administrative_fee_amount = subtotal.percent(administrative_fee_rate);

    BudgetTotals {
        subtotal,
        administrative_fee_amount,
        grand_total: subtotal + administrative_fee_amount,
    }
}

/// Index range covered by the grouping item at `index`
///
/// The span runs from the item to just before the next item of the same or a
/// broader level. For a service the span is the item alone.
pub fn span(items: &[BudgetItem], index: usize) -> std::ops::Range<usize> {
    let Some(item) = items.get(index) else {
        return index..index;
    };
    if item.level == ItemLevel::Service {
        return index..index + 1;
    }

    let end = items[index + 1..]
        .iter()
        .position(|next| next.level <= item.level)
        .map(|offset| index + 1 + offset)
        .unwrap_or(items.len());
    index..end
}

/// Total of the services nested under a grouping item
///
/// Returns `None` for services, which have their own [`ServiceTotals`].
pub fn group_total(items: &[BudgetItem], index: usize) -> Option<Money> {
    let item = items.get(index)?;
    if item.is_cost_bearing() {
        return None;
    }
    Some(subtotal(&items[span(items, index)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Quantity;
    use proptest::prelude::*;

    fn service(quantity: i64, material: i64, labor: i64) -> BudgetItem {
        BudgetItem::service(
            "Service",
            "un",
            Quantity::from_units(quantity),
            Money::from_units_cents(material, 0),
            Money::from_units_cents(labor, 0),
        )
    }

    #[test]
    fn test_scenario_site_stage_service() {
        let items = vec![
            BudgetItem::group(ItemLevel::Site, "Site"),
            BudgetItem::group(ItemLevel::Stage, "Stage"),
            service(2, 10, 5),
        ];

        let totals = service_totals(&items[2]).unwrap();
        assert_eq!(totals.total_material, Money::from_cents(2000));
        assert_eq!(totals.total_labor, Money::from_cents(1000));
        assert_eq!(totals.total_item, Money::from_cents(3000));

        let budget = budget_totals(&items, Percentage::from_whole(10));
        assert_eq!(budget.subtotal, Money::from_cents(3000));
        assert_eq!(budget.administrative_fee_amount, Money::from_cents(300));
        assert_eq!(budget.grand_total, Money::from_cents(3300));
    }

    #[test]
    fn test_missing_fields_count_as_zero() {
        let mut item = BudgetItem::new(ItemLevel::Service);
        item.unit_material_cost = Some(Money::from_cents(1000));
        assert_eq!(total_item(&item), Money::zero());

        item.quantity = Some(Quantity::from_units(3));
        assert_eq!(total_item(&item), Money::from_cents(3000));
    }

    #[test]
    fn test_huge_totals_saturate() {
        let huge = Money::parse("50000000000000000").unwrap();
        let mut a = BudgetItem::new(ItemLevel::Service);
        a.quantity = Some(Quantity::from_units(1));
        a.unit_material_cost = Some(huge);
        let mut b = a.clone();
        b.id = crate::models::BudgetItemId::new();

        let items = vec![a, b];
        assert_eq!(subtotal(&items), Money::from_cents(i64::MAX));

        let totals = budget_totals(&items, Percentage::from_whole(10));
        assert_eq!(totals.grand_total, Money::from_cents(i64::MAX));
        assert!(totals.administrative_fee_amount.is_positive());
    }

    #[test]
    fn test_grouping_items_have_no_service_totals() {
        let site = BudgetItem::group(ItemLevel::Site, "Site");
        assert_eq!(service_totals(&site), None);
        assert_eq!(total_item(&site), Money::zero());
    }

    #[test]
    fn test_missing_values_count_as_zero() {
        let mut item = BudgetItem::new(ItemLevel::Service);
        assert_eq!(service_totals(&item), Some(ServiceTotals::default()));

        item.quantity = Some(Quantity::from_units(3));
        item.unit_labor_cost = Some(Money::from_cents(250));
        let totals = service_totals(&item).unwrap();
        assert_eq!(totals.total_material, Money::zero());
        assert_eq!(totals.total_labor, Money::from_cents(750));
        // The item itself still records "not entered"
        assert_eq!(item.unit_material_cost, None);
    }

    #[test]
    fn test_empty_budget() {
        let totals = budget_totals(&[], Percentage::from_basis_points(1250));
        assert_eq!(totals, BudgetTotals::default());
    }

    #[test]
    fn test_no_float_drift_over_many_lines() {
        // 0.10 x 1000 lines would drift in binary floating point
        let items: Vec<_> = (0..1000)
            .map(|_| {
                BudgetItem::service(
                    "Nail",
                    "un",
                    Quantity::from_units(1),
                    Money::from_cents(10),
                    Money::zero(),
                )
            })
            .collect();
        assert_eq!(subtotal(&items), Money::from_cents(10_000));
    }

    #[test]
    fn test_group_totals_follow_spans() {
        let items = vec![
            BudgetItem::group(ItemLevel::Site, "A"),
            BudgetItem::group(ItemLevel::Stage, "A.1"),
            service(1, 10, 0),
            BudgetItem::group(ItemLevel::Substage, "A.1.1"),
            service(2, 10, 0),
            BudgetItem::group(ItemLevel::Stage, "A.2"),
            service(1, 5, 0),
            BudgetItem::group(ItemLevel::Site, "B"),
            service(1, 1, 0),
        ];

        assert_eq!(span(&items, 0), 0..7);
        assert_eq!(span(&items, 1), 1..5);
        assert_eq!(span(&items, 3), 3..5);
        assert_eq!(span(&items, 7), 7..9);
        assert_eq!(span(&items, 2), 2..3);

        assert_eq!(group_total(&items, 0), Some(Money::from_cents(3500)));
        assert_eq!(group_total(&items, 1), Some(Money::from_cents(3000)));
        assert_eq!(group_total(&items, 3), Some(Money::from_cents(2000)));
        assert_eq!(group_total(&items, 5), Some(Money::from_cents(500)));
        assert_eq!(group_total(&items, 7), Some(Money::from_cents(100)));
        assert_eq!(group_total(&items, 2), None);
        assert_eq!(group_total(&items, 99), None);
    }

    proptest! {
        #[test]
        fn prop_subtotal_is_sum_of_service_totals(
            lines in prop::collection::vec((0i64..10_000, 0i64..1_000_000, 0i64..1_000_000), 0..50),
        ) {
            let items: Vec<_> = lines
                .iter()
                .map(|(q, m, l)| BudgetItem::service(
                    "S",
                    "un",
                    Quantity::from_thousandths(*q),
                    Money::from_cents(*m),
                    Money::from_cents(*l),
                ))
                .collect();
            let expected: Money = items.iter().map(total_item).sum();
            prop_assert_eq!(subtotal(&items), expected);
        }

        #[test]
        fn prop_grand_total_within_a_cent(
            subtotal_cents in 0i64..1_000_000_000,
            rate in 0i64..5_000,
        ) {
            let items = vec![BudgetItem::service(
                "S",
                "un",
                Quantity::from_units(1),
                Money::from_cents(subtotal_cents),
                Money::zero(),
            )];
            let totals = budget_totals(&items, Percentage::from_basis_points(rate));
            // subtotal * (1 + rate / 100), rate in hundredths of a percent
            let exact = i128::from(subtotal_cents) * (10_000 + i128::from(rate));
            let got = i128::from(totals.grand_total.cents()) * 10_000;
            prop_assert!((got - exact).abs() <= 5_000);
        }
    }
}
