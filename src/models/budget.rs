//! Budget model
//!
//! A budget belongs to one construction site and holds the ordered item list
//! whose order alone encodes the Site → Stage → Substage → Service nesting.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, BudgetItemId, SiteId};
use super::item::BudgetItem;
use super::percentage::Percentage;

/// Approval status of a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BudgetStatus {
    /// Still being drafted
    #[default]
    InDevelopment,
    /// Approved and in use for cost tracking
    InUse,
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetStatus::InDevelopment => write!(f, "In development"),
            BudgetStatus::InUse => write!(f, "In use"),
        }
    }
}

/// A site budget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,

    /// Owning construction site
    pub site_id: SiteId,

    /// Reference date for unit prices
    pub base_date: NaiveDate,

    /// Administrative fee (BDI) applied over the subtotal
    pub administrative_fee_rate: Percentage,

    #[serde(default)]
    pub status: BudgetStatus,

    /// Ordered items; order is the only carrier of hierarchy
    #[serde(default)]
    pub items: Vec<BudgetItem>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new empty budget
    pub fn new(site_id: SiteId, base_date: NaiveDate, administrative_fee_rate: Percentage) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            site_id,
            base_date,
            administrative_fee_rate,
            status: BudgetStatus::InDevelopment,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy this budget onto another site
    ///
    /// Every item keeps its level, description, unit, quantity and unit
    /// costs but receives a new id. The copy starts in development.
    pub fn copy_to_site(&self, site_id: SiteId) -> Self {
        let mut copy = Self::new(site_id, self.base_date, self.administrative_fee_rate);
        copy.items = self.items.iter().map(BudgetItem::duplicate).collect();
        copy
    }

    /// Index of the item with this id
    pub fn position(&self, id: BudgetItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Get an item by id
    pub fn item(&self, id: BudgetItemId) -> Option<&BudgetItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Whether the budget has been approved
    pub fn is_in_use(&self) -> bool {
        self.status == BudgetStatus::InUse
    }

    /// Mark the budget as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (site {}, base {}, {} items, {})",
            self.id,
            self.site_id,
            self.base_date,
            self.items.len(),
            self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{coder, rollup};
    use crate::models::{ItemLevel, Money, Quantity};

    fn test_budget() -> Budget {
        let mut budget = Budget::new(
            SiteId::new(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            Percentage::from_basis_points(1250),
        );
        budget.items = vec![
            BudgetItem::group(ItemLevel::Site, "Tower A"),
            BudgetItem::group(ItemLevel::Stage, "Structure"),
            BudgetItem::service(
                "Formwork",
                "m²",
                Quantity::from_units(120),
                Money::from_cents(3500),
                Money::from_cents(2200),
            ),
        ];
        budget
    }

    #[test]
    fn test_new_budget() {
        let budget = Budget::new(
            SiteId::new(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            Percentage::from_whole(10),
        );
        assert!(budget.items.is_empty());
        assert_eq!(budget.status, BudgetStatus::InDevelopment);
    }

    #[test]
    fn test_copy_to_site() {
        let mut original = test_budget();
        original.status = BudgetStatus::InUse;
        let target = SiteId::new();

        let copy = original.copy_to_site(target);

        assert_ne!(copy.id, original.id);
        assert_eq!(copy.site_id, target);
        assert_eq!(copy.status, BudgetStatus::InDevelopment);
        assert_eq!(copy.base_date, original.base_date);
        assert_eq!(copy.administrative_fee_rate, original.administrative_fee_rate);
        assert_eq!(copy.items.len(), original.items.len());
        for (a, b) in original.items.iter().zip(&copy.items) {
            assert_ne!(a.id, b.id);
            assert_eq!(a.level, b.level);
            assert_eq!(a.description, b.description);
            assert_eq!(a.unit, b.unit);
            assert_eq!(a.quantity, b.quantity);
            assert_eq!(a.unit_material_cost, b.unit_material_cost);
            assert_eq!(a.unit_labor_cost, b.unit_labor_cost);
        }

        assert_eq!(coder::codes(&copy.items), coder::codes(&original.items));
        assert_eq!(
            rollup::budget_totals(&copy.items, copy.administrative_fee_rate),
            rollup::budget_totals(&original.items, original.administrative_fee_rate)
        );
        assert_eq!(
            rollup::budget_totals(&copy.items, copy.administrative_fee_rate).grand_total,
            Money::from_cents(769_500)
        );
    }

    #[test]
    fn test_position_and_lookup() {
        let budget = test_budget();
        let id = budget.items[1].id;
        assert_eq!(budget.position(id), Some(1));
        assert_eq!(budget.item(id).map(|i| i.level), Some(ItemLevel::Stage));
        assert_eq!(budget.position(BudgetItemId::new()), None);
    }

    #[test]
    fn test_wire_shape() {
        let budget = test_budget();
        let json = serde_json::to_value(&budget).unwrap();
        assert!(json.get("siteId").is_some());
        assert_eq!(json["baseDate"], "2025-03-01");
        assert_eq!(json["administrativeFeeRate"], 1250);
        assert_eq!(json["status"], "InDevelopment");
        assert!(json["items"][0].get("code").is_none());

        let back: Budget = serde_json::from_value(json).unwrap();
        assert_eq!(back.items, budget.items);
    }
}
