//! Realized (invoiced) amounts per budget item
//!
//! Realized amounts come from invoice line items apportioned to budget items
//! upstream. This crate only reads them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ids::BudgetItemId;
use super::money::Money;

/// One entry of the realized-amount list returned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealizedAmount {
    pub budget_item_id: BudgetItemId,
    pub realized_amount: Money,
}

impl RealizedAmount {
    pub fn new(budget_item_id: BudgetItemId, realized_amount: Money) -> Self {
        Self {
            budget_item_id,
            realized_amount,
        }
    }
}

/// Realized amounts keyed by budget item id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RealizedMap(HashMap<BudgetItemId, Money>);

impl RealizedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount realized against an item, if any was reported
    pub fn get(&self, id: BudgetItemId) -> Option<Money> {
        self.0.get(&id).copied()
    }

    /// Add an amount to an item; repeated entries accumulate
    pub fn add(&mut self, id: BudgetItemId, amount: Money) {
        *self.0.entry(id).or_default() += amount;
    }

    /// Replace the amount for an item
    pub fn set(&mut self, id: BudgetItemId, amount: Money) {
        self.0.insert(id, amount);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &BudgetItemId> {
        self.0.keys()
    }

    /// Back to the list shape used on the wire
    pub fn to_entries(&self) -> Vec<RealizedAmount> {
        self.0
            .iter()
            .map(|(id, amount)| RealizedAmount::new(*id, *amount))
            .collect()
    }
}

impl FromIterator<RealizedAmount> for RealizedMap {
    fn from_iter<I: IntoIterator<Item = RealizedAmount>>(iter: I) -> Self {
        let mut map = RealizedMap::new();
        for entry in iter {
            map.add(entry.budget_item_id, entry.realized_amount);
        }
        map
    }
}
