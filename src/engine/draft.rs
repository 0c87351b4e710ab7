//! Draft buffer for numeric fields being typed
//!
//! While a value such as `12,5` is being typed it lives here as raw text,
//! keyed by item and field, apart from the committed item. It is parsed and
//! written to the item only on commit, so half-typed input is never
//! reformatted under the cursor.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::models::{BudgetItem, BudgetItemId, Money, Quantity};

use super::mutation::ItemUpdate;

/// Numeric fields of a service that accept typed input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Quantity,
    UnitMaterialCost,
    UnitLaborCost,
}

impl NumericField {
    /// Committed value rendered for editing, with `,` as decimal separator
    pub fn editable_text(&self, item: &BudgetItem) -> String {
        let cost_text = |cost: Option<Money>| {
            cost.map(|c| c.format_plain().replace('.', ","))
                .unwrap_or_default()
        };
        match self {
            NumericField::Quantity => item.quantity.map(|q| q.format(',')).unwrap_or_default(),
            NumericField::UnitMaterialCost => cost_text(item.unit_material_cost),
            NumericField::UnitLaborCost => cost_text(item.unit_labor_cost),
        }
    }

    /// Turn raw text into the update committed for this field
    ///
    /// Blank input clears the field. Input that does not parse, or parses to a
    /// negative number, falls back to the field default: one unit for
    /// quantity, zero for costs.
    pub fn commit(&self, raw: &str) -> ItemUpdate {
        let blank = raw.trim().is_empty();
        match self {
            NumericField::Quantity => {
                let value = if blank {
                    None
                } else {
                    Some(
                        Quantity::parse(raw)
                            .filter(|q| !q.is_negative())
                            .unwrap_or(Quantity::from_units(1)),
                    )
                };
                ItemUpdate::Quantity(value)
            }
            NumericField::UnitMaterialCost | NumericField::UnitLaborCost => {
                let value = if blank {
                    None
                } else {
                    Some(
                        Money::parse(raw)
                            .ok()
                            .filter(|m| !m.is_negative())
                            .unwrap_or_default(),
                    )
                };
                if *self == NumericField::UnitMaterialCost {
                    ItemUpdate::UnitMaterialCost(value)
                } else {
                    ItemUpdate::UnitLaborCost(value)
                }
            }
        }
    }
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericField::Quantity => write!(f, "quantity"),
            NumericField::UnitMaterialCost => write!(f, "unit material cost"),
            NumericField::UnitLaborCost => write!(f, "unit labor cost"),
        }
    }
}

impl FromStr for NumericField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quantity" | "qty" => Ok(NumericField::Quantity),
            "material" | "unit-material-cost" => Ok(NumericField::UnitMaterialCost),
            "labor" | "unit-labor-cost" => Ok(NumericField::UnitLaborCost),
            other => Err(format!("Unknown numeric field: {}", other)),
        }
    }
}

/// Raw text of fields currently being edited
#[derive(Debug, Clone, Default)]
pub struct DraftBuffer {
    drafts: HashMap<(BudgetItemId, NumericField), String>,
}

impl DraftBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing a field, seeding the draft with its committed value
    pub fn begin(&mut self, item: &BudgetItem, field: NumericField) {
        self.drafts
            .insert((item.id, field), field.editable_text(item));
    }

    /// Replace the draft text (one keystroke)
    pub fn set(&mut self, id: BudgetItemId, field: NumericField, raw: impl Into<String>) {
        self.drafts.insert((id, field), raw.into());
    }

    /// Current draft text, if the field is being edited
    pub fn get(&self, id: BudgetItemId, field: NumericField) -> Option<&str> {
        self.drafts.get(&(id, field)).map(String::as_str)
    }

    /// Remove and return a draft
    pub fn take(&mut self, id: BudgetItemId, field: NumericField) -> Option<String> {
        self.drafts.remove(&(id, field))
    }

    /// Drop every draft belonging to an item
    pub fn discard_item(&mut self, id: BudgetItemId) {
        self.drafts.retain(|(item_id, _), _| *item_id != id);
    }

    /// Keys of all pending drafts
    pub fn pending(&self) -> Vec<(BudgetItemId, NumericField)> {
        self.drafts.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }
}
