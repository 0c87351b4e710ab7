//! Budget item model and its level taxonomy
//!
//! A budget is a flat, ordered list of items. Each item carries one of four
//! levels; only the `Service` level bears cost; the other three group the
//! services that follow them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::BudgetItemId;
use super::money::Money;
use super::quantity::Quantity;

/// Level of an item in the cost breakdown structure, broadest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemLevel {
    Site,
    Stage,
    Substage,
    Service,
}

impl ItemLevel {
    /// All levels in nesting order
    pub const ALL: [ItemLevel; 4] = [
        ItemLevel::Site,
        ItemLevel::Stage,
        ItemLevel::Substage,
        ItemLevel::Service,
    ];

    /// Nesting depth, starting at 1 for `Site`
    pub const fn depth(&self) -> usize {
        match self {
            ItemLevel::Site => 1,
            ItemLevel::Stage => 2,
            ItemLevel::Substage => 3,
            ItemLevel::Service => 4,
        }
    }

    /// Whether items at this level carry quantity and cost
    pub const fn is_cost_bearing(&self) -> bool {
        matches!(self, ItemLevel::Service)
    }
}

impl fmt::Display for ItemLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemLevel::Site => write!(f, "Site"),
            ItemLevel::Stage => write!(f, "Stage"),
            ItemLevel::Substage => write!(f, "Substage"),
            ItemLevel::Service => write!(f, "Service"),
        }
    }
}

impl FromStr for ItemLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "site" => Ok(ItemLevel::Site),
            "stage" => Ok(ItemLevel::Stage),
            "substage" | "sub-stage" => Ok(ItemLevel::Substage),
            "service" => Ok(ItemLevel::Service),
            other => Err(format!(
                "Unknown level '{}': expected site, stage, substage or service",
                other
            )),
        }
    }
}

/// A single line of a budget
///
/// Cost fields are `None` when not applicable (grouping levels) or not yet
/// entered. `None` is never the same as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    /// Stable identifier, unique within its budget
    pub id: BudgetItemId,

    /// Level in the cost breakdown structure
    pub level: ItemLevel,

    /// Free text description
    #[serde(default)]
    pub description: String,

    /// Unit of measure (m², m³, h, un...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_material_cost: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_labor_cost: Option<Money>,
}

impl BudgetItem {
    /// Create a blank item at the given level
    pub fn new(level: ItemLevel) -> Self {
        Self {
            id: BudgetItemId::new(),
            level,
            description: String::new(),
            unit: None,
            quantity: None,
            unit_material_cost: None,
            unit_labor_cost: None,
        }
    }

    /// Create a grouping item (site, stage or substage) with a description
    pub fn group(level: ItemLevel, description: impl Into<String>) -> Self {
        let mut item = Self::new(level);
        item.description = description.into();
        item
    }

    /// Create a fully specified service item
    pub fn service(
        description: impl Into<String>,
        unit: impl Into<String>,
        quantity: Quantity,
        unit_material_cost: Money,
        unit_labor_cost: Money,
    ) -> Self {
        Self {
            id: BudgetItemId::new(),
            level: ItemLevel::Service,
            description: description.into(),
            unit: Some(unit.into()),
            quantity: Some(quantity),
            unit_material_cost: Some(unit_material_cost),
            unit_labor_cost: Some(unit_labor_cost),
        }
    }

    /// Whether this item bears cost (is a service)
    pub fn is_cost_bearing(&self) -> bool {
        self.level.is_cost_bearing()
    }

    /// Whether any cost-related field is set
    pub fn has_cost_fields(&self) -> bool {
        self.unit.is_some()
            || self.quantity.is_some()
            || self.unit_material_cost.is_some()
            || self.unit_labor_cost.is_some()
    }

    /// Drop every cost-related field
    pub fn clear_cost_fields(&mut self) {
        self.unit = None;
        self.quantity = None;
        self.unit_material_cost = None;
        self.unit_labor_cost = None;
    }

    /// Copy of this item with a fresh id
    pub fn duplicate(&self) -> Self {
        Self {
            id: BudgetItemId::new(),
            ..self.clone()
        }
    }

    /// Validate the item
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if !self.is_cost_bearing() && self.has_cost_fields() {
            return Err(ItemValidationError::CostOnGroup(self.level));
        }

        if self.quantity.is_some_and(|q| q.is_negative()) {
            return Err(ItemValidationError::NegativeQuantity);
        }

        if self.unit_material_cost.is_some_and(|c| c.is_negative())
            || self.unit_labor_cost.is_some_and(|c| c.is_negative())
        {
            return Err(ItemValidationError::NegativeCost);
        }

        Ok(())
    }
}

impl fmt::Display for BudgetItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level, self.description)
    }
}

/// Validation errors for budget items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    CostOnGroup(ItemLevel),
    NegativeQuantity,
    NegativeCost,
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CostOnGroup(level) => write!(
                f,
                "{} items cannot carry unit, quantity or cost fields",
                level
            ),
            Self::NegativeQuantity => write!(f, "Quantity cannot be negative"),
            Self::NegativeCost => write!(f, "Unit costs cannot be negative"),
        }
    }
}

impl std::error::Error for ItemValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse() {
        assert_eq!("Stage".parse::<ItemLevel>().unwrap(), ItemLevel::Stage);
        assert_eq!("sub-stage".parse::<ItemLevel>().unwrap(), ItemLevel::Substage);
        assert!("floor".parse::<ItemLevel>().is_err());
    }

    #[test]
    fn test_only_services_bear_cost() {
        assert!(BudgetItem::new(ItemLevel::Service).is_cost_bearing());
        for level in [ItemLevel::Site, ItemLevel::Stage, ItemLevel::Substage] {
            assert!(!BudgetItem::new(level).is_cost_bearing());
        }
    }

    #[test]
    fn test_new_item_is_blank() {
        let item = BudgetItem::new(ItemLevel::Service);
        assert!(item.description.is_empty());
        assert!(!item.has_cost_fields());
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_group_with_cost_is_invalid() {
        let mut item = BudgetItem::group(ItemLevel::Stage, "Foundations");
        item.quantity = Some(Quantity::from_units(1));
        assert_eq!(
            item.validate(),
            Err(ItemValidationError::CostOnGroup(ItemLevel::Stage))
        );

        item.clear_cost_fields();
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_negative_values_are_invalid() {
        let mut item = BudgetItem::new(ItemLevel::Service);
        item.quantity = Some(Quantity::from_units(-1));
        assert_eq!(item.validate(), Err(ItemValidationError::NegativeQuantity));

        item.quantity = None;
        item.unit_labor_cost = Some(Money::from_cents(-1));
        assert_eq!(item.validate(), Err(ItemValidationError::NegativeCost));
    }

    #[test]
    fn test_duplicate_changes_only_id() {
        let item = BudgetItem::service(
            "Concrete",
            "m³",
            Quantity::from_units(3),
            Money::from_cents(40000),
            Money::from_cents(12000),
        );
        let copy = item.duplicate();
        assert_ne!(item.id, copy.id);
        assert_eq!(item.description, copy.description);
        assert_eq!(item.quantity, copy.quantity);
        assert_eq!(item.unit_labor_cost, copy.unit_labor_cost);
    }

    #[test]
    fn test_grouping_serializes_without_cost_fields() {
        let item = BudgetItem::group(ItemLevel::Site, "Tower A");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["level"], "Site");
        assert!(json.get("quantity").is_none());
        assert!(json.get("unitMaterialCost").is_none());

        let mut service = BudgetItem::new(ItemLevel::Service);
        service.unit_material_cost = Some(Money::zero());
        let json = serde_json::to_value(&service).unwrap();
        assert_eq!(json["unitMaterialCost"], 0);
    }
}
