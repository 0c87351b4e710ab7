//! Editing of the flat item list
//!
//! [`BudgetEditor`] owns a budget while it is being edited and is the only
//! path through which items are added, changed or removed. Codes and totals
//! are never stored; they are recomputed from the list on every read.

use tracing::{debug, warn};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, BudgetItem, BudgetItemId, ItemLevel, Money, Quantity};

use super::coder;
use super::draft::{DraftBuffer, NumericField};
use super::rollup::{self, BudgetTotals};

/// A change to one field of one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemUpdate {
    Description(String),
    Unit(Option<String>),
    Quantity(Option<Quantity>),
    UnitMaterialCost(Option<Money>),
    UnitLaborCost(Option<Money>),
}

impl ItemUpdate {
    /// Whether this update targets a field only services may carry
    pub fn is_cost_field(&self) -> bool {
        !matches!(self, ItemUpdate::Description(_))
    }

    /// Whether this update clears its field
    fn clears(&self) -> bool {
        match self {
            ItemUpdate::Description(_) => false,
            ItemUpdate::Unit(v) => v.as_deref().map_or(true, |u| u.trim().is_empty()),
            ItemUpdate::Quantity(v) => v.is_none(),
            ItemUpdate::UnitMaterialCost(v) => v.is_none(),
            ItemUpdate::UnitLaborCost(v) => v.is_none(),
        }
    }

    fn apply(self, item: &mut BudgetItem) {
        match self {
            ItemUpdate::Description(v) => item.description = v,
            ItemUpdate::Unit(v) => item.unit = v.filter(|u| !u.trim().is_empty()),
            ItemUpdate::Quantity(v) => item.quantity = v,
            ItemUpdate::UnitMaterialCost(v) => item.unit_material_cost = v,
            ItemUpdate::UnitLaborCost(v) => item.unit_labor_cost = v,
        }
    }
}

/// In-memory editing session over one budget
#[derive(Debug, Clone)]
pub struct BudgetEditor {
    budget: Budget,
    drafts: DraftBuffer,
    dirty: bool,
}

impl BudgetEditor {
    /// Start editing a budget
    pub fn new(budget: Budget) -> Self {
        Self {
            budget,
            drafts: DraftBuffer::new(),
            dirty: false,
        }
    }

    /// The budget as currently edited
    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Finish editing and hand back the budget
    pub fn into_budget(self) -> Budget {
        self.budget
    }

    /// Whether any change has been made since the session started
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn items(&self) -> &[BudgetItem] {
        &self.budget.items
    }

    /// Current codes of every item
    pub fn codes(&self) -> Vec<String> {
        coder::codes(&self.budget.items)
    }

    /// Current totals
    pub fn totals(&self) -> BudgetTotals {
        rollup::budget_totals(&self.budget.items, self.budget.administrative_fee_rate)
    }

    fn index_of(&self, id: BudgetItemId) -> BudgetResult<usize> {
        self.budget
            .position(id)
            .ok_or_else(|| BudgetError::item_not_found(id.to_string()))
    }

    fn mark_changed(&mut self) {
        self.dirty = true;
        self.budget.touch();
    }

    /// Add a blank item at the end
    pub fn append(&mut self, level: ItemLevel) -> BudgetItemId {
        let item = BudgetItem::new(level);
        let id = item.id;
        self.budget.items.push(item);
        self.mark_changed();
        debug!(item = %id, %level, "appended budget item");
        id
    }

    /// Add a blank item right after `anchor`
    ///
    /// An unknown anchor is not an error: the item goes to the end instead.
    pub fn insert_after(&mut self, anchor: BudgetItemId, level: ItemLevel) -> BudgetItemId {
        let Some(index) = self.budget.position(anchor) else {
            warn!(anchor = %anchor, "anchor item not found, appending instead");
            return self.append(level);
        };

        let item = BudgetItem::new(level);
        let id = item.id;
        self.budget.items.insert(index + 1, item);
        self.mark_changed();
        debug!(item = %id, %level, after = %anchor, "inserted budget item");
        id
    }

    /// Change one field of one item
    ///
    /// Setting a unit, quantity or cost on a grouping item is rejected, as is
    /// any value that would leave the item invalid. Clearing a cost field is
    /// always allowed.
    pub fn update(&mut self, id: BudgetItemId, update: ItemUpdate) -> BudgetResult<()> {
        let index = self.index_of(id)?;
        let current = &self.budget.items[index];

        if update.is_cost_field() && !current.is_cost_bearing() && !update.clears() {
            return Err(BudgetError::Validation(format!(
                "{} items cannot carry unit, quantity or cost fields",
                current.level
            )));
        }

        let mut changed = current.clone();
        update.apply(&mut changed);
        changed
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.budget.items[index] = changed;
        self.mark_changed();
        debug!(item = %id, "updated budget item");
        Ok(())
    }

    /// Move an item to another level
    ///
    /// Leaving the service level drops the unit, quantity and cost fields.
    pub fn set_level(&mut self, id: BudgetItemId, level: ItemLevel) -> BudgetResult<()> {
        let index = self.index_of(id)?;
        let item = &mut self.budget.items[index];
        if item.level == level {
            return Ok(());
        }

        item.level = level;
        if !level.is_cost_bearing() {
            item.clear_cost_fields();
            self.drafts.discard_item(id);
        }
        self.mark_changed();
        debug!(item = %id, %level, "changed budget item level");
        Ok(())
    }

    /// Delete exactly one item
    ///
    /// Items that were nested under it stay where they are and fall under
    /// whichever preceding item now qualifies as their parent.
    pub fn remove(&mut self, id: BudgetItemId) -> BudgetResult<BudgetItem> {
        let index = self.index_of(id)?;
        let removed = self.budget.items.remove(index);
        self.drafts.discard_item(id);
        self.mark_changed();
        debug!(item = %id, level = %removed.level, "removed budget item");
        Ok(removed)
    }

    /// Start typing into a numeric field, seeded with its committed value
    pub fn begin_draft(&mut self, id: BudgetItemId, field: NumericField) -> BudgetResult<()> {
        let index = self.index_of(id)?;
        self.ensure_service(index, field)?;
        self.drafts.begin(&self.budget.items[index], field);
        Ok(())
    }

    /// Replace the raw text of a numeric field being typed
    pub fn set_draft(
        &mut self,
        id: BudgetItemId,
        field: NumericField,
        raw: impl Into<String>,
    ) -> BudgetResult<()> {
        let index = self.index_of(id)?;
        self.ensure_service(index, field)?;
        self.drafts.set(id, field, raw);
        Ok(())
    }

    /// Raw text of a field being typed
    pub fn draft(&self, id: BudgetItemId, field: NumericField) -> Option<&str> {
        self.drafts.get(id, field)
    }

    /// Parse a draft and write it to the item
    ///
    /// Returns the update that was applied, or `None` if the field had no
    /// pending draft.
    pub fn commit_draft(
        &mut self,
        id: BudgetItemId,
        field: NumericField,
    ) -> BudgetResult<Option<ItemUpdate>> {
        let Some(raw) = self.drafts.take(id, field) else {
            return Ok(None);
        };
        let update = field.commit(&raw);
        self.update(id, update.clone())?;
        Ok(Some(update))
    }

    /// Commit every pending draft (e.g. before saving)
    pub fn commit_all_drafts(&mut self) -> BudgetResult<usize> {
        let pending = self.drafts.pending();
        let mut committed = 0;
        for (id, field) in pending {
            if self.commit_draft(id, field)?.is_some() {
                committed += 1;
            }
        }
        Ok(committed)
    }

    fn ensure_service(&self, index: usize, field: NumericField) -> BudgetResult<()> {
        let item = &self.budget.items[index];
        if item.is_cost_bearing() {
            Ok(())
        } else {
            Err(BudgetError::Validation(format!(
                "{} items have no {}",
                item.level, field
            )))
        }
    }
}
