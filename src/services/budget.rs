//! Budget service
//!
//! Business logic on top of the budget store: creating budgets, opening and
//! saving editing sessions, copying a budget to another site, approval and
//! fee changes.

use chrono::NaiveDate;
use tracing::info;

use crate::engine::{rollup, BudgetEditor, BudgetTotals};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, BudgetId, BudgetStatus, Percentage, SiteId};
use crate::reports::BudgetSheet;
use crate::storage::BudgetStore;

/// A budget alongside its computed totals, as shown in listings
#[derive(Debug, Clone)]
pub struct BudgetSummary {
    pub budget: Budget,
    pub totals: BudgetTotals,
}

/// Service for budget management
pub struct BudgetService<'a> {
    store: &'a dyn BudgetStore,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(store: &'a dyn BudgetStore) -> Self {
        Self { store }
    }

    /// Create an empty budget for a site
    pub fn create(
        &self,
        site_id: SiteId,
        base_date: NaiveDate,
        administrative_fee_rate: Percentage,
    ) -> BudgetResult<Budget> {
        validate_fee_rate(administrative_fee_rate)?;

        let budget = Budget::new(site_id, base_date, administrative_fee_rate);
        self.store.save_budget(&budget)?;
        info!(budget = %budget.id, site = %site_id, "created budget");
        Ok(budget)
    }

    /// Get a budget by id
    pub fn get(&self, id: BudgetId) -> BudgetResult<Budget> {
        self.store.fetch_budget(id)
    }

    /// Find a budget by a typed reference (full id or a prefix of it)
    pub fn find(&self, reference: &str) -> BudgetResult<Budget> {
        let mut matches: Vec<_> = self
            .store
            .list_budgets()?
            .into_iter()
            .filter(|b| b.id.matches_ref(reference))
            .collect();

        match matches.len() {
            0 => Err(BudgetError::budget_not_found(reference)),
            1 => Ok(matches.remove(0)),
            n => Err(BudgetError::Validation(format!(
                "'{}' matches {} budgets; use more of the id",
                reference, n
            ))),
        }
    }

    /// All budgets, oldest first
    pub fn list(&self) -> BudgetResult<Vec<Budget>> {
        self.store.list_budgets()
    }

    /// Budgets of one site, oldest first
    pub fn list_for_site(&self, site_id: SiteId) -> BudgetResult<Vec<Budget>> {
        Ok(self
            .store
            .list_budgets()?
            .into_iter()
            .filter(|b| b.site_id == site_id)
            .collect())
    }

    /// Budgets with their totals
    pub fn summaries(&self) -> BudgetResult<Vec<BudgetSummary>> {
        Ok(self
            .store
            .list_budgets()?
            .into_iter()
            .map(|budget| BudgetSummary {
                totals: rollup::budget_totals(&budget.items, budget.administrative_fee_rate),
                budget,
            })
            .collect())
    }

    /// Resolve a site reference against the sites that have budgets
    pub fn find_site(&self, reference: &str) -> BudgetResult<SiteId> {
        if let Ok(site_id) = reference.parse::<SiteId>() {
            return Ok(site_id);
        }

        let mut sites: Vec<SiteId> = self
            .store
            .list_budgets()?
            .into_iter()
            .map(|b| b.site_id)
            .filter(|site| site.matches_ref(reference))
            .collect();
        sites.sort_by_key(|s| *s.as_uuid());
        sites.dedup();

        match sites.len() {
            0 => Err(BudgetError::NotFound {
                entity_type: "Site",
                identifier: reference.to_string(),
            }),
            1 => Ok(sites[0]),
            n => Err(BudgetError::Validation(format!(
                "'{}' matches {} sites; use more of the id",
                reference, n
            ))),
        }
    }

    /// Open an editing session on a budget
    pub fn edit(&self, id: BudgetId) -> BudgetResult<BudgetEditor> {
        Ok(BudgetEditor::new(self.store.fetch_budget(id)?))
    }

    /// Commit pending drafts and save the session's budget
    ///
    /// Nothing is written when the session made no change.
    pub fn save(&self, mut editor: BudgetEditor) -> BudgetResult<Budget> {
        editor.commit_all_drafts()?;
        let dirty = editor.is_dirty();
        let budget = editor.into_budget();
        if dirty {
            self.store.save_budget(&budget)?;
        }
        Ok(budget)
    }

    /// Copy a budget onto another site
    pub fn copy_to_site(&self, id: BudgetId, site_id: SiteId) -> BudgetResult<Budget> {
        let source = self.store.fetch_budget(id)?;
        if source.site_id == site_id {
            return Err(BudgetError::Validation(format!(
                "Budget {} already belongs to site {}; copy it to a different site",
                source.id, site_id
            )));
        }
        let copy = source.copy_to_site(site_id);
        self.store.save_budget(&copy)?;
        info!(
            source = %source.id,
            copy = %copy.id,
            site = %site_id,
            items = copy.items.len(),
            "copied budget to site"
        );
        Ok(copy)
    }

    /// Mark a budget as in use
    pub fn approve(&self, id: BudgetId) -> BudgetResult<Budget> {
        let mut budget = self.store.fetch_budget(id)?;
        if budget.is_in_use() {
            return Ok(budget);
        }

        budget.status = BudgetStatus::InUse;
        budget.touch();
        self.store.save_budget(&budget)?;
        info!(budget = %budget.id, site = %budget.site_id, "approved budget");
        Ok(budget)
    }

    /// Change the administrative fee rate
    pub fn set_fee_rate(&self, id: BudgetId, rate: Percentage) -> BudgetResult<Budget> {
        validate_fee_rate(rate)?;

        let mut budget = self.store.fetch_budget(id)?;
        budget.administrative_fee_rate = rate;
        budget.touch();
        self.store.save_budget(&budget)?;
        Ok(budget)
    }

    /// The coded, costed sheet of a budget
    pub fn sheet(&self, id: BudgetId) -> BudgetResult<BudgetSheet> {
        Ok(BudgetSheet::generate(&self.store.fetch_budget(id)?))
    }
}

fn validate_fee_rate(rate: Percentage) -> BudgetResult<()> {
    if rate.is_negative() {
        return Err(BudgetError::Validation(format!(
            "Administrative fee rate cannot be negative: {}",
            rate
        )));
    }
    Ok(())
}
