//! Budget store boundary
//!
//! The budget engine treats persistence as a plain request/response
//! collaborator described by [`BudgetStore`]. Failures surface to the caller as
//! [`BudgetError::Remote`]; there is no retry and the last save wins.
//!
//! [`JsonBudgetStore`] implements the boundary with JSON files and atomic
//! writes.

pub mod budgets;
pub mod file_io;
pub mod realized;

pub use budgets::BudgetRepository;
pub use file_io::{read_json, write_json_atomic};
pub use realized::RealizedRepository;

use tracing::info;

use crate::config::paths::SiteBudgetPaths;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, BudgetId, BudgetStatus, RealizedAmount, SiteId};

/// Where budgets and realized amounts are loaded from and saved to
pub trait BudgetStore {
    /// Fetch one budget with its items
    fn fetch_budget(&self, id: BudgetId) -> BudgetResult<Budget>;

    /// Create or replace a budget
    fn save_budget(&self, budget: &Budget) -> BudgetResult<()>;

    /// Every budget, oldest first
    fn list_budgets(&self) -> BudgetResult<Vec<Budget>>;

    /// The budget of a site that is in use, if one was approved
    fn fetch_approved_budget(&self, site_id: SiteId) -> BudgetResult<Option<Budget>>;

    /// Realized amounts recorded against a site's budget items
    fn fetch_realized(&self, site_id: SiteId) -> BudgetResult<Vec<RealizedAmount>>;

    /// Record realized amounts for some of a site's budget items
    fn save_realized(&self, site_id: SiteId, entries: &[RealizedAmount]) -> BudgetResult<()>;
}

/// JSON-file budget store
pub struct JsonBudgetStore {
    paths: SiteBudgetPaths,
    budgets: BudgetRepository,
    realized: RealizedRepository,
}

impl JsonBudgetStore {
    /// Open the store, creating its directories and loading its files
    pub fn open(paths: SiteBudgetPaths) -> BudgetResult<Self> {
        paths.ensure_directories()?;

        let store = Self {
            budgets: BudgetRepository::new(paths.budgets_file()),
            realized: RealizedRepository::new(paths.realized_file()),
            paths,
        };
        store
            .budgets
            .load()
            .map_err(|e| BudgetError::remote("load budgets", e))?;
        store
            .realized
            .load()
            .map_err(|e| BudgetError::remote("load realized amounts", e))?;
        Ok(store)
    }

    pub fn paths(&self) -> &SiteBudgetPaths {
        &self.paths
    }
}

impl BudgetStore for JsonBudgetStore {
    fn fetch_budget(&self, id: BudgetId) -> BudgetResult<Budget> {
        self.budgets
            .get(id)
            .map_err(|e| BudgetError::remote("load budget", e))?
            .ok_or_else(|| BudgetError::budget_not_found(id.to_string()))
    }

    fn save_budget(&self, budget: &Budget) -> BudgetResult<()> {
        self.budgets
            .upsert(budget.clone())
            .and_then(|_| self.budgets.save())
            .map_err(|e| BudgetError::remote("save budget", e))?;
        info!(budget = %budget.id, items = budget.items.len(), "saved budget");
        Ok(())
    }

    fn list_budgets(&self) -> BudgetResult<Vec<Budget>> {
        self.budgets
            .get_all()
            .map_err(|e| BudgetError::remote("list budgets", e))
    }

    fn fetch_approved_budget(&self, site_id: SiteId) -> BudgetResult<Option<Budget>> {
        let budgets = self
            .budgets
            .get_by_site(site_id)
            .map_err(|e| BudgetError::remote("load budgets", e))?;
        // The most recently approved budget wins if several are in use
        Ok(budgets
            .into_iter()
            .filter(|b| b.status == BudgetStatus::InUse)
            .max_by_key(|b| b.updated_at))
    }

    fn fetch_realized(&self, site_id: SiteId) -> BudgetResult<Vec<RealizedAmount>> {
        self.realized
            .get(site_id)
            .map_err(|e| BudgetError::remote("load realized amounts", e))
    }

    fn save_realized(&self, site_id: SiteId, entries: &[RealizedAmount]) -> BudgetResult<()> {
        self.realized
            .set(site_id, entries)
            .and_then(|_| self.realized.save())
            .map_err(|e| BudgetError::remote("save realized amounts", e))?;
        info!(site = %site_id, entries = entries.len(), "saved realized amounts");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetItemId, Money, Percentage};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, JsonBudgetStore) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SiteBudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = JsonBudgetStore::open(paths).unwrap();
        (temp_dir, store)
    }

    fn budget(site: SiteId) -> Budget {
        Budget::new(
            site,
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            Percentage::from_whole(8),
        )
    }

    #[test]
    fn test_open_creates_directories() {
        let (temp_dir, _store) = open_store();
        assert!(temp_dir.path().join("data").exists());
    }

    #[test]
    fn test_fetch_missing_budget() {
        let (_temp_dir, store) = open_store();
        let err = store.fetch_budget(BudgetId::new()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_save_is_visible_after_reopen() {
        let (temp_dir, store) = open_store();
        let b = budget(SiteId::new());
        store.save_budget(&b).unwrap();

        let paths = SiteBudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let reopened = JsonBudgetStore::open(paths).unwrap();
        assert_eq!(reopened.fetch_budget(b.id).unwrap().site_id, b.site_id);
        assert_eq!(reopened.list_budgets().unwrap().len(), 1);
    }

    #[test]
    fn test_fetch_approved_budget() {
        let (_temp_dir, store) = open_store();
        let site = SiteId::new();
        let draft = budget(site);
        store.save_budget(&draft).unwrap();
        assert!(store.fetch_approved_budget(site).unwrap().is_none());

        let mut approved = budget(site);
        approved.status = BudgetStatus::InUse;
        store.save_budget(&approved).unwrap();

        let found = store.fetch_approved_budget(site).unwrap().unwrap();
        assert_eq!(found.id, approved.id);
        assert!(store.fetch_approved_budget(SiteId::new()).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_a_remote_failure() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SiteBudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.budgets_file(), "{ broken").unwrap();

        let err = JsonBudgetStore::open(paths).err().unwrap();
        assert!(err.is_remote());
    }

    #[test]
    fn test_realized_round_trip() {
        let (_temp_dir, store) = open_store();
        let site = SiteId::new();
        let entry = RealizedAmount::new(BudgetItemId::new(), Money::from_cents(4200));

        store.save_realized(site, &[entry]).unwrap();

        assert_eq!(store.fetch_realized(site).unwrap(), vec![entry]);
        assert!(store.fetch_realized(SiteId::new()).unwrap().is_empty());
    }
}
