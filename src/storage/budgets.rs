//! Budget repository for JSON storage
//!
//! Keeps every budget (with its flat item list) in `budgets.json`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{Budget, BudgetId, SiteId};

use super::file_io::{read_json, write_json_atomic};

/// On-disk layout of budgets.json
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<HashMap<BudgetId, Budget>>,
}

fn lock_error(e: impl std::fmt::Display) -> BudgetError {
    BudgetError::Storage(format!("Failed to acquire budget lock: {}", e))
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk
    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: BudgetData = read_json(&self.path)?;
        let mut budgets = self.budgets.write().map_err(lock_error)?;

        budgets.clear();
        for budget in file_data.budgets {
            budgets.insert(budget.id, budget);
        }
        Ok(())
    }

    /// Save budgets to disk, oldest first
    pub fn save(&self) -> Result<(), BudgetError> {
        let budgets = self.budgets.read().map_err(lock_error)?;

        let mut list: Vec<_> = budgets.values().cloned().collect();
        list.sort_by_key(|b| b.created_at);

        write_json_atomic(&self.path, &BudgetData { budgets: list })
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, BudgetError> {
        let budgets = self.budgets.read().map_err(lock_error)?;
        Ok(budgets.get(&id).cloned())
    }

    /// All budgets, oldest first
    pub fn get_all(&self) -> Result<Vec<Budget>, BudgetError> {
        let budgets = self.budgets.read().map_err(lock_error)?;
        let mut list: Vec<_> = budgets.values().cloned().collect();
        list.sort_by_key(|b| b.created_at);
        Ok(list)
    }

    /// Budgets of one site, oldest first
    pub fn get_by_site(&self, site_id: SiteId) -> Result<Vec<Budget>, BudgetError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|b| b.site_id == site_id)
            .collect())
    }

    /// Insert or replace a budget
    pub fn upsert(&self, budget: Budget) -> Result<(), BudgetError> {
        let mut budgets = self.budgets.write().map_err(lock_error)?;
        budgets.insert(budget.id, budget);
        Ok(())
    }

    pub fn delete(&self, id: BudgetId) -> Result<bool, BudgetError> {
        let mut budgets = self.budgets.write().map_err(lock_error)?;
        Ok(budgets.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let budgets = self.budgets.read().map_err(lock_error)?;
        Ok(budgets.len())
    }
}
