//! Realized amount repository for JSON storage
//!
//! Stands in for the invoice aggregation upstream: it keeps, per site, the
//! realized amount of each budget item in `realized.json`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::BudgetError;
use crate::models::{RealizedAmount, RealizedMap, SiteId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SiteRealized {
    site_id: SiteId,
    #[serde(default)]
    entries: Vec<RealizedAmount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RealizedData {
    #[serde(default)]
    sites: Vec<SiteRealized>,
}

/// Repository for realized amounts, keyed by site
pub struct RealizedRepository {
    path: PathBuf,
    sites: RwLock<HashMap<SiteId, RealizedMap>>,
}

fn lock_error(e: impl std::fmt::Display) -> BudgetError {
    BudgetError::Storage(format!("Failed to acquire realized lock: {}", e))
}

impl RealizedRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            sites: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), BudgetError> {
        let file_data: RealizedData = read_json(&self.path)?;
        let mut sites = self.sites.write().map_err(lock_error)?;

        sites.clear();
        for site in file_data.sites {
            sites.insert(site.site_id, site.entries.into_iter().collect());
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), BudgetError> {
        let sites = self.sites.read().map_err(lock_error)?;

        let mut list: Vec<_> = sites
            .iter()
            .map(|(site_id, map)| {
                let mut entries = map.to_entries();
                entries.sort_by_key(|e| *e.budget_item_id.as_uuid());
                SiteRealized {
                    site_id: *site_id,
                    entries,
                }
            })
            .collect();
        list.sort_by_key(|s| *s.site_id.as_uuid());

        write_json_atomic(&self.path, &RealizedData { sites: list })
    }

    /// Realized list of a site; empty if nothing was recorded
    pub fn get(&self, site_id: SiteId) -> Result<Vec<RealizedAmount>, BudgetError> {
        let sites = self.sites.read().map_err(lock_error)?;
        Ok(sites
            .get(&site_id)
            .map(RealizedMap::to_entries)
            .unwrap_or_default())
    }

    /// Set the realized amount of the given items, leaving others untouched
    pub fn set(&self, site_id: SiteId, entries: &[RealizedAmount]) -> Result<(), BudgetError> {
        let mut sites = self.sites.write().map_err(lock_error)?;
        let map = sites.entry(site_id).or_default();
        for entry in entries {
            map.set(entry.budget_item_id, entry.realized_amount);
        }
        Ok(())
    }
}
