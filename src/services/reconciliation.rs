//! Reconciliation service
//!
//! Loads a site's approved budget and the realized amounts invoiced against
//! it, and records new realized amounts, either one at a time or from a CSV
//! file with `budgetItemId,realizedAmount` columns.

use std::collections::HashMap;

use csv::StringRecord;
use tracing::{info, warn};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Budget, BudgetItemId, Money, RealizedAmount, RealizedMap, SiteId};
use crate::reports::ExecutionReport;
use crate::storage::BudgetStore;

/// Outcome of a realized amount import
#[derive(Debug, Clone, Default)]
pub struct RealizedImport {
    /// Entries recorded, after summing duplicate ids
    pub recorded: usize,
    /// Rows that named no item of the approved budget
    pub unknown_items: usize,
    /// Error messages by data row (1-based)
    pub errors: HashMap<usize, String>,
}

/// Service for budgeted vs. realized reconciliation
pub struct ReconciliationService<'a> {
    store: &'a dyn BudgetStore,
}

impl<'a> ReconciliationService<'a> {
    pub fn new(store: &'a dyn BudgetStore) -> Self {
        Self { store }
    }

    /// The approved budget of a site
    pub fn approved_budget(&self, site_id: SiteId) -> BudgetResult<Budget> {
        self.store
            .fetch_approved_budget(site_id)?
            .ok_or_else(|| BudgetError::NotFound {
                entity_type: "Approved budget for site",
                identifier: site_id.to_string(),
            })
    }

    /// Realized amounts of a site, duplicates summed
    pub fn realized(&self, site_id: SiteId) -> BudgetResult<RealizedMap> {
        Ok(self.store.fetch_realized(site_id)?.into_iter().collect())
    }

    /// Budgeted vs. realized for the approved budget of a site
    pub fn execution_report(&self, site_id: SiteId) -> BudgetResult<ExecutionReport> {
        let budget = self.approved_budget(site_id)?;
        let realized = self.realized(site_id)?;
        Ok(ExecutionReport::generate(&budget, &realized))
    }

    /// Record the realized amount of one item of the approved budget
    pub fn set_realized(
        &self,
        site_id: SiteId,
        item_id: BudgetItemId,
        amount: Money,
    ) -> BudgetResult<RealizedAmount> {
        if amount.is_negative() {
            return Err(BudgetError::Validation(format!(
                "Realized amount cannot be negative: {}",
                amount
            )));
        }

        let budget = self.approved_budget(site_id)?;
        if budget.item(item_id).is_none() {
            return Err(BudgetError::item_not_found(item_id.to_string()));
        }

        let entry = RealizedAmount::new(item_id, amount);
        self.store.save_realized(site_id, &[entry])?;
        Ok(entry)
    }

    /// Import realized amounts from CSV
    ///
    /// Rows that fail to parse are reported and skipped. Rows naming the same
    /// item are summed before being recorded; rows for items outside the
    /// approved budget are skipped.
    pub fn import_realized_csv<R: std::io::Read>(
        &self,
        site_id: SiteId,
        reader: R,
    ) -> BudgetResult<RealizedImport> {
        let budget = self.approved_budget(site_id)?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| BudgetError::Import(format!("Error reading CSV header: {}", e)))?
            .clone();
        let id_column = column(&headers, "budgetItemId")?;
        let amount_column = column(&headers, "realizedAmount")?;

        let mut result = RealizedImport::default();
        let mut totals = RealizedMap::new();

        for (idx, record) in reader.records().enumerate() {
            let row = idx + 1;
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    result
                        .errors
                        .insert(row, format!("Error reading CSV record: {}", e));
                    continue;
                }
            };

            match parse_row(&record, id_column, amount_column) {
                Ok(entry) if budget.item(entry.budget_item_id).is_none() => {
                    result.unknown_items += 1;
                }
                Ok(entry) => totals.add(entry.budget_item_id, entry.realized_amount),
                Err(message) => {
                    result.errors.insert(row, message);
                }
            }
        }

        if result.unknown_items > 0 {
            warn!(
                unknown = result.unknown_items,
                "skipped realized rows for items outside the approved budget"
            );
        }

        let entries = totals.to_entries();
        if !entries.is_empty() {
            self.store.save_realized(site_id, &entries)?;
        }
        result.recorded = entries.len();
        info!(
            site = %site_id,
            recorded = result.recorded,
            errors = result.errors.len(),
            "imported realized amounts"
        );
        Ok(result)
    }
}

fn column(headers: &StringRecord, name: &str) -> BudgetResult<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| BudgetError::Import(format!("Missing '{}' column", name)))
}

fn parse_row(
    record: &StringRecord,
    id_column: usize,
    amount_column: usize,
) -> Result<RealizedAmount, String> {
    let id_text = record
        .get(id_column)
        .ok_or_else(|| "Missing budgetItemId".to_string())?;
    let budget_item_id: BudgetItemId = id_text
        .parse()
        .map_err(|_| format!("Invalid budget item id: {}", id_text))?;

    let amount_text = record
        .get(amount_column)
        .ok_or_else(|| "Missing realizedAmount".to_string())?;
    let amount =
        Money::parse(amount_text).map_err(|e| format!("Invalid amount '{}': {}", amount_text, e))?;
    if amount.is_negative() {
        return Err(format!("Negative amount: {}", amount_text));
    }

    Ok(RealizedAmount::new(budget_item_id, amount))
}
