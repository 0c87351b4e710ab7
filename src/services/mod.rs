//! Service layer for SiteBudget
//!
//! The service layer provides business logic on top of the budget store,
//! handling validation, lookups by typed reference and report assembly.

pub mod budget;
pub mod reconciliation;

pub use budget::{BudgetService, BudgetSummary};
pub use reconciliation::{RealizedImport, ReconciliationService};
