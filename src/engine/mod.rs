//! Hierarchical budget engine
//!
//! Pure, synchronous functions over the flat item list:
//!
//! - `coder`: dotted position codes rebuilt from list order
//! - `rollup`: service totals, group totals, subtotal, fee and grand total
//! - `mutation`: the editing session that owns every change to the list
//! - `draft`: raw text buffer for numeric fields being typed
//! - `merge`: budgeted vs. realized reconciliation
//!
//! Every view (editor, listing, sheet export, execution report) goes through
//! these functions rather than recomputing codes or totals on its own.

pub mod coder;
pub mod draft;
pub mod merge;
pub mod mutation;
pub mod rollup;

pub use coder::{code, codes};
pub use draft::{DraftBuffer, NumericField};
pub use merge::{merge, percent_executed, ReconciledItem, ReconciliationTotals};
pub use mutation::{BudgetEditor, ItemUpdate};
pub use rollup::{budget_totals, group_total, service_totals, BudgetTotals, ServiceTotals};
