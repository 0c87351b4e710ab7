//! Reports
//!
//! The budget sheet and the execution report. Both are plain data built from
//! the engine; rendering to the terminal lives here, file formats live in
//! `export`.

pub mod budget_sheet;
pub mod execution;

pub use budget_sheet::{BudgetSheet, SheetRow};
pub use execution::{ExecutionReport, ExecutionRow};
