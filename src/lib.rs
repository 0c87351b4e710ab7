//! SiteBudget - hierarchical construction budgets
//!
//! This library provides the core of the SiteBudget budgeting tool. A budget
//! is a flat, ordered list of items tagged site, stage, substage or service;
//! hierarchy, codes and totals are derived from list order on every read.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (budgets, items, money, quantities, rates)
//! - `engine`: Coding, cost rollup, editing and reconciliation
//! - `storage`: The budget store boundary and its JSON file implementation
//! - `services`: Business logic layer
//! - `reports`: Budget sheet and execution report
//! - `export`: CSV, JSON and YAML writers
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use sitebudget::config::{paths::SiteBudgetPaths, settings::Settings};
//! use sitebudget::services::BudgetService;
//! use sitebudget::storage::JsonBudgetStore;
//!
//! let paths = SiteBudgetPaths::new()?;
//! let store = JsonBudgetStore::open(paths)?;
//! let sheet = BudgetService::new(&store).sheet(budget_id)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
