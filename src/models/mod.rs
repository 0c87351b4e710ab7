//! Core data models for SiteBudget
//!
//! This module contains the data structures of the budget domain: budgets,
//! their flat item lists, identifiers, and the scaled-integer amount types.

pub mod budget;
pub mod decimal;
pub mod ids;
pub mod item;
pub mod money;
pub mod percentage;
pub mod quantity;
pub mod realized;

pub use budget::{Budget, BudgetStatus};
pub use ids::{BudgetId, BudgetItemId, SiteId};
pub use item::{BudgetItem, ItemLevel, ItemValidationError};
pub use money::Money;
pub use percentage::Percentage;
pub use quantity::Quantity;
pub use realized::{RealizedAmount, RealizedMap};
