//! Configuration module for SiteBudget
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::SiteBudgetPaths;
pub use settings::Settings;
