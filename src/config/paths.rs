//! Path management for SiteBudget
//!
//! ## Path Resolution Order
//!
//! 1. `SITEBUDGET_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory reported by `directories`
//!    (`~/.config/sitebudget` on Linux, `%APPDATA%\sitebudget` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::BudgetError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "SITEBUDGET_DATA_DIR";

/// Manages all paths used by SiteBudget
#[derive(Debug, Clone)]
pub struct SiteBudgetPaths {
    base_dir: PathBuf,
}

impl SiteBudgetPaths {
    /// Resolve the base directory from the environment or the platform
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, BudgetError> {
        let base_dir = match std::env::var_os(DATA_DIR_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => ProjectDirs::from("", "", "sitebudget")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    BudgetError::Config("Could not determine a configuration directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths under a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the budget store files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Default directory for exports
    pub fn export_dir(&self) -> PathBuf {
        self.base_dir.join("exports")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// All budgets, with their items
    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Realized amounts per site and budget item
    pub fn realized_file(&self) -> PathBuf {
        self.data_dir().join("realized.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), BudgetError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BudgetError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if SiteBudget has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}
