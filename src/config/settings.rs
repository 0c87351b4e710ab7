//! User settings for SiteBudget
//!
//! Manages display preferences, the default administrative fee for new
//! budgets, and the log filter.

use serde::{Deserialize, Serialize};

use super::paths::SiteBudgetPaths;
use crate::error::BudgetError;
use crate::models::Percentage;

/// User settings for SiteBudget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used in terminal output
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Administrative fee applied to new budgets
    #[serde(default = "default_fee_rate")]
    pub default_fee_rate: Percentage,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Default `tracing` filter when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_fee_rate() -> Percentage {
    Percentage::zero()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            default_fee_rate: default_fee_rate(),
            date_format: default_date_format(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &SiteBudgetPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BudgetError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BudgetError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SiteBudgetPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BudgetError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BudgetError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
