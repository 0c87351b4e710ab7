//! Custom error types for SiteBudget
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for SiteBudget operations
#[derive(Error, Debug)]
pub enum BudgetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// A mutation or model check was rejected
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// The budget store failed to load or save
    #[error("Could not {operation}: {message}")]
    Remote {
        operation: &'static str,
        message: String,
    },

    /// Local storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// User input that could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),
}

impl BudgetError {
    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budget items
    pub fn item_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget item",
            identifier: identifier.into(),
        }
    }

    /// Wrap a store failure for the given operation
    pub fn remote(operation: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Remote {
            operation,
            message: err.to_string(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from the budget store
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for BudgetError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for SiteBudget operations
pub type BudgetResult<T> = Result<T, BudgetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BudgetError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = BudgetError::item_not_found("itm-1234abcd");
        assert_eq!(err.to_string(), "Budget item not found: itm-1234abcd");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_remote_error() {
        let err = BudgetError::remote("save budget", "disk full");
        assert_eq!(err.to_string(), "Could not save budget: disk full");
        assert!(err.is_remote());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BudgetError = io_err.into();
        assert!(matches!(err, BudgetError::Io(_)));
    }
}
