//! Strongly-typed ID wrappers for budgets, budget items and sites
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! entity types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// First eight hex digits, as shown in listings
            pub fn short(&self) -> String {
                self.0.simple().to_string()[..8].to_string()
            }

            /// Check whether a typed reference names this ID
            ///
            /// Accepts the full UUID, the display form (`prefix-xxxxxxxx`) or
            /// any leading run of at least four hex digits.
            pub fn matches_ref(&self, reference: &str) -> bool {
                let reference = reference.trim();
                let reference = reference.strip_prefix($display_prefix).unwrap_or(reference);
                if let Ok(uuid) = Uuid::parse_str(reference) {
                    return uuid == self.0;
                }
                let digits: String = reference.chars().filter(|c| *c != '-').collect();
                digits.len() >= 4
                    && self
                        .0
                        .simple()
                        .to_string()
                        .starts_with(&digits.to_ascii_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.short())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(BudgetId, "bud-");
define_id!(BudgetItemId, "itm-");
define_id!(SiteId, "site-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_creation() {
        let id = BudgetItemId::new();
        assert!(!id.as_uuid().is_nil());
    }

    #[test]
    fn test_id_display() {
        let id = BudgetItemId::new();
        let display = format!("{}", id);
        assert!(display.starts_with("itm-"));
        assert_eq!(display.len(), 12); // "itm-" + 8 chars
    }

    #[test]
    fn test_id_equality() {
        let id1 = BudgetId::new();
        let id2 = id1;
        assert_eq!(id1, id2);
        assert_ne!(id1, BudgetId::new());
    }

    #[test]
    fn test_id_serialization() {
        let id = SiteId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: SiteId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_matches_ref() {
        let id: BudgetItemId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert!(id.matches_ref("550e8400"));
        assert!(id.matches_ref("itm-550e8400"));
        assert!(id.matches_ref("550E"));
        assert!(id.matches_ref("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!id.matches_ref("550"));
        assert!(!id.matches_ref("660e8400"));
    }

    #[test]
    fn test_id_from_str_with_prefix() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let plain: SiteId = uuid_str.parse().unwrap();
        let prefixed: SiteId = format!("site-{}", uuid_str).parse().unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain.as_uuid().to_string(), uuid_str);
    }
}
