//! Quantity of a service, stored in thousandths of its unit

use serde::{Deserialize, Serialize};
use std::fmt;

use super::decimal::{format_scaled, parse_scaled};

/// A measured quantity (m², m³, hours, units...) in thousandths
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    /// Number of stored steps per whole unit
    pub const SCALE: i64 = 1000;

    pub const fn from_thousandths(thousandths: i64) -> Self {
        Self(thousandths)
    }

    pub const fn from_units(units: i64) -> Self {
        Self(units * Self::SCALE)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn thousandths(&self) -> i64 {
        self.0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse "2", "2,5" or "0.125"
    pub fn parse(s: &str) -> Option<Self> {
        parse_scaled(s, 3).map(Self)
    }

    /// Format using the given decimal separator, trimming trailing zeros
    pub fn format(&self, separator: char) -> String {
        format_scaled(self.0, 3, 0, separator)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format('.'))
    }
}
