//! Percentage stored in hundredths of a percent
//!
//! Used for the administrative fee rate (e.g. 12.5% is stored as 1250) and for
//! percent-executed figures in reconciliation reports.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::decimal::{format_scaled, parse_scaled};

/// A percentage in basis points (1/100 of a percent)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Percentage(i64);

impl Percentage {
    /// Number of stored steps per whole percent
    pub const SCALE: i64 = 100;

    pub const fn from_basis_points(basis_points: i64) -> Self {
        Self(basis_points)
    }

    pub const fn from_whole(percent: i64) -> Self {
        Self(percent * Self::SCALE)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn basis_points(&self) -> i64 {
        self.0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parse "12,5", "12.5" or "12.5%"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let s = s.strip_suffix('%').unwrap_or(s);
        parse_scaled(s, 2).map(Self)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", format_scaled(self.0, 2, 2, '.'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Percentage::parse("12,5"), Some(Percentage::from_basis_points(1250)));
        assert_eq!(Percentage::parse("10%"), Some(Percentage::from_whole(10)));
        assert_eq!(Percentage::parse("abc"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Percentage::from_basis_points(1250).to_string(), "12.50%");
        assert_eq!(Percentage::from_whole(50).to_string(), "50.00%");
    }
}
