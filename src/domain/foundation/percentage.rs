//! Percentage value object (0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValueError;

/// A whole-number value between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// Fifty percent.
    pub const HALF: Self = Self(50);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a new Percentage, clamping to valid range.
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Creates a Percentage, returning error if out of range.
    pub fn try_new(value: u8) -> Result<Self, ValueError> {
        if value > 100 {
            return Err(ValueError::out_of_range("percentage", 0, 100, i64::from(value)));
        }
        Ok(Self(value))
    }

    /// Percentage of `part` in `whole`, rounded down.
    ///
    /// A zero `whole` yields zero rather than dividing by zero.
    pub fn of(part: u32, whole: u32) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let pct = (u64::from(part) * 100) / u64::from(whole);
        Self(pct.min(100) as u8)
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns the value as a fraction (0.0 to 1.0).
    pub fn as_fraction(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// True when `part / whole` is strictly below this percentage.
    ///
    /// Uses integer cross-multiplication so 149/300 is below 50% even though
    /// it floors to 49 and 150/300 is not.
    pub fn exceeds_ratio(&self, part: u32, whole: u32) -> bool {
        if whole == 0 {
            return self.0 > 0;
        }
        u64::from(part) * 100 < u64::from(self.0) * u64::from(whole)
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
