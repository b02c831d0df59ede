//! Priority levels for coaching actions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Percentage;

/// Priority level for improvement actions.
///
/// Ordering puts the most urgent first, so sorting ascending yields
/// critical, high, medium, low.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Returns the display label for this priority.
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Derives the improvement priority from how much of a pillar is satisfied.
    pub fn from_completion(completion: Percentage) -> Priority {
        match completion.value() {
            0..=30 => Priority::Critical,
            31..=50 => Priority::High,
            51..=70 => Priority::Medium,
            // Percentage is constrained to 0-100, so 71+ is always Low
            _ => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_completion_critical() {
        assert_eq!(Priority::from_completion(Percentage::new(0)), Priority::Critical);
        assert_eq!(Priority::from_completion(Percentage::new(30)), Priority::Critical);
    }

    #[test]
    fn from_completion_high() {
        assert_eq!(Priority::from_completion(Percentage::new(31)), Priority::High);
        assert_eq!(Priority::from_completion(Percentage::new(50)), Priority::High);
    }

    #[test]
    fn from_completion_medium() {
        assert_eq!(Priority::from_completion(Percentage::new(51)), Priority::Medium);
        assert_eq!(Priority::from_completion(Percentage::new(70)), Priority::Medium);
    }

    #[test]
    fn from_completion_low() {
        assert_eq!(Priority::from_completion(Percentage::new(71)), Priority::Low);
        assert_eq!(Priority::from_completion(Percentage::HUNDRED), Priority::Low);
    }

    #[test]
    fn sorting_puts_critical_first() {
        let mut priorities = vec![Priority::Low, Priority::Critical, Priority::Medium, Priority::High];
        priorities.sort();
        assert_eq!(
            priorities,
            vec![Priority::Critical, Priority::High, Priority::Medium, Priority::Low]
        );
    }

    #[test]
    fn priority_deserializes_lowercase() {
        let p: Priority = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(p, Priority::Critical);
    }
}
