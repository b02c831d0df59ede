//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a qualification pillar (e.g. `"champion"`).
///
/// Pillar ids come from configuration, so they are free-form strings rather
/// than generated UUIDs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PillarId(String);

impl PillarId {
    /// Creates a PillarId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PillarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PillarId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Borrow<str> for PillarId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier of a question. Unique across a whole configuration, not only
/// within its pillar.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a QuestionId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Borrow<str> for QuestionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for an assessment owned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentId(Uuid);

impl AssessmentId {
    /// Creates a new random AssessmentId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an AssessmentId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AssessmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssessmentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pillar_id_displays_inner_value() {
        assert_eq!(PillarId::new("champion").to_string(), "champion");
    }

    #[test]
    fn pillar_id_serializes_transparently() {
        let json = serde_json::to_string(&PillarId::new("metrics")).unwrap();
        assert_eq!(json, "\"metrics\"");
    }

    #[test]
    fn question_id_deserializes_from_plain_string() {
        let id: QuestionId = serde_json::from_str("\"champion_access\"").unwrap();
        assert_eq!(id.as_str(), "champion_access");
    }

    #[test]
    fn question_id_is_usable_as_str_key() {
        let mut map = std::collections::HashMap::new();
        map.insert(QuestionId::new("q1"), 3);
        assert_eq!(map.get("q1"), Some(&3));
    }

    #[test]
    fn assessment_id_new_generates_unique_ids() {
        assert_ne!(AssessmentId::new(), AssessmentId::new());
    }

    #[test]
    fn assessment_id_parses_from_string() {
        let id = AssessmentId::new();
        let parsed: AssessmentId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn assessment_id_rejects_invalid_string() {
        assert!("not-a-uuid".parse::<AssessmentId>().is_err());
    }
}
