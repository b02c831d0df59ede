//! Answers and assessments supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AssessmentId, PillarId, QuestionId, Timestamp};

/// One recorded answer to a qualification question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub pillar_id: PillarId,
    pub question_id: QuestionId,
    pub value: String,
    pub timestamp: Timestamp,
    /// Self-reported certainty, expected in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Answer {
    pub fn new(
        pillar_id: impl Into<String>,
        question_id: impl Into<String>,
        value: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            pillar_id: PillarId::new(pillar_id),
            question_id: QuestionId::new(question_id),
            value: value.into(),
            timestamp,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// True when both answers address the same question of the same pillar.
    pub fn same_slot(&self, other: &Answer) -> bool {
        self.pillar_id == other.pillar_id && self.question_id == other.question_id
    }
}

/// A set of answers for one opportunity.
///
/// Holds at most one answer per `(pillar, question)`. The engine never
/// persists assessments; callers own their storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: AssessmentId,
    #[serde(default)]
    pub answers: Vec<Answer>,
    pub created_at: Timestamp,
}

impl Assessment {
    pub fn new() -> Self {
        Self {
            id: AssessmentId::new(),
            answers: Vec::new(),
            created_at: Timestamp::now(),
        }
    }

    pub fn with_id(id: AssessmentId, created_at: Timestamp) -> Self {
        Self {
            id,
            answers: Vec::new(),
            created_at,
        }
    }

    /// Records an answer, replacing any earlier answer to the same question.
    pub fn record(&mut self, answer: Answer) {
        match self.answers.iter_mut().find(|a| a.same_slot(&answer)) {
            Some(existing) => *existing = answer,
            None => self.answers.push(answer),
        }
    }

    /// The live answer for a question, if any.
    pub fn answer_for(&self, pillar_id: &str, question_id: &str) -> Option<&Answer> {
        self.answers
            .iter()
            .find(|a| a.pillar_id.as_str() == pillar_id && a.question_id.as_str() == question_id)
    }
}

impl Default for Assessment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_replaces_same_question() {
        let mut assessment = Assessment::new();
        assessment.record(Answer::new("champion", "champion_access", "partial", Timestamp::from_unix_secs(10)));
        assessment.record(Answer::new("champion", "champion_access", "yes", Timestamp::from_unix_secs(20)));

        assert_eq!(assessment.answers.len(), 1);
        assert_eq!(
            assessment.answer_for("champion", "champion_access").map(|a| a.value.as_str()),
            Some("yes")
        );
    }

    #[test]
    fn record_keeps_distinct_questions() {
        let mut assessment = Assessment::new();
        assessment.record(Answer::new("champion", "q1", "yes", Timestamp::from_unix_secs(10)));
        assessment.record(Answer::new("champion", "q2", "no", Timestamp::from_unix_secs(10)));
        assessment.record(Answer::new("metrics", "q1", "no", Timestamp::from_unix_secs(10)));
        assert_eq!(assessment.answers.len(), 3);
    }

    #[test]
    fn answer_serializes_camel_case() {
        let answer = Answer::new("champion", "champion_access", "yes", Timestamp::from_unix_secs(0))
            .with_confidence(0.8);
        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["pillarId"], "champion");
        assert_eq!(json["questionId"], "champion_access");
        assert_eq!(json["confidence"], 0.8);
    }
}
