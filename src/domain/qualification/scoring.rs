//! ScoringEngine - Turns answers into pillar scores and a deal-health level.
//!
//! # Resolution Rules
//!
//! 1. The latest answer per `(pillar, question)` wins, by timestamp. On equal
//!    timestamps the answer later in the input wins.
//! 2. The winning value is matched against the question's options. A value
//!    with no matching option leaves the question unanswered (score 0).
//! 3. Answers naming an unknown pillar or question are ignored.
//!
//! Scoring is pure: the same inputs produce bit-identical output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::answer::{Answer, Assessment};
use super::definition::{Pillar, Question};
use super::thresholds::{LevelClassification, ScoreThresholds};
use crate::domain::foundation::{
    AssessmentId, Percentage, PillarId, Priority, QuestionId, Timestamp,
};

/// Outcome for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub pillar_id: PillarId,
    pub question_id: QuestionId,
    /// Matched option value; `None` when unanswered.
    pub value: Option<String>,
    pub score: u32,
    /// Lowest option score, i.e. the "gap" score for this question.
    pub min_score: u32,
    pub max_score: u32,
    pub answered: bool,
}

impl QuestionResult {
    /// Answered at the lowest available option.
    pub fn is_at_minimum(&self) -> bool {
        self.answered && self.score == self.min_score
    }
}

/// Score for one pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarScore {
    pub pillar_id: PillarId,
    pub score: u32,
    pub max_score: u32,
    pub percentage: Percentage,
    /// How urgently this pillar needs work, derived from `percentage`.
    pub priority: Priority,
    pub answered_questions: usize,
    pub total_questions: usize,
}

impl PillarScore {
    pub fn has_answers(&self) -> bool {
        self.answered_questions > 0
    }
}

/// First and last timestamps of the resolved answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSpan {
    pub first: Timestamp,
    pub last: Timestamp,
    pub answer_count: usize,
}

impl AnswerSpan {
    /// Seconds between the first and last answer, with millisecond precision.
    pub fn duration_secs(&self) -> f64 {
        self.last.duration_since(&self.first).num_milliseconds() as f64 / 1000.0
    }
}

/// The derived score of an assessment. Never stored as a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredAssessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment_id: Option<AssessmentId>,
    pub pillar_scores: Vec<PillarScore>,
    pub total_score: u32,
    pub max_score: u32,
    pub level: LevelClassification,
    /// Mean answer confidence over all questions, in `[0, 1]`.
    pub confidence: f64,
    pub question_results: Vec<QuestionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_span: Option<AnswerSpan>,
}

impl ScoredAssessment {
    pub fn pillar_score(&self, pillar_id: &str) -> Option<&PillarScore> {
        self.pillar_scores.iter().find(|p| p.pillar_id.as_str() == pillar_id)
    }

    /// Results for the questions of one pillar, in declaration order.
    pub fn questions_of<'a>(
        &'a self,
        pillar_id: &'a str,
    ) -> impl Iterator<Item = &'a QuestionResult> + 'a {
        self.question_results
            .iter()
            .filter(move |q| q.pillar_id.as_str() == pillar_id)
    }

    pub fn question_result(&self, question_id: &str) -> Option<&QuestionResult> {
        self.question_results
            .iter()
            .find(|q| q.question_id.as_str() == question_id)
    }

    /// True when every pillar has at least one answered question.
    pub fn is_complete(&self) -> bool {
        !self.pillar_scores.is_empty() && self.pillar_scores.iter().all(PillarScore::has_answers)
    }
}

/// Scoring calculator.
///
/// Stateless; everything it needs arrives as arguments.
pub struct ScoringEngine;

impl ScoringEngine {
    /// Scores a set of answers against a pillar set.
    pub fn score(
        pillars: &[Pillar],
        thresholds: &ScoreThresholds,
        answers: &[Answer],
    ) -> ScoredAssessment {
        let live = Self::latest_answers(pillars, answers);

        let mut pillar_scores = Vec::with_capacity(pillars.len());
        let mut question_results = Vec::new();
        let mut confidence_sum = 0.0_f64;
        let mut question_count = 0_usize;
        let mut span: Option<AnswerSpan> = None;

        for pillar in pillars {
            let mut score = 0_u32;
            let mut answered = 0_usize;

            for question in &pillar.questions {
                question_count += 1;
                let answer = live.get(&(pillar.id.as_str(), question.id.as_str())).copied();
                let result = Self::resolve(pillar, question, answer);

                if let (true, Some(answer)) = (result.answered, answer) {
                    answered += 1;
                    score = score.saturating_add(result.score);
                    confidence_sum += clamp_confidence(answer.confidence);
                    span = Some(extend_span(span, answer.timestamp));
                }
                question_results.push(result);
            }

            let percentage = Percentage::of(score, pillar.max_score);
            pillar_scores.push(PillarScore {
                pillar_id: pillar.id.clone(),
                score,
                max_score: pillar.max_score,
                percentage,
                priority: Priority::from_completion(percentage),
                answered_questions: answered,
                total_questions: pillar.questions.len(),
            });
        }

        let total_score = pillar_scores
            .iter()
            .fold(0_u32, |total, p| total.saturating_add(p.score));
        let confidence = if question_count == 0 {
            0.0
        } else {
            confidence_sum / question_count as f64
        };
        let level = thresholds.classify(total_score);

        tracing::debug!(
            total_score,
            level = %level.name,
            answers = answers.len(),
            resolved = span.map(|s| s.answer_count).unwrap_or(0),
            "Scored assessment"
        );

        ScoredAssessment {
            assessment_id: None,
            pillar_scores,
            total_score,
            max_score: thresholds.max_score(),
            level,
            confidence,
            question_results,
            answer_span: span,
        }
    }

    /// Scores an assessment, carrying its id onto the result.
    pub fn score_assessment(
        pillars: &[Pillar],
        thresholds: &ScoreThresholds,
        assessment: &Assessment,
    ) -> ScoredAssessment {
        let mut scored = Self::score(pillars, thresholds, &assessment.answers);
        scored.assessment_id = Some(assessment.id);
        scored
    }

    /// Picks the live answer per known `(pillar, question)`.
    fn latest_answers<'a>(
        pillars: &'a [Pillar],
        answers: &'a [Answer],
    ) -> HashMap<(&'a str, &'a str), &'a Answer> {
        let mut live: HashMap<(&str, &str), &Answer> = HashMap::new();

        for answer in answers {
            let known = pillars
                .iter()
                .find(|p| p.id == answer.pillar_id)
                .and_then(|p| p.question(answer.question_id.as_str()))
                .is_some();
            if !known {
                tracing::debug!(
                    pillar_id = %answer.pillar_id,
                    question_id = %answer.question_id,
                    "Ignoring answer for unknown question"
                );
                continue;
            }

            let key = (answer.pillar_id.as_str(), answer.question_id.as_str());
            match live.get(&key) {
                Some(current) if current.timestamp > answer.timestamp => {}
                _ => {
                    live.insert(key, answer);
                }
            }
        }

        live
    }

    fn resolve(pillar: &Pillar, question: &Question, answer: Option<&Answer>) -> QuestionResult {
        let option = answer.and_then(|a| {
            let option = question.option_for(&a.value);
            if option.is_none() {
                tracing::debug!(
                    pillar_id = %pillar.id,
                    question_id = %question.id,
                    value = %a.value,
                    "Answer value matches no option, treating as unanswered"
                );
            }
            option
        });

        QuestionResult {
            pillar_id: pillar.id.clone(),
            question_id: question.id.clone(),
            value: option.map(|o| o.value.clone()),
            score: option.map(|o| o.score).unwrap_or(0),
            min_score: question.min_score(),
            max_score: question.max_score(),
            answered: option.is_some(),
        }
    }
}

fn clamp_confidence(confidence: Option<f64>) -> f64 {
    match confidence {
        None => 1.0,
        Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
        Some(_) => 0.0,
    }
}

fn extend_span(span: Option<AnswerSpan>, at: Timestamp) -> AnswerSpan {
    match span {
        None => AnswerSpan {
            first: at,
            last: at,
            answer_count: 1,
        },
        Some(s) => AnswerSpan {
            first: s.first.min(at),
            last: s.last.max(at),
            answer_count: s.answer_count + 1,
        },
    }
}
