//! CoachingRuleEngine - Gap-driven recommendations for a scored assessment.
//!
//! Two sources feed the list:
//!
//! - **Condition** - a configured `CoachingCondition` whose trigger matches
//!   the answer state of its pillar (or single question)
//! - **Completion** - a pillar capturing less than the weak-pillar threshold
//!   of its points, or with nothing answered
//!
//! The result is deduplicated by `(pillar, text)` and ordered by pillar
//! declaration order, then by priority (critical first). When nothing fires
//! but the deal is not at the top level, a single generic recommendation is
//! returned instead of an empty list.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::definition::{CoachingCondition, Pillar, UNANSWERED_TRIGGER};
use super::scoring::{QuestionResult, ScoredAssessment};
use crate::domain::foundation::{Percentage, PillarId, Priority};

/// Fallback advice when configuration gives nothing better.
pub const DEFAULT_FALLBACK_TEXT: &str =
    "Continue strengthening qualification across all MEDDPICC pillars";

/// Tunables for recommendation generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingPolicy {
    /// Pillars below this share of their max score get a completion recommendation.
    pub weak_pillar_threshold: Percentage,
    pub fallback_text: String,
    pub max_action_items: usize,
}

impl Default for CoachingPolicy {
    fn default() -> Self {
        Self {
            weak_pillar_threshold: Percentage::HALF,
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
            max_action_items: 5,
        }
    }
}

/// Where a recommendation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Condition,
    Completion,
    Fallback,
}

/// A recommended next action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingRecommendation {
    /// `None` only for the generic fallback.
    pub pillar_id: Option<PillarId>,
    pub text: String,
    pub priority: Priority,
    pub action_items: Vec<String>,
    pub source: RecommendationSource,
}

impl CoachingRecommendation {
    fn fallback(policy: &CoachingPolicy) -> Self {
        Self {
            pillar_id: None,
            text: policy.fallback_text.clone(),
            priority: Priority::Medium,
            action_items: Vec::new(),
            source: RecommendationSource::Fallback,
        }
    }
}

/// Coaching calculator.
pub struct CoachingRuleEngine;

impl CoachingRuleEngine {
    /// Produces recommendations for a scored assessment.
    pub fn recommend(
        pillars: &[Pillar],
        scored: &ScoredAssessment,
        conditions: &[CoachingCondition],
        policy: &CoachingPolicy,
    ) -> Vec<CoachingRecommendation> {
        if pillars.is_empty() {
            tracing::warn!("No pillars configured, returning generic coaching");
            return vec![CoachingRecommendation::fallback(policy)];
        }

        for condition in conditions {
            if !pillars.iter().any(|p| p.id == condition.pillar_id) {
                tracing::warn!(
                    pillar_id = %condition.pillar_id,
                    "Skipping coaching condition for unknown pillar"
                );
            }
        }

        let mut ranked: Vec<(usize, CoachingRecommendation)> = Vec::new();

        for (index, pillar) in pillars.iter().enumerate() {
            for condition in conditions.iter().filter(|c| c.pillar_id == pillar.id) {
                if let Some(rec) = Self::from_condition(pillar, scored, condition, policy) {
                    ranked.push((index, rec));
                }
            }
            if let Some(rec) = Self::from_completion(pillar, scored, policy) {
                ranked.push((index, rec));
            }
        }

        // Stable sort first so the most urgent duplicate is the one kept.
        ranked.sort_by_key(|(index, rec)| (*index, rec.priority));
        let mut seen = HashSet::new();
        ranked.retain(|(_, rec)| seen.insert((rec.pillar_id.clone(), rec.text.clone())));

        let mut recommendations: Vec<_> = ranked.into_iter().map(|(_, rec)| rec).collect();

        if recommendations.is_empty() && !scored.level.is_highest {
            tracing::warn!(
                level = %scored.level.name,
                "No recommendation fired below the top level, returning generic coaching"
            );
            recommendations.push(CoachingRecommendation::fallback(policy));
        }

        tracing::debug!(
            count = recommendations.len(),
            level = %scored.level.name,
            "Generated coaching recommendations"
        );

        recommendations
    }

    fn from_condition(
        pillar: &Pillar,
        scored: &ScoredAssessment,
        condition: &CoachingCondition,
        policy: &CoachingPolicy,
    ) -> Option<CoachingRecommendation> {
        if let Some(question_id) = &condition.question_id {
            if pillar.question(question_id.as_str()).is_none() {
                tracing::warn!(
                    pillar_id = %pillar.id,
                    question_id = %question_id,
                    "Skipping coaching condition for unknown question"
                );
                return None;
            }
        }

        let fired = pillar
            .questions
            .iter()
            .filter(|q| condition.question_id.as_ref().map_or(true, |id| *id == q.id))
            .any(|q| {
                let result = scored.question_result(q.id.as_str());
                trigger_matches(&condition.trigger_value, result)
            });

        fired.then(|| CoachingRecommendation {
            pillar_id: Some(pillar.id.clone()),
            text: condition.prompt.clone(),
            priority: condition.priority,
            action_items: condition
                .action_items
                .iter()
                .take(policy.max_action_items)
                .cloned()
                .collect(),
            source: RecommendationSource::Condition,
        })
    }

    fn from_completion(
        pillar: &Pillar,
        scored: &ScoredAssessment,
        policy: &CoachingPolicy,
    ) -> Option<CoachingRecommendation> {
        let (score, answered) = scored
            .pillar_score(pillar.id.as_str())
            .map(|p| (p.score, p.answered_questions))
            .unwrap_or((0, 0));

        let weak = answered == 0 || policy.weak_pillar_threshold.exceeds_ratio(score, pillar.max_score);
        if !weak {
            return None;
        }

        let completion = Percentage::of(score, pillar.max_score);
        let action_items = pillar
            .questions
            .iter()
            .filter_map(|q| match scored.question_result(q.id.as_str()) {
                Some(r) if r.answered && r.score >= r.max_score => None,
                Some(r) if r.answered => Some(format!("Improve: {}", q.text)),
                _ => Some(format!("Answer: {}", q.text)),
            })
            .take(policy.max_action_items)
            .collect();

        Some(CoachingRecommendation {
            pillar_id: Some(pillar.id.clone()),
            text: format!(
                "Strengthen {}: {} of available points captured",
                pillar.title, completion
            ),
            priority: Priority::from_completion(completion),
            action_items,
            source: RecommendationSource::Completion,
        })
    }
}

fn trigger_matches(trigger: &str, result: Option<&QuestionResult>) -> bool {
    match result {
        Some(r) if r.answered => r.value.as_deref() == Some(trigger),
        _ => trigger == UNANSWERED_TRIGGER,
    }
}
