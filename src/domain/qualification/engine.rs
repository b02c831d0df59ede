//! QualificationEngine - One validated model plus the policies that drive
//! coaching and analytics.
//!
//! Hot reload means building a new engine from a new model; an engine never
//! changes after construction.

use serde::{Deserialize, Serialize};

use super::analytics::{AnalyticsAggregator, AnalyticsOptions, AnalyticsSnapshot};
use super::answer::{Answer, Assessment};
use super::coaching::{CoachingPolicy, CoachingRecommendation, CoachingRuleEngine};
use super::model::QualificationModel;
use super::scoring::{ScoredAssessment, ScoringEngine};

/// A score together with the coaching it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationReport {
    pub scored: ScoredAssessment,
    pub recommendations: Vec<CoachingRecommendation>,
}

/// Facade over scoring, coaching, and analytics for one model.
#[derive(Debug, Clone)]
pub struct QualificationEngine {
    model: QualificationModel,
    policy: CoachingPolicy,
    analytics: AnalyticsOptions,
}

impl QualificationEngine {
    pub fn new(model: QualificationModel) -> Self {
        Self {
            model,
            policy: CoachingPolicy::default(),
            analytics: AnalyticsOptions::default(),
        }
    }

    pub fn with_policy(mut self, policy: CoachingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_analytics_options(mut self, options: AnalyticsOptions) -> Self {
        self.analytics = options;
        self
    }

    pub fn model(&self) -> &QualificationModel {
        &self.model
    }

    pub fn policy(&self) -> &CoachingPolicy {
        &self.policy
    }

    pub fn analytics_options(&self) -> &AnalyticsOptions {
        &self.analytics
    }

    pub fn score(&self, answers: &[Answer]) -> ScoredAssessment {
        ScoringEngine::score(self.model.pillars(), self.model.thresholds(), answers)
    }

    pub fn score_assessment(&self, assessment: &Assessment) -> ScoredAssessment {
        ScoringEngine::score_assessment(self.model.pillars(), self.model.thresholds(), assessment)
    }

    pub fn recommend(&self, scored: &ScoredAssessment) -> Vec<CoachingRecommendation> {
        CoachingRuleEngine::recommend(
            self.model.pillars(),
            scored,
            self.model.conditions(),
            &self.policy,
        )
    }

    pub fn aggregate(&self, scored: &[ScoredAssessment]) -> AnalyticsSnapshot {
        AnalyticsAggregator::aggregate(
            scored,
            self.model.pillars(),
            self.model.thresholds(),
            &self.analytics,
        )
    }

    /// Scores answers and derives coaching in one call.
    pub fn score_and_recommend(&self, answers: &[Answer]) -> QualificationReport {
        let scored = self.score(answers);
        let recommendations = self.recommend(&scored);
        QualificationReport {
            scored,
            recommendations,
        }
    }
}
