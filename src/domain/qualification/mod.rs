//! Qualification Module - Pillar scoring, coaching, and analytics.
//!
//! # Flow
//!
//! ```text
//! QualificationConfig ──compile──> QualificationModel
//!                                        │
//!  answers ──> ScoringEngine ──> ScoredAssessment ──> CoachingRuleEngine
//!                                        │
//!                          [ScoredAssessment] ──> AnalyticsAggregator
//! ```
//!
//! The three engines share only the model types. `QualificationEngine`
//! bundles them behind one validated model.

mod analytics;
mod answer;
mod coaching;
mod definition;
mod engine;
mod model;
mod scoring;
mod thresholds;

pub use analytics::{
    AnalyticsAggregator, AnalyticsOptions, AnalyticsSnapshot, GapFrequency, LevelCount,
    PillarStatistics,
};
pub use answer::{Answer, Assessment};
pub use coaching::{
    CoachingPolicy, CoachingRecommendation, CoachingRuleEngine, RecommendationSource,
    DEFAULT_FALLBACK_TEXT,
};
pub use definition::{
    AnswerOption, CoachingCondition, Pillar, QualificationConfig, Question, ScoringConfig,
    ThresholdSpec, UNANSWERED_TRIGGER,
};
pub use engine::{QualificationEngine, QualificationReport};
pub use model::QualificationModel;
pub use scoring::{
    AnswerSpan, PillarScore, QuestionResult, ScoredAssessment, ScoringEngine,
};
pub use thresholds::{LevelClassification, ScoreThresholds, ThresholdBand};
