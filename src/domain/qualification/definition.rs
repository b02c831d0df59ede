//! Qualification configuration - the interchange document describing pillars,
//! questions, scoring thresholds, and coaching conditions.
//!
//! This is the raw, serializable form. It is checked and turned into a
//! `QualificationModel` before any scoring happens.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{ConfigError, PillarId, Priority, QuestionId};

/// Trigger value that matches questions without a resolved answer.
pub const UNANSWERED_TRIGGER: &str = "unanswered";

static MEDDPICC: Lazy<Result<QualificationConfig, ConfigError>> =
    Lazy::new(|| QualificationConfig::from_json_str(include_str!("defaults/meddpicc.json")));

/// One selectable answer to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    pub value: String,
    pub score: u32,
}

impl AnswerOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>, score: u32) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            score,
        }
    }
}

/// A question within a pillar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>, options: Vec<AnswerOption>) -> Self {
        Self {
            id: QuestionId::new(id),
            text: text.into(),
            tooltip: None,
            options,
        }
    }

    /// Finds the option with the given value.
    pub fn option_for(&self, value: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Highest achievable score.
    pub fn max_score(&self) -> u32 {
        self.options.iter().map(|o| o.score).max().unwrap_or(0)
    }

    /// Lowest achievable score for an answered question.
    pub fn min_score(&self) -> u32 {
        self.options.iter().map(|o| o.score).min().unwrap_or(0)
    }
}

/// One qualification dimension (e.g. Champion).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pillar {
    pub id: PillarId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    pub max_score: u32,
}

impl Pillar {
    /// Creates a pillar whose declared max score matches its questions.
    pub fn new(id: impl Into<String>, title: impl Into<String>, questions: Vec<Question>) -> Self {
        let mut pillar = Self {
            id: PillarId::new(id),
            title: title.into(),
            description: String::new(),
            questions,
            max_score: 0,
        };
        pillar.max_score = pillar.computed_max_score().unwrap_or(u32::MAX);
        pillar
    }

    /// Sum of each question's highest option score, `None` on overflow.
    pub fn computed_max_score(&self) -> Option<u32> {
        self.questions
            .iter()
            .try_fold(0_u32, |total, q| total.checked_add(q.max_score()))
    }

    /// Finds a question of this pillar by id.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id.as_str() == id)
    }
}

/// Score band bounds as written in the configuration document.
///
/// A missing `max` extends the band to the configuration's maximum score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdSpec {
    #[serde(default)]
    pub min: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl ThresholdSpec {
    pub fn range(min: u32, max: u32) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn up_to(max: u32) -> Self {
        Self { min: 0, max: Some(max) }
    }

    pub fn at_least(min: u32) -> Self {
        Self { min, max: None }
    }
}

/// Scoring section of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub max_score: u32,
    pub thresholds: BTreeMap<String, ThresholdSpec>,
}

/// A declarative coaching trigger.
///
/// Fires when a question of `pillar_id` (or only `question_id`, when given)
/// has the answer `trigger_value`. The reserved trigger `"unanswered"`
/// matches questions without a resolved answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingCondition {
    pub pillar_id: PillarId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<QuestionId>,
    pub trigger_value: String,
    pub prompt: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub action_items: Vec<String>,
}

impl CoachingCondition {
    pub fn new(
        pillar_id: impl Into<String>,
        trigger_value: impl Into<String>,
        prompt: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            pillar_id: PillarId::new(pillar_id),
            question_id: None,
            trigger_value: trigger_value.into(),
            prompt: prompt.into(),
            priority,
            action_items: Vec::new(),
        }
    }

    /// Restricts the condition to a single question.
    pub fn for_question(mut self, question_id: impl Into<String>) -> Self {
        self.question_id = Some(QuestionId::new(question_id));
        self
    }

    pub fn with_action_items(mut self, items: Vec<String>) -> Self {
        self.action_items = items;
        self
    }
}

/// The complete qualification configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualificationConfig {
    pub pillars: Vec<Pillar>,
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub coaching_conditions: Vec<CoachingCondition>,
}

impl QualificationConfig {
    /// Parses the JSON interchange form.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::parse)
    }

    /// Parses the YAML form of the same document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(ConfigError::parse)
    }

    /// Exports as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(ConfigError::parse)
    }

    /// Exports as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(ConfigError::parse)
    }

    /// The built-in eight-pillar MEDDPICC configuration.
    pub fn meddpicc() -> Result<Self, ConfigError> {
        (*MEDDPICC).clone()
    }

    /// Sum of declared pillar maxima, `None` on overflow.
    pub fn pillar_max_total(&self) -> Option<u32> {
        self.pillars
            .iter()
            .try_fold(0_u32, |total, p| total.checked_add(p.max_score))
    }
}
