//! Validated qualification model.
//!
//! `QualificationModel::compile` is the only way to obtain one, so anything
//! holding a model can score without re-checking the configuration.

use std::collections::HashSet;

use super::definition::{CoachingCondition, Pillar, QualificationConfig};
use super::thresholds::ScoreThresholds;
use crate::domain::foundation::{ConfigError, ConfigErrors};

/// A checked, immutable qualification configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct QualificationModel {
    config: QualificationConfig,
    thresholds: ScoreThresholds,
}

impl QualificationModel {
    /// Checks a configuration and collects every problem found.
    ///
    /// Nothing short-circuits: a document with a duplicate pillar id and a
    /// threshold gap reports both.
    pub fn compile(config: QualificationConfig) -> Result<Self, ConfigErrors> {
        let mut errors = Vec::new();

        check_pillars(&config.pillars, &mut errors);

        match config.pillar_max_total() {
            Some(computed) if computed != config.scoring.max_score => {
                errors.push(ConfigError::TotalMaxScoreMismatch {
                    declared: config.scoring.max_score,
                    computed,
                });
            }
            Some(_) => {}
            None => errors.push(ConfigError::TotalScoreOverflow),
        }

        errors.extend(ScoreThresholds::check(
            &config.scoring.thresholds,
            config.scoring.max_score,
        ));

        check_conditions(&config.pillars, &config.coaching_conditions, &mut errors);

        ConfigErrors::into_result(errors, ())?;

        let thresholds =
            ScoreThresholds::from_specs(&config.scoring.thresholds, config.scoring.max_score)?;

        tracing::debug!(
            pillars = config.pillars.len(),
            conditions = config.coaching_conditions.len(),
            max_score = config.scoring.max_score,
            "Compiled qualification model"
        );

        Ok(Self { config, thresholds })
    }

    /// Parses and compiles a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigErrors> {
        Self::compile(QualificationConfig::from_json_str(json)?)
    }

    /// Parses and compiles a YAML configuration document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigErrors> {
        Self::compile(QualificationConfig::from_yaml_str(yaml)?)
    }

    /// The built-in MEDDPICC model.
    pub fn meddpicc() -> Result<Self, ConfigErrors> {
        Self::compile(QualificationConfig::meddpicc()?)
    }

    pub fn pillars(&self) -> &[Pillar] {
        &self.config.pillars
    }

    pub fn thresholds(&self) -> &ScoreThresholds {
        &self.thresholds
    }

    pub fn conditions(&self) -> &[CoachingCondition] {
        &self.config.coaching_conditions
    }

    /// The configuration this model was compiled from.
    pub fn config(&self) -> &QualificationConfig {
        &self.config
    }

    pub fn max_score(&self) -> u32 {
        self.config.scoring.max_score
    }

    /// Releases the configuration, e.g. to edit it and compile a new model.
    pub fn into_config(self) -> QualificationConfig {
        self.config
    }
}

fn check_pillars(pillars: &[Pillar], errors: &mut Vec<ConfigError>) {
    let mut pillar_ids = HashSet::new();
    let mut question_ids = HashSet::new();

    for pillar in pillars {
        if !pillar_ids.insert(pillar.id.as_str()) {
            errors.push(ConfigError::DuplicatePillarId {
                pillar_id: pillar.id.to_string(),
            });
        }
        if pillar.questions.is_empty() {
            errors.push(ConfigError::EmptyPillar {
                pillar_id: pillar.id.to_string(),
            });
        }

        for question in &pillar.questions {
            if !question_ids.insert(question.id.as_str()) {
                errors.push(ConfigError::DuplicateQuestionId {
                    question_id: question.id.to_string(),
                });
            }
            if question.options.is_empty() {
                errors.push(ConfigError::EmptyQuestion {
                    question_id: question.id.to_string(),
                });
            }

            let mut values = HashSet::new();
            let mut previous: Option<u32> = None;
            for option in &question.options {
                if !values.insert(option.value.as_str()) {
                    errors.push(ConfigError::DuplicateOptionValue {
                        question_id: question.id.to_string(),
                        value: option.value.clone(),
                    });
                }
                if let Some(prev) = previous {
                    if option.score < prev {
                        errors.push(ConfigError::NonMonotonicOptions {
                            question_id: question.id.to_string(),
                            value: option.value.clone(),
                            score: option.score,
                            previous: prev,
                        });
                    }
                }
                previous = Some(option.score);
            }
        }

        match pillar.computed_max_score() {
            Some(computed) if computed != pillar.max_score => {
                errors.push(ConfigError::PillarMaxScoreMismatch {
                    pillar_id: pillar.id.to_string(),
                    declared: pillar.max_score,
                    computed,
                });
            }
            Some(_) => {}
            None => errors.push(ConfigError::PillarScoreOverflow {
                pillar_id: pillar.id.to_string(),
            }),
        }
    }
}

fn check_conditions(
    pillars: &[Pillar],
    conditions: &[CoachingCondition],
    errors: &mut Vec<ConfigError>,
) {
    for condition in conditions {
        let Some(pillar) = pillars.iter().find(|p| p.id == condition.pillar_id) else {
            errors.push(ConfigError::UnknownConditionPillar {
                pillar_id: condition.pillar_id.to_string(),
            });
            continue;
        };
        if let Some(question_id) = &condition.question_id {
            if pillar.question(question_id.as_str()).is_none() {
                errors.push(ConfigError::UnknownConditionQuestion {
                    pillar_id: condition.pillar_id.to_string(),
                    question_id: question_id.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ErrorCode, Priority};
    use crate::domain::qualification::definition::{
        AnswerOption, Question, ScoringConfig, ThresholdSpec,
    };
    use std::collections::BTreeMap;

    fn yes_no(id: &str) -> Question {
        Question::new(
            id,
            format!("{id}?"),
            vec![AnswerOption::new("No", "no", 0), AnswerOption::new("Yes", "yes", 10)],
        )
    }

    fn config(pillars: Vec<Pillar>, max_score: u32) -> QualificationConfig {
        let mut thresholds = BTreeMap::new();
        thresholds.insert("weak".to_string(), ThresholdSpec::up_to(max_score / 2));
        thresholds.insert("strong".to_string(), ThresholdSpec::at_least(max_score / 2 + 1));
        QualificationConfig {
            pillars,
            scoring: ScoringConfig {
                max_score,
                thresholds,
            },
            coaching_conditions: Vec::new(),
        }
    }

    #[test]
    fn meddpicc_default_compiles() {
        let model = QualificationModel::meddpicc().unwrap();
        assert_eq!(model.pillars().len(), 8);
        assert_eq!(model.max_score(), 320);
        assert!(!model.conditions().is_empty());
    }

    #[test]
    fn well_formed_config_compiles() {
        let model = QualificationModel::compile(config(
            vec![
                Pillar::new("metrics", "Metrics", vec![yes_no("m1")]),
                Pillar::new("champion", "Champion", vec![yes_no("c1")]),
            ],
            20,
        ))
        .unwrap();
        assert_eq!(model.thresholds().classify(10).name, "weak");
        assert_eq!(model.thresholds().classify(11).name, "strong");
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let errors = QualificationModel::compile(config(
            vec![
                Pillar::new("metrics", "Metrics", vec![yes_no("q1")]),
                Pillar::new("metrics", "Metrics again", vec![yes_no("q1")]),
            ],
            20,
        ))
        .unwrap_err();

        assert!(errors
            .errors()
            .contains(&ConfigError::DuplicatePillarId { pillar_id: "metrics".to_string() }));
        assert!(errors
            .errors()
            .contains(&ConfigError::DuplicateQuestionId { question_id: "q1".to_string() }));
    }

    #[test]
    fn empty_pillar_and_question_are_reported() {
        let mut empty_question = yes_no("q1");
        empty_question.options.clear();
        let errors = QualificationModel::compile(config(
            vec![
                Pillar::new("metrics", "Metrics", vec![]),
                Pillar::new("champion", "Champion", vec![empty_question]),
            ],
            0,
        ))
        .unwrap_err();

        assert!(errors.has_code(ErrorCode::EmptyCollection));
        assert_eq!(
            errors
                .errors()
                .iter()
                .filter(|e| e.code() == ErrorCode::EmptyCollection)
                .count(),
            2
        );
    }

    #[test]
    fn decreasing_option_scores_are_reported() {
        let question = Question::new(
            "q1",
            "Backwards?",
            vec![AnswerOption::new("Yes", "yes", 10), AnswerOption::new("No", "no", 0)],
        );
        let errors =
            QualificationModel::compile(config(vec![Pillar::new("p", "P", vec![question])], 10))
                .unwrap_err();
        assert_eq!(
            errors.errors(),
            &[ConfigError::NonMonotonicOptions {
                question_id: "q1".to_string(),
                value: "no".to_string(),
                score: 0,
                previous: 10,
            }]
        );
    }

    #[test]
    fn duplicate_option_values_are_reported() {
        let question = Question::new(
            "q1",
            "Twice?",
            vec![AnswerOption::new("No", "no", 0), AnswerOption::new("Also no", "no", 0)],
        );
        let errors =
            QualificationModel::compile(config(vec![Pillar::new("p", "P", vec![question])], 0))
                .unwrap_err();
        assert!(errors.errors().contains(&ConfigError::DuplicateOptionValue {
            question_id: "q1".to_string(),
            value: "no".to_string(),
        }));
    }

    #[test]
    fn max_score_mismatches_are_reported() {
        let mut pillar = Pillar::new("p", "P", vec![yes_no("q1")]);
        pillar.max_score = 50;
        let errors = QualificationModel::compile(config(vec![pillar], 10)).unwrap_err();

        assert!(errors.errors().contains(&ConfigError::PillarMaxScoreMismatch {
            pillar_id: "p".to_string(),
            declared: 50,
            computed: 10,
        }));
        assert!(errors.errors().contains(&ConfigError::TotalMaxScoreMismatch {
            declared: 10,
            computed: 50,
        }));
    }

    #[test]
    fn overflowing_option_scores_are_reported() {
        let errors = QualificationModel::from_json_str(
            r#"{
                "pillars": [{
                    "id": "metrics",
                    "title": "Metrics",
                    "maxScore": 4294967295,
                    "questions": [
                        {"id": "m1", "text": "?", "options": [{"label": "Yes", "value": "yes", "score": 4294967295}]},
                        {"id": "m2", "text": "?", "options": [{"label": "Yes", "value": "yes", "score": 4294967295}]}
                    ]
                }],
                "scoring": {"maxScore": 4294967295, "thresholds": {"all": {"min": 0}}}
            }"#,
        )
        .unwrap_err();

        assert!(errors.errors().contains(&ConfigError::PillarScoreOverflow {
            pillar_id: "metrics".to_string(),
        }));
    }

    #[test]
    fn overflowing_pillar_total_is_reported() {
        let big = |id: &str| {
            let question = Question::new(
                format!("{id}_q"),
                "?",
                vec![AnswerOption::new("Yes", "yes", u32::MAX)],
            );
            Pillar::new(id, id, vec![question])
        };
        let errors =
            QualificationModel::compile(config(vec![big("a"), big("b")], u32::MAX)).unwrap_err();

        assert!(errors.errors().contains(&ConfigError::TotalScoreOverflow));
        assert!(errors.has_code(ErrorCode::ScoreMismatch));
    }

    #[test]
    fn dangling_condition_references_are_reported() {
        let mut cfg = config(vec![Pillar::new("p", "P", vec![yes_no("q1")])], 10);
        cfg.coaching_conditions = vec![
            CoachingCondition::new("ghost", "no", "Boo", Priority::High),
            CoachingCondition::new("p", "no", "Fix q2", Priority::High).for_question("q2"),
        ];
        let errors = QualificationModel::compile(cfg).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(errors.errors().iter().all(|e| e.code() == ErrorCode::DanglingReference));
    }

    #[test]
    fn every_problem_is_reported_in_one_pass() {
        let mut cfg = config(
            vec![
                Pillar::new("p", "P", vec![yes_no("q1")]),
                Pillar::new("p", "P", vec![yes_no("q2")]),
            ],
            20,
        );
        cfg.scoring.thresholds.clear();
        let errors = QualificationModel::compile(cfg).unwrap_err();

        assert!(errors.has_code(ErrorCode::DuplicateId));
        assert!(errors.has_code(ErrorCode::InvalidThresholds));
    }

    #[test]
    fn parse_failures_surface_as_config_errors() {
        let errors = QualificationModel::from_json_str("not json").unwrap_err();
        assert!(errors.has_code(ErrorCode::ParseFailed));
    }

    #[test]
    fn yaml_document_compiles() {
        let yaml = r#"
pillars:
  - id: champion
    title: Champion
    maxScore: 30
    questions:
      - id: champion_access
        text: Do you have a champion?
        options:
          - { label: "No", value: "no", score: 0 }
          - { label: "Yes", value: "yes", score: 30 }
scoring:
  maxScore: 30
  thresholds:
    weak: { max: 14 }
    strong: { min: 15 }
"#;
        let model = QualificationModel::from_yaml_str(yaml).unwrap();
        assert_eq!(model.pillars()[0].id.as_str(), "champion");
        assert!(model.conditions().is_empty());
    }
}
