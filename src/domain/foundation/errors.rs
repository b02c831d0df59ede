//! Error types for the domain layer.
//!
//! Two families live here:
//!
//! - `ValueError` - a value object was constructed from an out-of-range input
//! - `ConfigError` - a schema, pillar set, threshold table, or coaching
//!   condition list is internally inconsistent
//!
//! Bad *data* (a record failing a rule, an answer for a retired question) is
//! never an error at this level; it is reported as part of a result value.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },
}

impl ValueError {
    /// Creates an out of range error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValueError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }
}

/// Error codes for configuration problems, organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ParseFailed,
    DuplicateId,
    EmptyCollection,
    InvalidOption,
    ScoreMismatch,
    InvalidThresholds,
    DanglingReference,
    InvalidRule,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ParseFailed => "PARSE_FAILED",
            ErrorCode::DuplicateId => "DUPLICATE_ID",
            ErrorCode::EmptyCollection => "EMPTY_COLLECTION",
            ErrorCode::InvalidOption => "INVALID_OPTION",
            ErrorCode::ScoreMismatch => "SCORE_MISMATCH",
            ErrorCode::InvalidThresholds => "INVALID_THRESHOLDS",
            ErrorCode::DanglingReference => "DANGLING_REFERENCE",
            ErrorCode::InvalidRule => "INVALID_RULE",
        };
        write!(f, "{}", s)
    }
}

/// A single inconsistency in engine configuration.
///
/// These are detected once, when a configuration or schema is compiled, and
/// block the engine from being constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Configuration could not be parsed: {0}")]
    Parse(String),

    #[error("Pillar id '{pillar_id}' is declared more than once")]
    DuplicatePillarId { pillar_id: String },

    #[error("Question id '{question_id}' is declared more than once")]
    DuplicateQuestionId { question_id: String },

    #[error("Pillar '{pillar_id}' has no questions")]
    EmptyPillar { pillar_id: String },

    #[error("Question '{question_id}' has no answer options")]
    EmptyQuestion { question_id: String },

    #[error("Question '{question_id}' declares option value '{value}' more than once")]
    DuplicateOptionValue { question_id: String, value: String },

    #[error("Question '{question_id}' option '{value}' scores {score}, below the preceding option's {previous}")]
    NonMonotonicOptions {
        question_id: String,
        value: String,
        score: u32,
        previous: u32,
    },

    #[error("Pillar '{pillar_id}' declares maxScore {declared} but its options allow {computed}")]
    PillarMaxScoreMismatch {
        pillar_id: String,
        declared: u32,
        computed: u32,
    },

    #[error("Scoring maxScore {declared} does not match the sum of pillar maxima {computed}")]
    TotalMaxScoreMismatch { declared: u32, computed: u32 },

    #[error("Option scores of pillar '{pillar_id}' add up beyond {max}", max = u32::MAX)]
    PillarScoreOverflow { pillar_id: String },

    #[error("Pillar maxima add up beyond {max}", max = u32::MAX)]
    TotalScoreOverflow,

    #[error("No score thresholds are configured")]
    MissingThresholds,

    #[error("Threshold '{level}' has min {min} above max {max}")]
    InvalidThresholdRange { level: String, min: u32, max: u32 },

    #[error("Scores {from}..={to} are not covered by any threshold")]
    ThresholdGap { from: u32, to: u32 },

    #[error("Thresholds '{first}' and '{second}' overlap")]
    ThresholdOverlap { first: String, second: String },

    #[error("Thresholds stop at {covered} but scores reach {max_score}")]
    ThresholdNotExhaustive { max_score: u32, covered: u32 },

    #[error("Coaching condition references unknown pillar '{pillar_id}'")]
    UnknownConditionPillar { pillar_id: String },

    #[error("Coaching condition references question '{question_id}' outside pillar '{pillar_id}'")]
    UnknownConditionQuestion {
        pillar_id: String,
        question_id: String,
    },

    #[error("Field '{field}' is declared more than once in the schema")]
    DuplicateSchemaField { field: String },

    #[error("Rule on field '{field}' references unknown field '{referenced}'")]
    UnknownRuleField { field: String, referenced: String },

    #[error("Rule '{kind}' on field '{field}' requires parameter '{parameter}'")]
    MissingRuleParameter {
        field: String,
        kind: String,
        parameter: &'static str,
    },

    #[error("Rule '{kind}' on field '{field}' has an invalid parameter: {reason}")]
    InvalidRuleParameter {
        field: String,
        kind: String,
        reason: String,
    },

    #[error("Rule on field '{field}' has an invalid pattern: {reason}")]
    InvalidPattern { field: String, reason: String },

    #[error("Rule on field '{field}' references unregistered custom rule '{name}'")]
    UnknownCustomRule { field: String, name: String },

    #[error("Rule '{kind}' on field '{field}' has an empty message")]
    EmptyRuleMessage { field: String, kind: String },
}

impl ConfigError {
    /// Creates a parse error from any displayable source.
    pub fn parse(source: impl fmt::Display) -> Self {
        ConfigError::Parse(source.to_string())
    }

    /// Returns the category code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::Parse(_) => ErrorCode::ParseFailed,
            ConfigError::DuplicatePillarId { .. }
            | ConfigError::DuplicateQuestionId { .. }
            | ConfigError::DuplicateOptionValue { .. }
            | ConfigError::DuplicateSchemaField { .. } => ErrorCode::DuplicateId,
            ConfigError::EmptyPillar { .. } | ConfigError::EmptyQuestion { .. } => {
                ErrorCode::EmptyCollection
            }
            ConfigError::NonMonotonicOptions { .. } => ErrorCode::InvalidOption,
            ConfigError::PillarMaxScoreMismatch { .. }
            | ConfigError::TotalMaxScoreMismatch { .. }
            | ConfigError::PillarScoreOverflow { .. }
            | ConfigError::TotalScoreOverflow => ErrorCode::ScoreMismatch,
            ConfigError::MissingThresholds
            | ConfigError::InvalidThresholdRange { .. }
            | ConfigError::ThresholdGap { .. }
            | ConfigError::ThresholdOverlap { .. }
            | ConfigError::ThresholdNotExhaustive { .. } => ErrorCode::InvalidThresholds,
            ConfigError::UnknownConditionPillar { .. }
            | ConfigError::UnknownConditionQuestion { .. }
            | ConfigError::UnknownRuleField { .. }
            | ConfigError::UnknownCustomRule { .. } => ErrorCode::DanglingReference,
            ConfigError::MissingRuleParameter { .. }
            | ConfigError::InvalidRuleParameter { .. }
            | ConfigError::InvalidPattern { .. }
            | ConfigError::EmptyRuleMessage { .. } => ErrorCode::InvalidRule,
        }
    }
}

/// Every configuration problem found in one compile pass.
///
/// Never empty when returned as an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigErrors(Vec<ConfigError>);

impl ConfigErrors {
    /// Wraps a list of errors.
    pub fn new(errors: Vec<ConfigError>) -> Self {
        Self(errors)
    }

    /// Turns an accumulated list into `Ok(value)` when empty, `Err` otherwise.
    pub fn into_result<T>(errors: Vec<ConfigError>, value: T) -> Result<T, ConfigErrors> {
        if errors.is_empty() {
            Ok(value)
        } else {
            Err(Self(errors))
        }
    }

    /// Returns the individual errors.
    pub fn errors(&self) -> &[ConfigError] {
        &self.0
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no errors were collected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any error falls under the given code.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.0.iter().any(|e| e.code() == code)
    }
}

impl From<ConfigError> for ConfigErrors {
    fn from(error: ConfigError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ConfigErrors {
    type Item = ConfigError;
    type IntoIter = std::vec::IntoIter<ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} configuration error(s): ", self.0.len())?;
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "[{}] {}", error.code(), error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigErrors {}
