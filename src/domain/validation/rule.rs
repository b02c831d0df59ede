//! Field rules - the declarative form (`RuleSpec`) and the compiled form
//! (`FieldRule`) that the engine evaluates.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::custom::{CustomRule, ValidationContext};
use super::Record;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// The kind of check a rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    MinLength,
    MaxLength,
    Min,
    Max,
    Email,
    Pattern,
    Custom,
}

impl RuleKind {
    /// Returns the name used in the schema format.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::MinLength => "minLength",
            RuleKind::MaxLength => "maxLength",
            RuleKind::Min => "min",
            RuleKind::Max => "max",
            RuleKind::Email => "email",
            RuleKind::Pattern => "pattern",
            RuleKind::Custom => "custom",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a failed rule blocks the record or only flags it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

/// A rule as declared in a schema document.
///
/// `min`/`max` double as the length bound for `minLength`/`maxLength`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    pub kind: RuleKind,
    #[serde(default)]
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Name of a registered custom rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<String>,
    /// Other fields this rule reads. Each must be declared in the schema.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl RuleSpec {
    fn new(kind: RuleKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            min: None,
            max: None,
            pattern: None,
            custom: None,
            depends_on: Vec::new(),
        }
    }

    pub fn required(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Required, message)
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Self {
            min: Some(min as f64),
            ..Self::new(RuleKind::MinLength, message)
        }
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Self {
            max: Some(max as f64),
            ..Self::new(RuleKind::MaxLength, message)
        }
    }

    pub fn min(min: f64, message: impl Into<String>) -> Self {
        Self {
            min: Some(min),
            ..Self::new(RuleKind::Min, message)
        }
    }

    pub fn max(max: f64, message: impl Into<String>) -> Self {
        Self {
            max: Some(max),
            ..Self::new(RuleKind::Max, message)
        }
    }

    pub fn email(message: impl Into<String>) -> Self {
        Self::new(RuleKind::Email, message)
    }

    pub fn pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::new(RuleKind::Pattern, message)
        }
    }

    pub fn custom(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            custom: Some(name.into()),
            ..Self::new(RuleKind::Custom, message)
        }
    }

    /// Downgrades this rule to a non-blocking warning.
    pub fn warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// Declares another field this rule reads.
    pub fn depends_on(mut self, field: impl Into<String>) -> Self {
        self.depends_on.push(field.into());
        self
    }
}

/// The executable part of a compiled rule.
#[derive(Clone)]
pub(crate) enum RuleCheck {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Min(f64),
    Max(f64),
    Email,
    Pattern(Regex),
    Custom { name: String, rule: Arc<dyn CustomRule> },
}

impl fmt::Debug for RuleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCheck::Required => write!(f, "Required"),
            RuleCheck::MinLength(n) => write!(f, "MinLength({})", n),
            RuleCheck::MaxLength(n) => write!(f, "MaxLength({})", n),
            RuleCheck::Min(n) => write!(f, "Min({})", n),
            RuleCheck::Max(n) => write!(f, "Max({})", n),
            RuleCheck::Email => write!(f, "Email"),
            RuleCheck::Pattern(re) => write!(f, "Pattern({})", re.as_str()),
            RuleCheck::Custom { name, .. } => write!(f, "Custom({})", name),
        }
    }
}

/// A compiled, ready-to-evaluate rule bound to one field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    field: String,
    kind: RuleKind,
    severity: Severity,
    message: String,
    check: RuleCheck,
}

impl FieldRule {
    pub(crate) fn new(
        field: impl Into<String>,
        spec: &RuleSpec,
        check: RuleCheck,
    ) -> Self {
        Self {
            field: field.into(),
            kind: spec.kind,
            severity: spec.severity,
            message: spec.message.clone(),
            check,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true when the value satisfies this rule.
    ///
    /// Only `required` and `custom` rules look at blank values; every other
    /// kind passes a missing, null, or empty value so that absence is reported
    /// once, by `required`. A value of the wrong type fails.
    pub(crate) fn passes(
        &self,
        value: Option<&Value>,
        record: &Record,
        context: &ValidationContext,
    ) -> bool {
        match &self.check {
            RuleCheck::Required => !is_blank(value),
            RuleCheck::Custom { name, rule } => match rule.evaluate(value, record, context) {
                Ok(passed) => passed,
                Err(e) => {
                    tracing::debug!(
                        field = %self.field,
                        rule = %name,
                        "Custom rule could not be evaluated: {}",
                        e
                    );
                    false
                }
            },
            _ if is_blank(value) => true,
            RuleCheck::MinLength(min) => length_of(value).map_or(false, |len| len >= *min),
            RuleCheck::MaxLength(max) => length_of(value).map_or(false, |len| len <= *max),
            RuleCheck::Min(min) => number_of(value).map_or(false, |n| n >= *min),
            RuleCheck::Max(max) => number_of(value).map_or(false, |n| n <= *max),
            RuleCheck::Email => value
                .and_then(Value::as_str)
                .map_or(false, |s| EMAIL_PATTERN.is_match(s.trim())),
            RuleCheck::Pattern(re) => value.and_then(Value::as_str).map_or(false, |s| re.is_match(s)),
        }
    }
}

/// Missing, null, whitespace-only string, or empty array.
pub(crate) fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

fn length_of(value: Option<&Value>) -> Option<usize> {
    match value? {
        Value::String(s) => Some(s.trim().chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Numbers, and strings that parse as numbers (form inputs arrive as text).
fn number_of(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}
