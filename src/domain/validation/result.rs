//! Validation results.

use serde::{Deserialize, Serialize};

use super::rule::Severity;

/// A single field-scoped finding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity,
        }
    }

    /// True for blocking findings.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Outcome of validating one record.
///
/// `is_valid` is derived from `errors` at construction and cannot drift from
/// it; warnings never affect validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Builds a result from findings in evaluation order.
    pub fn from_findings(findings: impl IntoIterator<Item = ValidationError>) -> Self {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            findings.into_iter().partition(ValidationError::is_error);
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// A result with no findings.
    pub fn valid() -> Self {
        Self::from_findings(Vec::new())
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// Errors for one field, in rule order.
    pub fn errors_for(&self, field: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Warnings for one field, in rule order.
    pub fn warnings_for(&self, field: &str) -> Vec<&ValidationError> {
        self.warnings.iter().filter(|e| e.field == field).collect()
    }

    /// True when the field has at least one error.
    pub fn has_error_on(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}
