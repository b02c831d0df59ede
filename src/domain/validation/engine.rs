//! Validation Engine - schema compilation and record evaluation.

use regex::Regex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::custom::{CustomRuleRegistry, ValidationContext};
use super::result::{ValidationError, ValidationResult};
use super::rule::{FieldRule, RuleCheck, RuleKind, RuleSpec};
use super::schema::ValidationSchema;
use super::Record;
use crate::domain::foundation::{ConfigError, ConfigErrors};

/// One schema field with its compiled rules.
#[derive(Debug, Clone)]
pub struct CompiledField {
    name: String,
    rules: Vec<FieldRule>,
}

impl CompiledField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }
}

/// A schema whose rules have been checked and prepared for evaluation.
///
/// Only obtainable through `ValidationEngine::compile`, so holding one means
/// the schema has no configuration errors.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    fields: Vec<CompiledField>,
    index: HashMap<String, usize>,
}

impl CompiledSchema {
    /// Fields in declaration order.
    pub fn fields(&self) -> &[CompiledField] {
        &self.fields
    }

    /// True if the schema declares `field`.
    pub fn contains_field(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// Rules for `field`, or an empty slice for undeclared fields.
    pub fn rules_for(&self, field: &str) -> &[FieldRule] {
        self.index
            .get(field)
            .map(|&i| self.fields[i].rules.as_slice())
            .unwrap_or(&[])
    }
}

/// Stateless validation functions.
pub struct ValidationEngine;

impl ValidationEngine {
    /// Checks a schema for configuration errors and compiles its rules.
    ///
    /// Every problem in the schema is reported, not only the first.
    pub fn compile(
        schema: &ValidationSchema,
        registry: &CustomRuleRegistry,
    ) -> Result<CompiledSchema, ConfigErrors> {
        let mut errors = Vec::new();
        let declared: HashSet<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();

        let mut fields = Vec::with_capacity(schema.fields().len());
        let mut index = HashMap::new();

        for field in schema.fields() {
            if index.contains_key(&field.name) {
                errors.push(ConfigError::DuplicateSchemaField {
                    field: field.name.clone(),
                });
                continue;
            }

            let mut rules = Vec::with_capacity(field.rules.len());
            for spec in &field.rules {
                let mut referenced = spec.depends_on.clone();
                if let Some(rule) = spec.custom.as_deref().and_then(|name| registry.get(name)) {
                    referenced.extend(rule.reads());
                }
                let mut reported = HashSet::new();
                for name in referenced {
                    if !declared.contains(name.as_str()) && reported.insert(name.clone()) {
                        errors.push(ConfigError::UnknownRuleField {
                            field: field.name.clone(),
                            referenced: name,
                        });
                    }
                }

                if spec.message.trim().is_empty() {
                    errors.push(ConfigError::EmptyRuleMessage {
                        field: field.name.clone(),
                        kind: spec.kind.to_string(),
                    });
                }

                match Self::compile_check(&field.name, spec, registry) {
                    Ok(check) => rules.push(FieldRule::new(field.name.clone(), spec, check)),
                    Err(e) => errors.push(e),
                }
            }

            index.insert(field.name.clone(), fields.len());
            fields.push(CompiledField {
                name: field.name.clone(),
                rules,
            });
        }

        ConfigErrors::into_result(errors, CompiledSchema { fields, index })
    }

    fn compile_check(
        field: &str,
        spec: &RuleSpec,
        registry: &CustomRuleRegistry,
    ) -> Result<RuleCheck, ConfigError> {
        let missing = |parameter: &'static str| ConfigError::MissingRuleParameter {
            field: field.to_string(),
            kind: spec.kind.to_string(),
            parameter,
        };
        let invalid = |reason: String| ConfigError::InvalidRuleParameter {
            field: field.to_string(),
            kind: spec.kind.to_string(),
            reason,
        };
        let length = |bound: Option<f64>, parameter: &'static str| -> Result<usize, ConfigError> {
            let n = bound.ok_or_else(|| missing(parameter))?;
            if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
                return Err(invalid(format!("{} must be a non-negative integer, got {}", parameter, n)));
            }
            Ok(n as usize)
        };
        let number = |bound: Option<f64>, parameter: &'static str| -> Result<f64, ConfigError> {
            let n = bound.ok_or_else(|| missing(parameter))?;
            if !n.is_finite() {
                return Err(invalid(format!("{} must be finite", parameter)));
            }
            Ok(n)
        };

        match spec.kind {
            RuleKind::Required => Ok(RuleCheck::Required),
            RuleKind::MinLength => Ok(RuleCheck::MinLength(length(spec.min, "min")?)),
            RuleKind::MaxLength => Ok(RuleCheck::MaxLength(length(spec.max, "max")?)),
            RuleKind::Min => Ok(RuleCheck::Min(number(spec.min, "min")?)),
            RuleKind::Max => Ok(RuleCheck::Max(number(spec.max, "max")?)),
            RuleKind::Email => Ok(RuleCheck::Email),
            RuleKind::Pattern => {
                let pattern = spec.pattern.as_deref().ok_or_else(|| missing("pattern"))?;
                Regex::new(pattern)
                    .map(RuleCheck::Pattern)
                    .map_err(|e| ConfigError::InvalidPattern {
                        field: field.to_string(),
                        reason: e.to_string(),
                    })
            }
            RuleKind::Custom => {
                let name = spec.custom.as_deref().ok_or_else(|| missing("custom"))?;
                let rule = registry.get(name).ok_or_else(|| ConfigError::UnknownCustomRule {
                    field: field.to_string(),
                    name: name.to_string(),
                })?;
                Ok(RuleCheck::Custom {
                    name: name.to_string(),
                    rule,
                })
            }
        }
    }

    /// Evaluates every rule of every schema field against `record`.
    ///
    /// Fields in the record that the schema does not declare are ignored.
    pub fn validate(
        schema: &CompiledSchema,
        record: &Record,
        context: &ValidationContext,
    ) -> ValidationResult {
        let findings: Vec<ValidationError> = schema
            .fields()
            .iter()
            .flat_map(|field| Self::evaluate_field(field.rules(), record, context))
            .collect();

        let result = ValidationResult::from_findings(findings);
        tracing::debug!(
            fields = schema.fields().len(),
            errors = result.errors().len(),
            warnings = result.warnings().len(),
            "Record validated"
        );
        result
    }

    /// Validates an arbitrary JSON value. Anything other than an object is
    /// treated as an empty record.
    pub fn validate_value(
        schema: &CompiledSchema,
        value: &Value,
        context: &ValidationContext,
    ) -> ValidationResult {
        match value.as_object() {
            Some(record) => Self::validate(schema, record, context),
            None => Self::validate(schema, &Record::new(), context),
        }
    }

    /// Evaluates the rules of a single field, for real-time form feedback.
    ///
    /// `value` replaces the field's entry in `record` (or is removed when
    /// `None`), so cross-field rules see the candidate value. The findings
    /// equal the slice `validate` would produce for that field on the same
    /// record. Undeclared fields yield no findings.
    pub fn validate_field(
        schema: &CompiledSchema,
        field: &str,
        value: Option<&Value>,
        record: Option<&Record>,
        context: &ValidationContext,
    ) -> Vec<ValidationError> {
        let mut effective = record.cloned().unwrap_or_default();
        match value {
            Some(v) => {
                effective.insert(field.to_string(), v.clone());
            }
            None => {
                effective.remove(field);
            }
        }

        Self::evaluate_field(schema.rules_for(field), &effective, context)
    }

    fn evaluate_field(
        rules: &[FieldRule],
        record: &Record,
        context: &ValidationContext,
    ) -> Vec<ValidationError> {
        rules
            .iter()
            .filter(|rule| !rule.passes(record.get(rule.field()), record, context))
            .map(|rule| ValidationError::new(rule.field(), rule.message(), rule.severity()))
            .collect()
    }
}
