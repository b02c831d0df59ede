//! Custom rules - cross-field predicates registered by name.
//!
//! A schema refers to a custom rule by name (`"custom": "contactBelongsToCompany"`);
//! compiling the schema resolves the name against a `CustomRuleRegistry`, so an
//! unknown name is caught before any record is validated.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::rule::is_blank;
use super::Record;

/// Name of the built-in contact/company membership rule.
pub const CONTACT_BELONGS_TO_COMPANY: &str = "contactBelongsToCompany";

/// Auxiliary data for cross-field rules, supplied per validation call
/// (e.g. the contacts known for each company).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationContext(Map<String, Value>);

impl ValidationContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Adds an entry to the context.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Looks up an entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Why a custom rule could not reach a verdict.
///
/// The engine treats any of these as a failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleEvaluationError {
    #[error("Context entry '{key}' is missing")]
    MissingContext { key: String },

    #[error("Expected {expected} for '{name}'")]
    UnexpectedType { name: String, expected: &'static str },

    #[error("{0}")]
    Other(String),
}

/// A predicate over one field value, the whole record, and the call context.
pub trait CustomRule: Send + Sync {
    /// Returns `Ok(true)` when the value is acceptable.
    fn evaluate(
        &self,
        value: Option<&Value>,
        record: &Record,
        context: &ValidationContext,
    ) -> Result<bool, RuleEvaluationError>;

    /// Record fields this rule always reads, whether or not a schema lists
    /// them in `dependsOn`.
    fn reads(&self) -> Vec<String> {
        Vec::new()
    }
}

impl<F> CustomRule for F
where
    F: Fn(Option<&Value>, &Record, &ValidationContext) -> bool + Send + Sync,
{
    fn evaluate(
        &self,
        value: Option<&Value>,
        record: &Record,
        context: &ValidationContext,
    ) -> Result<bool, RuleEvaluationError> {
        Ok(self(value, record, context))
    }
}

/// Checks that the selected contact belongs to the selected company.
///
/// The context entry under `directory_key` must be an object mapping company
/// ids to arrays of contact ids. A blank contact or company passes; those are
/// the concern of `required` rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactBelongsToCompany {
    pub company_field: String,
    pub directory_key: String,
}

impl Default for ContactBelongsToCompany {
    fn default() -> Self {
        Self {
            company_field: "companyId".to_string(),
            directory_key: "companyContacts".to_string(),
        }
    }
}

impl CustomRule for ContactBelongsToCompany {
    fn reads(&self) -> Vec<String> {
        vec![self.company_field.clone()]
    }

    fn evaluate(
        &self,
        value: Option<&Value>,
        record: &Record,
        context: &ValidationContext,
    ) -> Result<bool, RuleEvaluationError> {
        let company = record.get(&self.company_field);
        if is_blank(value) || is_blank(company) {
            return Ok(true);
        }

        let directory = context
            .get(&self.directory_key)
            .ok_or_else(|| RuleEvaluationError::MissingContext {
                key: self.directory_key.clone(),
            })?
            .as_object()
            .ok_or_else(|| RuleEvaluationError::UnexpectedType {
                name: self.directory_key.clone(),
                expected: "an object of company contacts",
            })?;

        let company_key = match company {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => return Ok(true),
        };

        let contacts = match directory.get(&company_key) {
            Some(Value::Array(contacts)) => contacts,
            Some(_) => {
                return Err(RuleEvaluationError::UnexpectedType {
                    name: company_key,
                    expected: "an array of contact ids",
                })
            }
            None => return Ok(false),
        };

        Ok(value.map_or(false, |contact| contacts.contains(contact)))
    }
}

/// Named custom rules available to schema compilation.
#[derive(Clone, Default)]
pub struct CustomRuleRegistry {
    rules: HashMap<String, Arc<dyn CustomRule>>,
}

impl CustomRuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in rules.
    pub fn with_builtins() -> Self {
        Self::new().with(CONTACT_BELONGS_TO_COMPANY, ContactBelongsToCompany::default())
    }

    /// Registers a rule under `name`, replacing any previous rule of that name.
    pub fn with(mut self, name: impl Into<String>, rule: impl CustomRule + 'static) -> Self {
        self.rules.insert(name.into(), Arc::new(rule));
        self
    }

    /// Looks up a rule by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn CustomRule>> {
        self.rules.get(name).cloned()
    }

    /// True if a rule is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }
}

impl fmt::Debug for CustomRuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.rules.keys().collect();
        names.sort();
        f.debug_struct("CustomRuleRegistry")
            .field("rules", &names)
            .finish()
    }
}
