//! Validation Module - Declarative field-level record validation.
//!
//! # Components
//!
//! - `ValidationSchema` - Ordered field -> rules document (JSON interchange form)
//! - `ValidationEngine` - Compiles schemas, validates records and single fields
//! - `CustomRuleRegistry` - Named cross-field predicates available to schemas
//! - `ValidationResult` - Errors and warnings, field-scoped
//!
//! # Error Discipline
//!
//! Schema problems surface once, from `ValidationEngine::compile`, as
//! `ConfigErrors`. Record problems never fail the call; they come back as
//! findings in a `ValidationResult`.

mod custom;
mod engine;
mod result;
mod rule;
mod schema;

/// A record under validation: field name to JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

pub use custom::{
    ContactBelongsToCompany, CustomRule, CustomRuleRegistry, RuleEvaluationError,
    ValidationContext, CONTACT_BELONGS_TO_COMPANY,
};
pub use engine::{CompiledField, CompiledSchema, ValidationEngine};
pub use result::{ValidationError, ValidationResult};
pub use rule::{FieldRule, RuleKind, RuleSpec, Severity};
pub use schema::{SchemaField, ValidationSchema};
