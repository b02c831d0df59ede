//! Integration tests for record validation.
//!
//! Exercises schema parsing, compilation, whole-record validation, and
//! single-field validation through the public API, using the built-in
//! opportunity schema and hand-written schemas.

use serde_json::{json, Value};

use deal_qualification::domain::foundation::ErrorCode;
use deal_qualification::domain::validation::{
    CompiledSchema, CustomRuleRegistry, Record, RuleSpec, Severity, ValidationContext,
    ValidationEngine, ValidationSchema,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap_or_default()
}

fn opportunity_schema() -> CompiledSchema {
    let schema = ValidationSchema::opportunity().expect("built-in schema parses");
    ValidationEngine::compile(&schema, &CustomRuleRegistry::with_builtins())
        .expect("built-in schema compiles")
}

fn directory() -> ValidationContext {
    ValidationContext::new().with(
        "companyContacts",
        json!({
            "acme": ["alice", "bob"],
            "globex": ["hank"]
        }),
    )
}

fn valid_opportunity() -> Record {
    record(json!({
        "title": "Acme platform renewal",
        "companyId": "acme",
        "contactId": "alice",
        "value": 250000,
        "probability": 60,
        "stage": "propose",
        "contactEmail": "alice@acme.example"
    }))
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn empty_title_yields_single_error() {
    let schema = ValidationSchema::new().field(
        "title",
        vec![
            RuleSpec::required("Title is required"),
            RuleSpec::min_length(3, "Title must be at least 3 characters"),
        ],
    );
    let compiled = ValidationEngine::compile(&schema, &CustomRuleRegistry::new()).unwrap();

    let result = ValidationEngine::validate(
        &compiled,
        &record(json!({"title": ""})),
        &ValidationContext::new(),
    );

    assert!(!result.is_valid());
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].field, "title");
}

#[test]
fn well_formed_opportunity_is_valid() {
    let result =
        ValidationEngine::validate(&opportunity_schema(), &valid_opportunity(), &directory());
    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors());
    assert!(result.warnings().is_empty());
}

#[test]
fn contact_from_another_company_is_rejected() {
    let mut opportunity = valid_opportunity();
    opportunity.insert("contactId".to_string(), json!("hank"));

    let result = ValidationEngine::validate(&opportunity_schema(), &opportunity, &directory());
    assert!(result.has_error_on("contactId"));
    assert_eq!(result.errors().len(), 1);
}

#[test]
fn missing_directory_fails_the_cross_field_rule() {
    let result = ValidationEngine::validate(
        &opportunity_schema(),
        &valid_opportunity(),
        &ValidationContext::new(),
    );
    assert!(result.has_error_on("contactId"));
}

#[test]
fn warnings_do_not_affect_validity() {
    let mut opportunity = valid_opportunity();
    opportunity.insert("value".to_string(), json!(50_000_000));
    opportunity.insert("contactEmail".to_string(), json!("not-an-email"));

    let result = ValidationEngine::validate(&opportunity_schema(), &opportunity, &directory());
    assert!(result.is_valid());
    assert_eq!(result.warnings().len(), 2);
    assert!(result.warnings().iter().all(|w| w.severity == Severity::Warning));
}

#[test]
fn every_field_is_checked_without_short_circuit() {
    let result = ValidationEngine::validate(&opportunity_schema(), &Record::new(), &directory());
    for field in ["title", "companyId", "contactId", "value", "stage"] {
        assert!(result.has_error_on(field), "expected an error on {field}");
    }
    assert!(!result.has_error_on("probability"));
}

#[test]
fn malformed_values_are_findings_not_failures() {
    let opportunity = record(json!({
        "title": 42,
        "companyId": "acme",
        "contactId": "alice",
        "value": "lots",
        "probability": [1, 2],
        "stage": "propose"
    }));
    let result = ValidationEngine::validate(&opportunity_schema(), &opportunity, &directory());
    assert!(result.has_error_on("title"));
    assert!(result.has_error_on("value"));
    assert!(result.has_error_on("probability"));
}

#[test]
fn non_object_input_is_validated_as_empty_record() {
    let result =
        ValidationEngine::validate_value(&opportunity_schema(), &json!("nope"), &directory());
    assert!(result.has_error_on("title"));
}

#[test]
fn field_validation_matches_record_validation() {
    let schema = opportunity_schema();
    let mut opportunity = valid_opportunity();
    opportunity.insert("contactId".to_string(), json!("hank"));
    opportunity.insert("stage".to_string(), json!("dreaming"));

    let whole = ValidationEngine::validate(&schema, &opportunity, &directory());
    for field in ["contactId", "stage", "title"] {
        let single = ValidationEngine::validate_field(
            &schema,
            field,
            opportunity.get(field),
            Some(&opportunity),
            &directory(),
        );
        let from_whole: Vec<_> = whole
            .errors()
            .iter()
            .chain(whole.warnings())
            .filter(|e| e.field == field)
            .cloned()
            .collect();
        assert_eq!(single, from_whole, "mismatch on {field}");
    }
}

#[test]
fn field_validation_sees_candidate_value() {
    let schema = opportunity_schema();
    let findings = ValidationEngine::validate_field(
        &schema,
        "contactId",
        Some(&json!("bob")),
        Some(&record(json!({"companyId": "globex"}))),
        &directory(),
    );
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].message, "Contact must belong to the selected company");
}

#[test]
fn schema_document_errors_surface_at_compile_time() {
    let schema = ValidationSchema::from_json_str(
        r#"{
            "title": [
                {"kind": "minLength", "severity": "error", "message": "Too short"},
                {"kind": "pattern", "severity": "error", "message": "Bad", "pattern": "(["}
            ],
            "contactId": [
                {"kind": "custom", "severity": "error", "message": "Mismatch",
                 "custom": "noSuchRule", "dependsOn": ["accountId"]}
            ]
        }"#,
    )
    .unwrap();

    let errors = ValidationEngine::compile(&schema, &CustomRuleRegistry::with_builtins())
        .unwrap_err();
    assert!(errors.has_code(ErrorCode::InvalidRule));
    assert!(errors.has_code(ErrorCode::DanglingReference));
    assert_eq!(errors.len(), 4);
}

#[test]
fn custom_closure_rules_can_be_registered() {
    let registry = CustomRuleRegistry::new().with(
        "closeAfterOpen",
        |value: Option<&Value>, record: &Record, _ctx: &ValidationContext| {
            match (value.and_then(Value::as_i64), record.get("openedAt").and_then(Value::as_i64)) {
                (Some(close), Some(open)) => close >= open,
                _ => true,
            }
        },
    );
    let schema = ValidationSchema::new()
        .field("openedAt", vec![RuleSpec::required("Open date is required")])
        .field(
            "closedAt",
            vec![RuleSpec::custom("closeAfterOpen", "Close date must follow open date")
                .depends_on("openedAt")],
        );
    let compiled = ValidationEngine::compile(&schema, &registry).unwrap();

    let bad = ValidationEngine::validate(
        &compiled,
        &record(json!({"openedAt": 200, "closedAt": 100})),
        &ValidationContext::new(),
    );
    assert!(bad.has_error_on("closedAt"));

    let good = ValidationEngine::validate(
        &compiled,
        &record(json!({"openedAt": 100, "closedAt": 200})),
        &ValidationContext::new(),
    );
    assert!(good.is_valid());
}
