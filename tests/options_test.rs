//! Tests for the keep_errors and single_error engine options.

use errata::{MessageOptions, SingleError, ValidationError, Validator};
use serde_json::{json, Value};

fn validator(schema: Value, options: MessageOptions) -> Validator {
    Validator::options()
        .all_errors(true)
        .error_messages(options)
        .compile(&schema)
        .unwrap()
}

fn messages(errors: &[ValidationError]) -> Vec<&str> {
    errors.iter().map(|e| e.message.as_str()).collect()
}

fn unwrap_failure<T, E>(v: stillwater::Validation<T, E>) -> E
where
    T: std::fmt::Debug,
{
    v.into_result().unwrap_err()
}

#[test]
fn test_keep_errors_retains_consumed_originals() {
    let validator = validator(
        json!({ "type": "integer", "minimum": 5, "errorMessage": "bad value" }),
        MessageOptions::new().keep_errors(true),
    );

    let errors = validator.errors(&json!(3.5));

    assert_eq!(messages(&errors), vec!["must be integer", "must be >= 5", "bad value"]);
    assert!(errors[0].is_consumed());
    assert!(errors[1].is_consumed());
    assert!(!errors[2].is_consumed());
    assert_eq!(errors[2].params.errors().len(), 2);
}

#[test]
fn test_keep_errors_result_includes_originals() {
    let validator = validator(
        json!({ "type": "integer", "minimum": 5, "errorMessage": "bad value" }),
        MessageOptions::new().keep_errors(true),
    );

    let errors = unwrap_failure(validator.validate(&json!(3.5)));

    assert_eq!(errors.len(), 3);
    assert_eq!(errors.with_keyword("errorMessage").len(), 1);
}

#[test]
fn test_kept_errors_are_not_claimed_again_by_ancestors() {
    let validator = validator(
        json!({
            "properties": { "x": { "type": "number", "errorMessage": "inner" } },
            "errorMessage": "outer"
        }),
        MessageOptions::new().keep_errors(true),
    );

    let errors = validator.errors(&json!({ "x": "a" }));

    assert_eq!(messages(&errors), vec!["must be number", "inner"]);
}

#[test]
fn test_single_error_joins_node_templates() {
    let validator = validator(
        json!({
            "type": "integer",
            "minimum": 5,
            "errorMessage": { "type": "not an integer", "minimum": "too small" }
        }),
        MessageOptions::new().single_error(true),
    );

    let errors = validator.errors(&json!(3.5));

    assert_eq!(messages(&errors), vec!["not an integer;too small"]);
    let raw: Vec<_> = errors[0].params.errors().iter().map(|e| e.keyword.as_str()).collect();
    assert_eq!(raw, vec!["type", "minimum"]);
}

#[test]
fn test_single_error_follows_declaration_order() {
    let validator = validator(
        json!({
            "type": "integer",
            "minimum": 5,
            "errorMessage": { "minimum": "too small", "type": "not an integer" }
        }),
        MessageOptions::new().single_error(true),
    );

    let errors = validator.errors(&json!(3.5));

    assert_eq!(messages(&errors), vec!["too small;not an integer"]);
    assert_eq!(errors[0].params.errors()[0].keyword, "minimum");
}

#[test]
fn test_single_error_without_separator_for_one_bucket() {
    let validator = validator(
        json!({
            "type": "integer",
            "minimum": 5,
            "errorMessage": { "type": "not an integer", "minimum": "too small" }
        }),
        MessageOptions::new().single_error(true),
    );

    let errors = validator.errors(&json!(3));

    assert_eq!(messages(&errors), vec!["too small"]);
}

#[test]
fn test_single_error_joins_child_and_node_buckets() {
    let validator = validator(
        json!({
            "type": "object",
            "minProperties": 3,
            "properties": { "x": { "type": "number" } },
            "errorMessage": {
                "minProperties": "too few properties",
                "properties": { "x": "x must be a number" }
            }
        }),
        MessageOptions::new().single_error(true),
    );

    let errors = validator.errors(&json!({ "x": "a", "y": {} }));

    assert_eq!(messages(&errors), vec!["too few properties;x must be a number"]);
    assert!(errors[0].data_location.is_root());
    let raw: Vec<_> = errors[0].params.errors().iter().map(|e| e.keyword.as_str()).collect();
    assert_eq!(raw, vec!["minProperties", "type"]);
}

#[test]
fn test_single_error_custom_separator_and_fallback() {
    let validator = validator(
        json!({
            "type": "object",
            "required": ["a"],
            "minProperties": 3,
            "properties": {
                "x": { "type": "number" },
                "z": { "type": "string" }
            },
            "errorMessage": {
                "required": "a is required",
                "minProperties": "too few properties",
                "properties": { "x": "x must be a number" },
                "_": "invalid"
            }
        }),
        MessageOptions::new().single_error(" | "),
    );

    let errors = validator.errors(&json!({ "x": "a", "z": 1 }));

    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "a is required | too few properties | x must be a number | invalid"
    );
    assert!(errors[0].data_location.is_root());
    assert!(errors[0].schema_location.is_root());
    let raw: Vec<_> = errors[0]
        .params
        .errors()
        .iter()
        .map(|e| e.data_location.to_string())
        .collect();
    assert_eq!(raw, vec!["", "", "/x", "/z"]);
}

#[test]
fn test_single_error_includes_keyword_property_buckets() {
    let validator = validator(
        json!({
            "type": "object",
            "required": ["a", "b"],
            "errorMessage": {
                "type": "must be an object",
                "required": { "a": "need a", "b": "need b" }
            }
        }),
        MessageOptions::new().single_error(true),
    );

    let errors = validator.errors(&json!({}));

    assert_eq!(messages(&errors), vec!["need a;need b"]);
}

#[test]
fn test_option_conversions() {
    assert_eq!(SingleError::from(false), SingleError::Disabled);
    assert_eq!(SingleError::from(true), SingleError::Joined(";".to_string()));
    assert_eq!(
        SingleError::from(String::from(", ")),
        SingleError::Joined(", ".to_string())
    );

    let options = MessageOptions::default();
    assert!(!options.keeps_errors());
    assert_eq!(options.single_error_mode(), &SingleError::Disabled);
}
