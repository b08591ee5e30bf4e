//! Tests for validator registry operations.

use errata::{MessageOptions, RegistryError, Validator, ValidatorRegistry};
use serde_json::{json, Value};

fn user_validator() -> Validator {
    Validator::options()
        .all_errors(true)
        .error_messages(MessageOptions::default())
        .compile(&json!({
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": { "type": "string", "minLength": 1 },
                "age": { "type": "integer", "minimum": 0 }
            },
            "errorMessage": {
                "required": { "name": "name is required" },
                "properties": { "age": "age must be a non-negative integer" }
            }
        }))
        .unwrap()
}

#[test]
fn test_register_and_get() {
    let registry = ValidatorRegistry::new();

    registry.register("User", user_validator()).unwrap();

    assert!(registry.get("User").is_some());
    assert!(registry.get("Missing").is_none());
}

#[test]
fn test_duplicate_registration_fails() {
    let registry = ValidatorRegistry::new();

    registry.register("User", user_validator()).unwrap();

    let result = registry.register("User", user_validator());
    assert!(matches!(result, Err(RegistryError::DuplicateName(name)) if name == "User"));
}

#[test]
fn test_validate_with_registry() {
    let registry = ValidatorRegistry::new();
    registry.register("User", user_validator()).unwrap();

    let valid = registry
        .validate("User", &json!({ "name": "Alice", "age": 30 }))
        .unwrap();
    assert!(valid.is_success());

    let invalid = registry.validate("User", &json!({ "age": -1 })).unwrap();
    let errors = invalid.into_result().unwrap_err();
    assert_eq!(
        errors.messages(),
        vec!["name is required", "age must be a non-negative integer"]
    );
}

#[test]
fn test_validate_missing_validator() {
    let registry = ValidatorRegistry::new();

    let result = registry.validate("Missing", &json!({}));
    assert!(matches!(result, Err(RegistryError::NotFound(ref name)) if name == "Missing"));
    assert_eq!(
        result.map(|_| ()).unwrap_err().to_string(),
        "validator 'Missing' not found"
    );
}

#[test]
fn test_names_are_sorted() {
    let registry = ValidatorRegistry::default();
    registry.register("b", Validator::new(&json!(true)).unwrap()).unwrap();
    registry.register("a", Validator::new(&json!(true)).unwrap()).unwrap();

    assert_eq!(registry.names(), vec!["a", "b"]);
}

#[test]
fn test_clones_share_storage() {
    let registry = ValidatorRegistry::new();
    let clone = registry.clone();

    clone.register("User", user_validator()).unwrap();

    assert!(registry.get("User").is_some());
}

#[test]
fn test_validate_batch_preserves_order() {
    let registry = ValidatorRegistry::new();
    registry.register("User", user_validator()).unwrap();

    let values: Vec<Value> = (0..50)
        .map(|i| {
            if i % 2 == 0 {
                json!({ "name": format!("user{i}"), "age": i })
            } else {
                json!({ "age": i })
            }
        })
        .collect();

    let results = registry.validate_batch("User", &values).unwrap();

    assert_eq!(results.len(), values.len());
    for (i, result) in results.into_iter().enumerate() {
        match result.into_result() {
            Ok(value) => {
                assert_eq!(i % 2, 0);
                assert_eq!(value, values[i]);
            }
            Err(errors) => {
                assert_eq!(i % 2, 1);
                assert_eq!(errors.messages(), vec!["name is required"]);
            }
        }
    }
}

#[test]
fn test_validate_batch_missing_validator() {
    let registry = ValidatorRegistry::new();
    assert!(matches!(
        registry.validate_batch("Missing", &[json!(1)]),
        Err(RegistryError::NotFound(_))
    ));
}
