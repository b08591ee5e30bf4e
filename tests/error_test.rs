//! Integration tests for ValidationError, ValidationErrors and ErrorBuffer.

use errata::{ErrorBuffer, Pointer, ValidationError, ValidationErrors, ValidationResult};
use stillwater::prelude::*;
use stillwater::Validation;

fn error(keyword: &str, data: &str) -> ValidationError {
    ValidationError::new(
        keyword,
        Pointer::parse(data).unwrap(),
        Pointer::root().push_field(keyword),
        format!("{keyword} failed"),
    )
}

#[test]
fn test_errors_never_empty() {
    let errors = ValidationErrors::single(error("type", ""));

    assert!(!errors.is_empty());
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_errors_combine_via_semigroup() {
    let a = ValidationErrors::single(error("type", "/name"));
    let b = ValidationErrors::single(error("minimum", "/age"));

    let combined = a.combine(b);

    assert_eq!(combined.len(), 2);
    assert_eq!(combined.messages(), vec!["type failed", "minimum failed"]);
}

#[test]
fn test_validation_accumulates_errors() {
    let name: ValidationResult<u32> =
        Validation::Failure(ValidationErrors::single(error("type", "/name")));
    let age: ValidationResult<u32> =
        Validation::Failure(ValidationErrors::single(error("minimum", "/age")));

    match name.and(age) {
        Validation::Failure(errors) => assert_eq!(errors.len(), 2),
        Validation::Success(_) => panic!("Expected failure"),
    }
}

#[test]
fn test_errors_iterate_in_order() {
    let errors = ValidationErrors::from_vec(vec![
        error("type", "/a"),
        error("enum", "/b"),
        error("const", "/c"),
    ])
    .unwrap();

    let by_ref: Vec<_> = (&errors).into_iter().map(|e| e.keyword.as_str()).collect();
    assert_eq!(by_ref, vec!["type", "enum", "const"]);

    let owned: Vec<_> = errors.into_iter().map(|e| e.keyword).collect();
    assert_eq!(owned, vec!["type", "enum", "const"]);
}

#[test]
fn test_buffer_consume_once() {
    let mut buffer = ErrorBuffer::new();
    buffer.push(error("type", ""));
    buffer.push(error("minimum", ""));

    assert!(buffer.consume(0));
    assert!(!buffer.consume(0));
    assert!(!buffer.consume(5));

    let unconsumed: Vec<_> = buffer.unconsumed().map(|e| e.keyword.as_str()).collect();
    assert_eq!(unconsumed, vec!["minimum"]);
}

#[test]
fn test_buffer_prune_preserves_order() {
    let mut buffer: ErrorBuffer = vec![
        error("a", ""),
        error("b", ""),
        error("c", ""),
        error("d", ""),
    ]
    .into();
    buffer.consume(1);
    buffer.consume(3);

    assert_eq!(buffer.prune(), 2);
    assert_eq!(buffer.prune(), 0);

    let left: Vec<_> = buffer.into_vec().into_iter().map(|e| e.keyword).collect();
    assert_eq!(left, vec!["a", "c"]);
}
