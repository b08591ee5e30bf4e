//! Tests for concurrent use of validators and the registry.

use errata::{MessageOptions, Validator, ValidatorRegistry};
use serde_json::json;
use std::sync::Arc;
use std::thread;

fn message_validator() -> Validator {
    Validator::options()
        .all_errors(true)
        .error_messages(MessageOptions::default())
        .compile(&json!({
            "type": "object",
            "properties": { "n": { "type": "integer", "maximum": 4 } },
            "errorMessage": { "properties": { "n": "n is out of range" } }
        }))
        .unwrap()
}

#[test]
fn test_concurrent_validation() {
    let registry = Arc::new(ValidatorRegistry::new());
    registry.register("Range", message_validator()).unwrap();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let result = registry.validate("Range", &json!({ "n": i })).unwrap();
                match result.into_result() {
                    Ok(_) => assert!(i <= 4),
                    Err(errors) => {
                        assert!(i > 4);
                        assert_eq!(errors.len(), 1);
                        assert_eq!(errors.first().message, "n is out of range");
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_runs_do_not_share_buffers() {
    let validator = Arc::new(message_validator());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                for _ in 0..100 {
                    let errors = validator.errors(&json!({ "n": 10 }));
                    assert_eq!(errors.len(), 1);
                    assert_eq!(errors[0].params.errors().len(), 1);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_registration() {
    let registry = Arc::new(ValidatorRegistry::new());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry
                    .register(format!("v{i}"), Validator::new(&json!(true)).unwrap())
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(registry.names().len(), 10);
}

#[test]
fn test_types_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Validator>();
    assert_send_sync::<ValidatorRegistry>();
    assert_send_sync::<errata::ValidationErrors>();
}
