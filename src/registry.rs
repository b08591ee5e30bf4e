//! Named validator storage.
//!
//! This module provides the [`ValidatorRegistry`] type that stores compiled
//! validators under names so they can be shared across threads and reused
//! for many validation runs.

use parking_lot::RwLock;
use rayon::prelude::*;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::validator::Validator;
use crate::ValidationResult;

/// Type alias for the validator storage map.
type ValidatorMap = Arc<RwLock<HashMap<String, Arc<Validator>>>>;

/// A thread-safe registry of compiled validators.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>`:
/// - Multiple threads can validate concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Every validation run owns its own error buffer, so concurrent runs
/// against the same validator never observe each other's errors.
///
/// # Example
///
/// ```rust
/// use errata::{MessageOptions, Validator, ValidatorRegistry};
/// use serde_json::json;
///
/// let registry = ValidatorRegistry::new();
/// let validator = Validator::options()
///     .all_errors(true)
///     .error_messages(MessageOptions::default())
///     .compile(&json!({ "type": "string", "errorMessage": "must be text" }))
///     .unwrap();
/// registry.register("Text", validator).unwrap();
///
/// let result = registry.validate("Text", &json!(3)).unwrap();
/// assert!(result.is_failure());
/// ```
pub struct ValidatorRegistry {
    validators: ValidatorMap,
}

impl ValidatorRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            validators: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a validator under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    pub fn register(
        &self,
        name: impl Into<String>,
        validator: Validator,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut validators = self.validators.write();

        if validators.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        validators.insert(name, Arc::new(validator));
        Ok(())
    }

    /// Retrieves a validator by name.
    pub fn get(&self, name: &str) -> Option<Arc<Validator>> {
        self.validators.read().get(name).cloned()
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.validators.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Validates a value against a named validator.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the name doesn't exist.
    pub fn validate(
        &self,
        name: &str,
        value: &Value,
    ) -> Result<ValidationResult<Value>, RegistryError> {
        let validator = self.lookup(name)?;
        Ok(validator.validate(value))
    }

    /// Validates many values against a named validator in parallel.
    ///
    /// Results are returned in input order.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotFound` if the name doesn't exist.
    pub fn validate_batch(
        &self,
        name: &str,
        values: &[Value],
    ) -> Result<Vec<ValidationResult<Value>>, RegistryError> {
        let validator = self.lookup(name)?;
        Ok(values.par_iter().map(|value| validator.validate(value)).collect())
    }

    fn lookup(&self, name: &str) -> Result<Arc<Validator>, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ValidatorRegistry {
    fn clone(&self) -> Self {
        Self {
            validators: Arc::clone(&self.validators),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a validator with a name that already exists.
    #[error("validator '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to validate with a name that doesn't exist.
    #[error("validator '{0}' not found")]
    NotFound(String),
}
