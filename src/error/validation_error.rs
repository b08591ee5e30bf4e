//! Validation error records.
//!
//! This module provides [`ValidationError`] for single failures (raw or
//! aggregated), its [`Params`] bag, and [`ValidationErrors`] for the
//! non-empty result of a failed validation run.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use stillwater::prelude::*;

use crate::path::Pointer;

/// Keyword carried by every error the message engine emits.
pub const MESSAGE_KEYWORD: &str = "errorMessage";

/// Parameters attached to a validation error.
///
/// Raw errors carry keyword specific values (`limit`, `missingProperty`,
/// ...). Aggregated message errors carry the raw errors they replaced, in
/// the order they were matched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    values: IndexMap<String, Value>,
    errors: Vec<ValidationError>,
}

impl Params {
    /// Creates an empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a named parameter and returns self for chaining.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Returns a named parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns a named parameter if it is a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    /// Returns the raw errors an aggregated message replaced.
    ///
    /// Empty for raw errors.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns true if there are neither named parameters nor nested errors.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.errors.is_empty()
    }

    fn render(&self, property_syntax: bool) -> Value {
        let mut map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !self.errors.is_empty() {
            let errors = self
                .errors
                .iter()
                .map(|e| e.render(property_syntax))
                .collect();
            map.insert("errors".to_string(), Value::Array(errors));
        }
        Value::Object(map)
    }
}

/// A single validation failure.
///
/// Raw errors are produced by the validator, one per failed constraint.
/// Aggregated errors are produced by the message engine, carry the keyword
/// [`MESSAGE_KEYWORD`] and hold the replaced raw errors in
/// [`Params::errors`].
///
/// # Example
///
/// ```rust
/// use errata::{Pointer, ValidationError};
///
/// let error = ValidationError::new(
///     "minLength",
///     Pointer::root().push_field("name"),
///     Pointer::root().push_field("properties").push_field("name").push_field("minLength"),
///     "must NOT have fewer than 3 characters",
/// )
/// .with_param("limit", 3);
///
/// assert_eq!(error.params.get("limit"), Some(&serde_json::json!(3)));
/// assert!(!error.is_consumed());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The keyword whose constraint failed.
    pub keyword: String,
    /// Location of the failing value within the instance.
    pub data_location: Pointer,
    /// Location of the failing keyword within the schema.
    pub schema_location: Pointer,
    /// Keyword specific parameters.
    pub params: Params,
    /// Human-readable error message.
    pub message: String,
    consumed: bool,
}

impl ValidationError {
    /// Creates a new raw error.
    pub fn new(
        keyword: impl Into<String>,
        data_location: Pointer,
        schema_location: Pointer,
        message: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            data_location,
            schema_location,
            params: Params::new(),
            message: message.into(),
            consumed: false,
        }
    }

    /// Creates an aggregated message error replacing `errors`.
    pub(crate) fn aggregated(
        message: impl Into<String>,
        data_location: Pointer,
        schema_location: Pointer,
        errors: Vec<ValidationError>,
    ) -> Self {
        Self {
            keyword: MESSAGE_KEYWORD.to_string(),
            data_location,
            schema_location,
            params: Params {
                values: IndexMap::new(),
                errors,
            },
            message: message.into(),
            consumed: false,
        }
    }

    /// Sets a named parameter and returns self for chaining.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.values.insert(name.into(), value.into());
        self
    }

    /// Returns true once a message rule has claimed this error.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Flips the consumed flag. Returns false if it was already set.
    pub(crate) fn mark_consumed(&mut self) -> bool {
        !std::mem::replace(&mut self.consumed, true)
    }

    /// Returns true if this error was emitted by the message engine.
    pub fn is_message(&self) -> bool {
        self.keyword == MESSAGE_KEYWORD
    }

    /// Renders this error as JSON with pointer locations.
    ///
    /// The shape is `{keyword, message, params, instancePath, schemaPath}`;
    /// aggregated errors list the replaced errors under `params.errors`.
    pub fn to_json(&self) -> Value {
        self.render(false)
    }

    pub(crate) fn render(&self, property_syntax: bool) -> Value {
        let instance_path = if property_syntax {
            self.data_location.to_property_path()
        } else {
            self.data_location.to_string()
        };
        json!({
            "keyword": self.keyword,
            "message": self.message,
            "params": self.params.render(property_syntax),
            "instancePath": instance_path,
            "schemaPath": format!("#{}", self.schema_location),
        })
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data_location.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.data_location, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};

/// A non-empty collection of validation errors.
///
/// `ValidationErrors` wraps a `NonEmptyVec<ValidationError>` so a failed
/// `Validation` always carries at least one error. Order is the order the
/// errors were left in after every message directive ran.
///
/// ```rust
/// use errata::{Pointer, ValidationError, ValidationErrors};
/// use stillwater::prelude::*;
///
/// let a = ValidationErrors::single(ValidationError::new(
///     "type", Pointer::root(), Pointer::root().push_field("type"), "must be string",
/// ));
/// let b = ValidationErrors::single(ValidationError::new(
///     "minimum", Pointer::root(), Pointer::root().push_field("minimum"), "must be >= 1",
/// ));
///
/// assert_eq!(a.combine(b).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(NonEmptyVec<ValidationError>);

impl ValidationErrors {
    /// Creates a collection containing a single error.
    pub fn single(error: ValidationError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a collection from a `Vec`, or None if it is empty.
    pub fn from_vec(errors: Vec<ValidationError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns all errors at the specified instance location.
    pub fn at_location(&self, location: &Pointer) -> Vec<&ValidationError> {
        self.0
            .iter()
            .filter(|e| &e.data_location == location)
            .collect()
    }

    /// Returns all errors produced by the given keyword.
    pub fn with_keyword(&self, keyword: &str) -> Vec<&ValidationError> {
        self.0.iter().filter(|e| e.keyword == keyword).collect()
    }

    /// Returns the messages of all errors, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &ValidationError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<ValidationError>`.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0.into_vec()
    }
}

impl Semigroup for ValidationErrors {
    fn combine(self, other: Self) -> Self {
        ValidationErrors(self.0.combine(other.0))
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = Box<dyn Iterator<Item = &'a ValidationError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}
