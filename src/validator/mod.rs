//! A compact JSON Schema validator that drives the message engine.
//!
//! The validator compiles a schema once and, per call, evaluates it against an
//! instance while appending raw errors to a fresh [`ErrorBuffer`]. Once a
//! node's keywords (and with them every descendant) have run, the node's
//! `errorMessage` directive is applied to the buffer, so directives resolve
//! bottom-up.
//!
//! # Example
//!
//! ```rust
//! use errata::{MessageOptions, Validator};
//! use serde_json::json;
//!
//! let validator = Validator::options()
//!     .all_errors(true)
//!     .error_messages(MessageOptions::default())
//!     .compile(&json!({
//!         "type": "object",
//!         "properties": { "x": { "type": "number" } },
//!         "errorMessage": { "properties": { "x": "x must be a number" } }
//!     }))
//!     .unwrap();
//!
//! let errors = validator.errors(&json!({ "x": "a" }));
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].message, "x must be a number");
//! assert_eq!(errors[0].data_location.to_string(), "/x");
//! ```

mod array;
mod node;
mod numeric;
mod object;
mod string;

use serde_json::Value;
use stillwater::Validation;

use crate::buffer::ErrorBuffer;
use crate::error::{ValidationError, ValidationErrors};
use crate::messages::{
    DirectiveError, ErrorMessages, HostConfig, MessageOptions, NodeScope, SetupError,
};
use crate::path::Pointer;
use crate::ValidationResult;

use node::{Compiler, SchemaNode};

/// Errors raised while compiling a schema.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The message engine could not be attached.
    #[error(transparent)]
    Setup(#[from] SetupError),

    /// A schema was neither an object nor a boolean.
    #[error("schema at '#{location}' must be an object or a boolean, got {got}")]
    InvalidSchema {
        location: Pointer,
        got: &'static str,
    },

    /// A keyword had a value of the wrong shape.
    #[error("keyword '{keyword}' at '#{location}' is invalid: {reason}")]
    InvalidKeyword {
        location: Pointer,
        keyword: String,
        reason: &'static str,
    },

    /// A `pattern` was not a valid regular expression.
    #[error("invalid pattern at '#{location}': {source}")]
    Pattern {
        location: Pointer,
        source: regex::Error,
    },

    /// An `errorMessage` directive had an unsupported shape.
    #[error("invalid errorMessage at '#{location}': {source}")]
    Directive {
        location: Pointer,
        source: DirectiveError,
    },
}

impl CompileError {
    pub(crate) fn invalid_keyword(location: &Pointer, keyword: &str, reason: &'static str) -> Self {
        CompileError::InvalidKeyword {
            location: location.clone(),
            keyword: keyword.to_string(),
            reason,
        }
    }
}

/// Builds a raw error for `keyword` on the node at `node`.
pub(crate) fn raw_error(
    keyword: &str,
    data: &Pointer,
    node: &Pointer,
    message: impl Into<String>,
) -> ValidationError {
    ValidationError::new(keyword, data.clone(), node.push_field(keyword), message)
}

pub(crate) fn non_negative(
    keyword: &str,
    value: &Value,
    location: &Pointer,
) -> Result<usize, CompileError> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| {
            CompileError::invalid_keyword(location, keyword, "expected a non-negative integer")
        })
}

/// Validator settings.
///
/// `all_errors` and `legacy_property_syntax` mirror the host settings the
/// message engine checks when it is attached.
#[derive(Debug, Clone, Default)]
pub struct ValidatorOptions {
    all_errors: bool,
    legacy_property_syntax: bool,
    error_messages: Option<MessageOptions>,
}

impl ValidatorOptions {
    /// Creates default options: stop at the first error, pointer locations,
    /// no custom messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps validating after the first error.
    pub fn all_errors(mut self, enabled: bool) -> Self {
        self.all_errors = enabled;
        self
    }

    /// Renders locations in reports as `users[0].email` instead of pointers.
    pub fn legacy_property_syntax(mut self, enabled: bool) -> Self {
        self.legacy_property_syntax = enabled;
        self
    }

    /// Attaches the message engine with the given options.
    pub fn error_messages(mut self, options: MessageOptions) -> Self {
        self.error_messages = Some(options);
        self
    }

    /// Compiles `schema` with these options.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::Setup`] if the message engine is requested but
    /// the options are incompatible with it, and the other variants if the
    /// schema or one of its directives is malformed.
    pub fn compile(&self, schema: &Value) -> Result<Validator, CompileError> {
        let messages = self
            .error_messages
            .clone()
            .map(|options| ErrorMessages::attach(self, options))
            .transpose()?;
        let compiler = Compiler {
            messages: messages.is_some(),
        };
        let root = compiler.node(schema, Pointer::root())?;
        Ok(Validator {
            root,
            options: self.clone(),
            messages,
        })
    }
}

impl HostConfig for ValidatorOptions {
    fn collects_all_errors(&self) -> bool {
        self.all_errors
    }

    fn uses_legacy_property_syntax(&self) -> bool {
        self.legacy_property_syntax
    }
}

/// A compiled schema.
#[derive(Debug, Clone)]
pub struct Validator {
    root: SchemaNode,
    options: ValidatorOptions,
    messages: Option<ErrorMessages>,
}

impl Validator {
    /// Starts configuring a validator.
    pub fn options() -> ValidatorOptions {
        ValidatorOptions::new()
    }

    /// Compiles `schema` with default options.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if the schema is malformed.
    pub fn new(schema: &Value) -> Result<Self, CompileError> {
        ValidatorOptions::new().compile(schema)
    }

    /// Returns the options this validator was compiled with.
    pub fn settings(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Runs one validation and returns the final error list.
    ///
    /// Each call owns its own error buffer; nothing is shared between calls.
    pub fn errors(&self, instance: &Value) -> Vec<ValidationError> {
        let mut eval = Evaluation {
            messages: self.messages.as_ref(),
            all_errors: self.options.all_errors,
            errors: ErrorBuffer::new(),
        };
        eval.node(&self.root, instance, &Pointer::root());
        eval.errors.into_vec()
    }

    /// Validates `instance`, returning it unchanged on success.
    ///
    /// With `keep_errors`, consumed raw errors are part of the failure too.
    pub fn validate(&self, instance: &Value) -> ValidationResult<Value> {
        match ValidationErrors::from_vec(self.errors(instance)) {
            None => Validation::Success(instance.clone()),
            Some(errors) => Validation::Failure(errors),
        }
    }

    /// Returns true if `instance` produces no errors.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.errors(instance).is_empty()
    }

    /// Renders errors as a JSON array, using the configured location syntax.
    pub fn report(&self, errors: &ValidationErrors) -> Value {
        Value::Array(
            errors
                .iter()
                .map(|e| e.render(self.options.legacy_property_syntax))
                .collect(),
        )
    }
}

/// State of one validation run.
pub(crate) struct Evaluation<'v> {
    messages: Option<&'v ErrorMessages>,
    all_errors: bool,
    errors: ErrorBuffer,
}

impl Evaluation<'_> {
    pub(crate) fn report(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// True once evaluation should stop because only the first error is wanted.
    pub(crate) fn halted(&self) -> bool {
        !self.all_errors && !self.errors.is_empty()
    }

    pub(crate) fn node(&mut self, node: &SchemaNode, instance: &Value, data: &Pointer) {
        if node.reject_all {
            self.report(ValidationError::new(
                "false schema",
                data.clone(),
                node.location.clone(),
                "boolean schema is false",
            ));
        }
        for keyword in &node.keywords {
            if self.halted() {
                return;
            }
            keyword.evaluate(self, instance, data, &node.location);
        }
        if let (Some(engine), Some(directive)) = (self.messages, &node.directive) {
            let scope = NodeScope::new(data, &node.location, instance);
            engine.apply(directive, &scope, &mut self.errors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stops_at_first_error_by_default() {
        let schema = json!({ "type": "string", "minLength": 5, "enum": [1] });
        let validator = Validator::new(&schema).unwrap();
        let errors = validator.errors(&json!(3));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].keyword, "type");
    }

    #[test]
    fn test_collects_all_errors() {
        let validator = Validator::options()
            .all_errors(true)
            .compile(&json!({ "type": "string", "enum": ["a"] }))
            .unwrap();
        let keywords: Vec<_> = validator
            .errors(&json!(3))
            .into_iter()
            .map(|e| e.keyword)
            .collect();
        assert_eq!(keywords, vec!["type", "enum"]);
    }

    #[test]
    fn test_attach_requires_all_errors() {
        let result = Validator::options()
            .error_messages(MessageOptions::default())
            .compile(&json!({ "errorMessage": "x" }));
        assert!(matches!(
            result,
            Err(CompileError::Setup(SetupError::AllErrorsRequired))
        ));
    }

    #[test]
    fn test_attach_rejects_legacy_syntax() {
        let result = Validator::options()
            .all_errors(true)
            .legacy_property_syntax(true)
            .error_messages(MessageOptions::default())
            .compile(&json!({}));
        assert!(matches!(
            result,
            Err(CompileError::Setup(SetupError::LegacyPropertySyntax))
        ));
    }

    #[test]
    fn test_false_schema() {
        let validator = Validator::new(&json!({ "properties": { "x": false } })).unwrap();
        let errors = validator.errors(&json!({ "x": 1 }));
        assert_eq!(errors[0].keyword, "false schema");
        assert_eq!(errors[0].data_location.to_string(), "/x");
        assert_eq!(errors[0].schema_location.to_string(), "/properties/x");
    }

    #[test]
    fn test_report_uses_legacy_syntax() {
        let validator = Validator::options()
            .legacy_property_syntax(true)
            .compile(&json!({ "items": { "properties": { "a": { "type": "string" } } } }))
            .unwrap();
        let errors = ValidationErrors::from_vec(validator.errors(&json!([{ "a": 1 }]))).unwrap();
        let report = validator.report(&errors);
        assert_eq!(report[0]["instancePath"], "[0].a");
        assert_eq!(report[0]["schemaPath"], "#/items/properties/a/type");
    }
}
