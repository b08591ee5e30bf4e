//! Custom error messages.
//!
//! This module replaces the raw errors a validator produced under a schema
//! node with the messages the schema author attached to that node through an
//! `errorMessage` directive. The raw errors are kept as evidence under the
//! emitted error's `params.errors`, marked consumed, and (unless configured
//! otherwise) pruned so ancestor nodes do not see them again.
//!
//! Per node, matching runs as a fixed pipeline, most specific first:
//!
//! 1. keyword templates (`{"type": "..."}`)
//! 2. keyword property templates (`{"required": {"name": "..."}}`)
//! 3. child templates (`{"properties": {...}}` or `{"items": [...]}`)
//! 4. the fallback (`{"_": "..."}`, or a plain string directive)
//!
//! # Example
//!
//! ```rust
//! use errata::{
//!     Directive, ErrorBuffer, ErrorMessages, MessageOptions, NodeScope, Pointer, ValidationError,
//! };
//! use errata::messages::HostConfig;
//! use serde_json::json;
//!
//! struct Host;
//! impl HostConfig for Host {
//!     fn collects_all_errors(&self) -> bool { true }
//!     fn uses_legacy_property_syntax(&self) -> bool { false }
//! }
//!
//! let engine = ErrorMessages::attach(&Host, MessageOptions::default()).unwrap();
//!
//! let mut buffer = ErrorBuffer::new();
//! let type_location = Pointer::root().push_field("type");
//! buffer.push(ValidationError::new("type", Pointer::root(), type_location, "must be string"));
//!
//! let directive = Directive::parse(&json!("bad value")).unwrap();
//! let root = Pointer::root();
//! let report = engine.apply(&directive, &NodeScope::new(&root, &root, &json!(3)), &mut buffer);
//!
//! assert_eq!(report.emitted, 1);
//! assert_eq!(buffer.len(), 1);
//! assert_eq!(buffer.get(0).unwrap().message, "bad value");
//! ```

mod aggregate;
mod directive;
mod emit;
mod matcher;

pub use directive::{
    keyword_property_param, Directive, DirectiveBuilder, DirectiveError, Rules, FALLBACK_KEY,
};
pub use matcher::{immediate_child, own_scope, subtree, Scope};

pub(crate) use directive::type_name;

use serde_json::Value;
use tracing::debug;

use crate::buffer::ErrorBuffer;
use crate::path::Pointer;

/// Host settings the engine depends on.
///
/// The engine can only see every error under a node if the host keeps
/// validating after the first failure, and it matches on pointer locations,
/// which the legacy property syntax does not produce.
pub trait HostConfig {
    /// True if the host collects all errors instead of stopping at the first.
    fn collects_all_errors(&self) -> bool;

    /// True if the host reports data locations in the legacy property syntax.
    fn uses_legacy_property_syntax(&self) -> bool;
}

/// Errors raised when attaching the engine to a host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// The host stops at the first error.
    #[error("error messages require the validator to collect all errors")]
    AllErrorsRequired,

    /// The host uses the legacy property syntax for locations.
    #[error("error messages are incompatible with the legacy property syntax")]
    LegacyPropertySyntax,
}

/// How the messages of one node are combined.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SingleError {
    /// One error per matched rule.
    #[default]
    Disabled,
    /// One error per node, at the node's data location, with every matched
    /// template joined by the separator in bucket order.
    Joined(String),
}

impl SingleError {
    /// Separator used when single-error mode is switched on with `true`.
    pub const DEFAULT_SEPARATOR: &'static str = ";";
}

impl From<bool> for SingleError {
    fn from(enabled: bool) -> Self {
        if enabled {
            SingleError::Joined(Self::DEFAULT_SEPARATOR.to_string())
        } else {
            SingleError::Disabled
        }
    }
}

impl From<&str> for SingleError {
    fn from(separator: &str) -> Self {
        SingleError::Joined(separator.to_string())
    }
}

impl From<String> for SingleError {
    fn from(separator: String) -> Self {
        SingleError::Joined(separator)
    }
}

/// Engine options, fixed for the lifetime of a validator.
///
/// # Example
///
/// ```rust
/// use errata::{MessageOptions, SingleError};
///
/// let options = MessageOptions::new().keep_errors(true).single_error(" | ");
/// assert!(options.keeps_errors());
/// assert_eq!(options.single_error_mode(), &SingleError::Joined(" | ".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageOptions {
    keep_errors: bool,
    single_error: SingleError,
}

impl MessageOptions {
    /// Creates the default options: prune consumed errors, one message per rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps consumed raw errors in the final list next to the messages.
    pub fn keep_errors(mut self, keep: bool) -> Self {
        self.keep_errors = keep;
        self
    }

    /// Merges all messages of a node into one error.
    ///
    /// Accepts `true`/`false` or a separator string.
    pub fn single_error(mut self, mode: impl Into<SingleError>) -> Self {
        self.single_error = mode.into();
        self
    }

    /// Returns true if consumed errors are kept.
    pub fn keeps_errors(&self) -> bool {
        self.keep_errors
    }

    /// Returns the single-error mode.
    pub fn single_error_mode(&self) -> &SingleError {
        &self.single_error
    }
}

/// The node a directive is applied at.
#[derive(Debug, Clone, Copy)]
pub struct NodeScope<'a> {
    /// Data location of the node's instance.
    pub data_location: &'a Pointer,
    /// Schema location of the node.
    pub schema_location: &'a Pointer,
    /// The instance value at `data_location`.
    pub instance: &'a Value,
}

impl<'a> NodeScope<'a> {
    /// Creates a scope.
    pub fn new(
        data_location: &'a Pointer,
        schema_location: &'a Pointer,
        instance: &'a Value,
    ) -> Self {
        Self {
            data_location,
            schema_location,
            instance,
        }
    }

    fn locations(&self) -> Scope<'a> {
        Scope {
            data: self.data_location,
            schema: self.schema_location,
        }
    }
}

/// What applying a directive did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeReport {
    /// Raw errors claimed by some rule.
    pub consumed: usize,
    /// Message errors appended.
    pub emitted: usize,
    /// Errors removed by pruning.
    pub pruned: usize,
}

/// The error message engine.
#[derive(Debug, Clone)]
pub struct ErrorMessages {
    options: MessageOptions,
}

impl ErrorMessages {
    /// Attaches the engine to a host.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::AllErrorsRequired`] if the host stops at the
    /// first error and [`SetupError::LegacyPropertySyntax`] if it reports
    /// locations in the legacy property syntax.
    pub fn attach(host: &impl HostConfig, options: MessageOptions) -> Result<Self, SetupError> {
        if !host.collects_all_errors() {
            return Err(SetupError::AllErrorsRequired);
        }
        if host.uses_legacy_property_syntax() {
            return Err(SetupError::LegacyPropertySyntax);
        }
        Ok(Self { options })
    }

    /// Returns the options the engine was attached with.
    pub fn options(&self) -> &MessageOptions {
        &self.options
    }

    /// Applies `directive` at `scope` to the errors collected so far.
    ///
    /// Must run after every keyword of the node (and therefore every
    /// descendant) has appended its errors. Never fails: errors no rule
    /// matches are left untouched.
    pub fn apply(
        &self,
        directive: &Directive,
        scope: &NodeScope<'_>,
        buffer: &mut ErrorBuffer,
    ) -> NodeReport {
        let at = scope.locations();
        let buckets: Vec<aggregate::Bucket> = match directive {
            Directive::Plain(template) => aggregate::catch_all_pass(template, at, buffer)
                .into_iter()
                .collect(),
            Directive::Structured(rules) => {
                let mut buckets = aggregate::keyword_pass(rules, at, buffer);
                buckets.extend(aggregate::keyword_property_pass(rules, at, buffer));
                buckets.extend(aggregate::child_pass(rules, at, scope.instance, buffer));
                if let Some(fallback) = &rules.fallback {
                    buckets.extend(aggregate::catch_all_pass(fallback, at, buffer));
                }
                buckets
            }
        };

        let consumed = buckets.iter().map(|b| b.errors.len()).sum();
        let emitted = match &self.options.single_error {
            SingleError::Disabled => emit::emit_each(buckets, at.schema, buffer),
            SingleError::Joined(separator) => {
                emit::emit_joined(buckets, at.data, at.schema, separator, buffer)
            }
        };
        self.finish(at, consumed, emitted, buffer)
    }

    fn finish(
        &self,
        at: Scope<'_>,
        consumed: usize,
        emitted: usize,
        buffer: &mut ErrorBuffer,
    ) -> NodeReport {
        let pruned = if self.options.keep_errors {
            0
        } else {
            buffer.prune()
        };
        if emitted > 0 {
            debug!(
                data = %at.data,
                schema = %at.schema,
                consumed,
                emitted,
                pruned,
                "applied error messages"
            );
        }
        NodeReport {
            consumed,
            emitted,
            pruned,
        }
    }
}
