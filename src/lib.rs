//! # Errata
//!
//! Custom error messages for JSON Schema validation.
//!
//! ## Overview
//!
//! A schema author attaches an `errorMessage` directive to any schema node.
//! After the node's keywords have run, the raw errors produced under that node
//! are matched against the directive's rules, replaced by the author's
//! messages (which keep the raw errors as evidence under `params.errors`) and
//! marked consumed so ancestor nodes do not process them again.
//!
//! ## Core Types
//!
//! - [`Pointer`]: JSON Pointer locations in instances and schemas (e.g. `/users/0/email`)
//! - [`ValidationError`]: A raw or aggregated error with keyword, locations and params
//! - [`ErrorBuffer`]: The ordered error log of one validation run
//! - [`Directive`]: A parsed `errorMessage` value
//! - [`ErrorMessages`]: The engine that matches, aggregates and prunes
//! - [`Validator`]: A compact JSON Schema validator with the engine attached
//!
//! ## Example
//!
//! ```rust
//! use errata::{MessageOptions, Validator};
//! use serde_json::json;
//!
//! let validator = Validator::options()
//!     .all_errors(true)
//!     .error_messages(MessageOptions::default())
//!     .compile(&json!({
//!         "type": "integer",
//!         "minimum": 5,
//!         "errorMessage": "bad value"
//!     }))
//!     .unwrap();
//!
//! let errors = validator.errors(&json!(3.5));
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].message, "bad value");
//! assert_eq!(errors[0].params.errors().len(), 2);
//! ```

pub mod buffer;
pub mod error;
pub mod messages;
pub mod path;
pub mod registry;
pub mod validator;

pub use buffer::ErrorBuffer;
pub use error::{Params, ValidationError, ValidationErrors, MESSAGE_KEYWORD};
pub use messages::{
    Directive, DirectiveBuilder, DirectiveError, ErrorMessages, HostConfig, MessageOptions,
    NodeReport, NodeScope, SetupError, SingleError,
};
pub use path::{Pointer, PointerError};
pub use registry::{RegistryError, ValidatorRegistry};
pub use validator::{CompileError, Validator, ValidatorOptions};

/// Type alias for validation results using ValidationErrors
pub type ValidationResult<T> = stillwater::Validation<T, ValidationErrors>;
