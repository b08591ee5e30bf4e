//! Error types for validation failures.
//!
//! This module provides [`ValidationError`], the single record shape shared by
//! raw validator errors and the aggregated messages that replace them, and
//! [`ValidationErrors`], the non-empty collection returned by a failed run.

mod validation_error;

pub use validation_error::{Params, ValidationError, ValidationErrors, MESSAGE_KEYWORD};
