//! The per-run error log.
//!
//! [`ErrorBuffer`] is the ordered list of errors a single validation run
//! produces. Keywords append to it, the message engine flips consumed flags
//! and appends aggregated messages, and pruning drops consumed entries while
//! preserving the relative order of everything else.

use crate::error::ValidationError;

/// An ordered, append-only error log owned by one validation run.
///
/// # Example
///
/// ```rust
/// use errata::{ErrorBuffer, Pointer, ValidationError};
///
/// let mut buffer = ErrorBuffer::new();
/// buffer.push(ValidationError::new("type", Pointer::root(), Pointer::root(), "must be string"));
/// buffer.push(ValidationError::new("minimum", Pointer::root(), Pointer::root(), "must be >= 1"));
///
/// assert!(buffer.consume(0));
/// assert!(!buffer.consume(0));
/// assert_eq!(buffer.prune(), 1);
/// assert_eq!(buffer.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ErrorBuffer {
    errors: Vec<ValidationError>,
}

impl ErrorBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an error.
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Returns the number of errors, consumed ones included.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if the buffer holds no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the error at `index`.
    pub fn get(&self, index: usize) -> Option<&ValidationError> {
        self.errors.get(index)
    }

    /// Returns an iterator over all errors in order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter()
    }

    /// Returns an iterator over errors no rule has claimed yet.
    pub fn unconsumed(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().filter(|e| !e.is_consumed())
    }

    /// Marks the error at `index` as consumed.
    ///
    /// Returns true only for the call that flipped the flag; an error is
    /// never un-consumed. Out of range indices return false.
    pub fn consume(&mut self, index: usize) -> bool {
        self.errors
            .get_mut(index)
            .is_some_and(ValidationError::mark_consumed)
    }

    /// Drops every consumed error, keeping the rest in order.
    ///
    /// Returns the number of errors removed.
    pub fn prune(&mut self) -> usize {
        let before = self.errors.len();
        self.errors.retain(|e| !e.is_consumed());
        before - self.errors.len()
    }

    /// Consumes the buffer, returning the errors in order.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl From<Vec<ValidationError>> for ErrorBuffer {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}
