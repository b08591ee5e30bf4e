//! Predicates deciding which raw errors belong to a directive's node.
//!
//! Every predicate rejects errors that are already consumed and errors the
//! engine emitted itself, so a pass can never claim an error twice and never
//! claim an aggregated message.

use crate::error::ValidationError;
use crate::path::Pointer;

/// The location a directive is evaluated at.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    /// Data location of the node's instance.
    pub data: &'a Pointer,
    /// Schema location of the node.
    pub schema: &'a Pointer,
}

fn eligible(error: &ValidationError) -> bool {
    !error.is_consumed() && !error.is_message()
}

/// True if `error` was produced by a keyword directly on this node for this
/// node's own instance.
pub fn own_scope(error: &ValidationError, scope: Scope<'_>) -> bool {
    eligible(error)
        && &error.data_location == scope.data
        && error
            .schema_location
            .strip_prefix(scope.schema)
            .is_some_and(|rest| rest.len() == 1)
}

/// Returns the unescaped first segment below the node's data location when
/// `error` comes from a child (or deeper descendant) of this node's instance.
///
/// Only the data location is considered, so errors raised for the child by
/// sibling keywords of an enclosing schema match too.
pub fn immediate_child<'e>(error: &'e ValidationError, scope: Scope<'_>) -> Option<&'e str> {
    if !eligible(error) {
        return None;
    }
    error
        .data_location
        .strip_prefix(scope.data)
        .and_then(<[String]>::first)
        .map(String::as_str)
}

/// True if `error` lies anywhere at or under this node, in both the instance
/// and the schema.
pub fn subtree(error: &ValidationError, scope: Scope<'_>) -> bool {
    eligible(error)
        && error.data_location.starts_with(scope.data)
        && error.schema_location.starts_with(scope.schema)
}
