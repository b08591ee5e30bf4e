//! Turns matched buckets into aggregated message errors.

use crate::buffer::ErrorBuffer;
use crate::error::ValidationError;
use crate::path::Pointer;

use super::aggregate::Bucket;

/// Appends one message error per bucket. Returns the number appended.
pub(crate) fn emit_each(
    buckets: Vec<Bucket>,
    schema: &Pointer,
    buffer: &mut ErrorBuffer,
) -> usize {
    let count = buckets.len();
    for bucket in buckets {
        buffer.push(ValidationError::aggregated(
            bucket.template,
            bucket.data_location,
            schema.clone(),
            bucket.errors,
        ));
    }
    count
}

/// Appends one message error at the node for all buckets, templates joined
/// by `separator` in bucket order. Returns the number of errors appended.
pub(crate) fn emit_joined(
    buckets: Vec<Bucket>,
    data: &Pointer,
    schema: &Pointer,
    separator: &str,
    buffer: &mut ErrorBuffer,
) -> usize {
    if buckets.is_empty() {
        return 0;
    }

    let message = buckets
        .iter()
        .map(|b| b.template.as_str())
        .collect::<Vec<_>>()
        .join(separator);
    let errors = buckets.into_iter().flat_map(|b| b.errors).collect();
    buffer.push(ValidationError::aggregated(
        message,
        data.clone(),
        schema.clone(),
        errors,
    ));
    1
}
