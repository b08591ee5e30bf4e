//! The four matching passes.
//!
//! Each pass scans the whole buffer once, claims (consumes) the errors its
//! rules match and groups them into buckets. Buckets come back in the
//! declaration order of the rules that own them, not in the order the raw
//! errors were produced.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::trace;

use crate::buffer::ErrorBuffer;
use crate::error::ValidationError;
use crate::path::Pointer;

use super::directive::{keyword_property_param, Rules};
use super::matcher::{immediate_child, own_scope, subtree, Scope};

/// A group of raw errors matched by one rule.
///
/// `data_location` is where the message is attached when it is emitted on
/// its own: the node's location, or the child's for child rules.
#[derive(Debug, Clone)]
pub(crate) struct Bucket {
    pub template: String,
    pub data_location: Pointer,
    pub errors: Vec<ValidationError>,
}

/// Consumes every error `key_of` maps to a key and groups the consumed
/// errors by key, ordered by key.
fn claim<K: Ord>(
    buffer: &mut ErrorBuffer,
    mut key_of: impl FnMut(&ValidationError) -> Option<K>,
) -> BTreeMap<K, Vec<ValidationError>> {
    let matched: Vec<(usize, K)> = buffer
        .iter()
        .enumerate()
        .filter_map(|(index, error)| key_of(error).map(|key| (index, key)))
        .collect();

    let mut buckets: BTreeMap<K, Vec<ValidationError>> = BTreeMap::new();
    for (index, key) in matched {
        if !buffer.consume(index) {
            continue;
        }
        if let Some(error) = buffer.get(index) {
            buckets.entry(key).or_default().push(error.clone());
        }
    }
    buckets
}

fn node_bucket(template: &str, scope: Scope<'_>, errors: Vec<ValidationError>) -> Bucket {
    trace!(
        data = %scope.data,
        schema = %scope.schema,
        matched = errors.len(),
        "node message matched"
    );
    Bucket {
        template: template.to_string(),
        data_location: scope.data.clone(),
        errors,
    }
}

/// Claims errors of keywords that have a flat template.
pub(crate) fn keyword_pass(
    rules: &Rules,
    scope: Scope<'_>,
    buffer: &mut ErrorBuffer,
) -> Vec<Bucket> {
    if rules.keywords.is_empty() {
        return Vec::new();
    }
    claim(buffer, |error| {
        if own_scope(error, scope) {
            rules.keywords.get_index_of(&error.keyword)
        } else {
            None
        }
    })
    .into_iter()
    .filter_map(|(index, errors)| {
        let (_, template) = rules.keywords.get_index(index)?;
        Some(node_bucket(template, scope, errors))
    })
    .collect()
}

/// Claims errors of keywords that have a property-keyed template map,
/// bucketing by the property the keyword reports through its parameter.
pub(crate) fn keyword_property_pass(
    rules: &Rules,
    scope: Scope<'_>,
    buffer: &mut ErrorBuffer,
) -> Vec<Bucket> {
    if rules.keyword_properties.is_empty() {
        return Vec::new();
    }
    claim(buffer, |error| {
        if !own_scope(error, scope) {
            return None;
        }
        let (keyword_index, _, templates) = rules.keyword_properties.get_full(&error.keyword)?;
        let property = error.params.get_str(keyword_property_param(&error.keyword)?)?;
        let property_index = templates.get_index_of(property)?;
        Some((keyword_index, property_index))
    })
    .into_iter()
    .filter_map(|((keyword_index, property_index), errors)| {
        let (_, templates) = rules.keyword_properties.get_index(keyword_index)?;
        let (_, template) = templates.get_index(property_index)?;
        Some(node_bucket(template, scope, errors))
    })
    .collect()
}

/// Claims errors under child properties (object instances) or items (array
/// instances). Each bucket is attached to the child's own location.
pub(crate) fn child_pass(
    rules: &Rules,
    scope: Scope<'_>,
    instance: &Value,
    buffer: &mut ErrorBuffer,
) -> Vec<Bucket> {
    match instance {
        Value::Object(_) if !rules.properties.is_empty() => {
            let claimed = claim(buffer, |error| {
                immediate_child(error, scope).and_then(|child| rules.properties.get_index_of(child))
            });
            child_buckets(claimed, |index| {
                let (name, template) = rules.properties.get_index(index)?;
                Some((scope.data.push_field(name.as_str()), template.clone()))
            })
        }
        Value::Array(_) if !rules.items.is_empty() => {
            let claimed = claim(buffer, |error| {
                immediate_child(error, scope)
                    .and_then(|child| child.parse::<usize>().ok())
                    .filter(|index| *index < rules.items.len())
            });
            child_buckets(claimed, |index| {
                let template = rules.items.get(index)?;
                Some((scope.data.push_index(index), template.clone()))
            })
        }
        _ => Vec::new(),
    }
}

fn child_buckets(
    claimed: BTreeMap<usize, Vec<ValidationError>>,
    locate: impl Fn(usize) -> Option<(Pointer, String)>,
) -> Vec<Bucket> {
    claimed
        .into_iter()
        .filter_map(|(index, errors)| {
            let (data_location, template) = locate(index)?;
            trace!(data = %data_location, matched = errors.len(), "child message matched");
            Some(Bucket {
                template,
                data_location,
                errors,
            })
        })
        .collect()
}

/// Claims every remaining error at or under the node.
pub(crate) fn catch_all_pass(
    template: &str,
    scope: Scope<'_>,
    buffer: &mut ErrorBuffer,
) -> Option<Bucket> {
    let errors = claim(buffer, |error| subtree(error, scope).then_some(()))
        .remove(&())?;
    trace!(data = %scope.data, matched = errors.len(), "fallback message matched");
    Some(Bucket {
        template: template.to_string(),
        data_location: scope.data.clone(),
        errors,
    })
}
