//! Array keywords: `items`, `minItems`, `maxItems` and `uniqueItems`.

use serde_json::Value;

use crate::path::Pointer;

use super::node::{Compiler, SchemaNode};
use super::{non_negative, raw_error, CompileError, Evaluation};

#[derive(Debug, Clone)]
pub(crate) enum ArrayKeyword {
    Items(Box<SchemaNode>),
    TupleItems(Vec<SchemaNode>),
    MinItems(usize),
    MaxItems(usize),
    UniqueItems,
}

impl ArrayKeyword {
    /// Compiles an array keyword, or returns None if `keyword` is not one.
    pub(crate) fn compile(
        compiler: &Compiler,
        keyword: &str,
        value: &Value,
        location: &Pointer,
    ) -> Result<Option<Self>, CompileError> {
        let compiled = match keyword {
            "items" => {
                let base = location.push_field(keyword);
                match value {
                    Value::Array(schemas) => ArrayKeyword::TupleItems(
                        schemas
                            .iter()
                            .enumerate()
                            .map(|(i, schema)| compiler.node(schema, base.push_index(i)))
                            .collect::<Result<_, _>>()?,
                    ),
                    schema => ArrayKeyword::Items(Box::new(compiler.node(schema, base)?)),
                }
            }
            "minItems" => ArrayKeyword::MinItems(non_negative(keyword, value, location)?),
            "maxItems" => ArrayKeyword::MaxItems(non_negative(keyword, value, location)?),
            "uniqueItems" => match value {
                Value::Bool(true) => ArrayKeyword::UniqueItems,
                Value::Bool(false) => return Ok(None),
                _ => {
                    return Err(CompileError::invalid_keyword(
                        location,
                        keyword,
                        "expected a boolean",
                    ))
                }
            },
            _ => return Ok(None),
        };
        Ok(Some(compiled))
    }

    /// Evaluates the keyword against an array instance.
    pub(crate) fn evaluate(
        &self,
        eval: &mut Evaluation<'_>,
        items: &[Value],
        data: &Pointer,
        node: &Pointer,
    ) {
        match self {
            ArrayKeyword::Items(child) => {
                for (i, item) in items.iter().enumerate() {
                    if eval.halted() {
                        return;
                    }
                    eval.node(child, item, &data.push_index(i));
                }
            }
            ArrayKeyword::TupleItems(children) => {
                for (i, (child, item)) in children.iter().zip(items).enumerate() {
                    if eval.halted() {
                        return;
                    }
                    eval.node(child, item, &data.push_index(i));
                }
            }
            ArrayKeyword::MinItems(min) => {
                if items.len() < *min {
                    eval.report(
                        raw_error(
                            "minItems",
                            data,
                            node,
                            format!("must NOT have fewer than {min} items"),
                        )
                        .with_param("limit", *min),
                    );
                }
            }
            ArrayKeyword::MaxItems(max) => {
                if items.len() > *max {
                    eval.report(
                        raw_error(
                            "maxItems",
                            data,
                            node,
                            format!("must NOT have more than {max} items"),
                        )
                        .with_param("limit", *max),
                    );
                }
            }
            ArrayKeyword::UniqueItems => {
                if let Some((i, j)) = first_duplicate(items) {
                    eval.report(
                        raw_error("uniqueItems", data, node, duplicate_message(i, j))
                            .with_param("i", i)
                            .with_param("j", j),
                    );
                }
            }
        }
    }
}

fn duplicate_message(i: usize, j: usize) -> String {
    format!("must NOT have duplicate items (items ## {j} and {i} are identical)")
}

/// Returns `(i, j)` with `j < i` for the first item `i` equal to an earlier item `j`.
fn first_duplicate(items: &[Value]) -> Option<(usize, usize)> {
    items.iter().enumerate().find_map(|(i, item)| {
        items[..i]
            .iter()
            .position(|earlier| earlier == item)
            .map(|j| (i, j))
    })
}
