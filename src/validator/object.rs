//! Object keywords: `required`, `properties`, `additionalProperties`,
//! `dependencies`, `dependentRequired`, `minProperties` and `maxProperties`.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::path::Pointer;

use super::node::{Compiler, SchemaNode};
use super::{non_negative, raw_error, CompileError, Evaluation};

/// How properties not listed under `properties` are handled.
#[derive(Debug, Clone)]
pub(crate) enum Additional {
    Deny,
    Validate(Box<SchemaNode>),
}

/// What the presence of a property requires.
#[derive(Debug, Clone)]
pub(crate) enum Dependency {
    Properties(Vec<String>),
    Schema(Box<SchemaNode>),
}

#[derive(Debug, Clone)]
pub(crate) enum ObjectKeyword {
    Required(Vec<String>),
    Properties(IndexMap<String, SchemaNode>),
    AdditionalProperties {
        declared: Vec<String>,
        policy: Additional,
    },
    Dependencies {
        keyword: &'static str,
        entries: IndexMap<String, Dependency>,
    },
    MinProperties(usize),
    MaxProperties(usize),
}

impl ObjectKeyword {
    /// Compiles an object keyword, or returns None if `keyword` is not one.
    pub(crate) fn compile(
        compiler: &Compiler,
        keyword: &str,
        value: &Value,
        siblings: &Map<String, Value>,
        location: &Pointer,
    ) -> Result<Option<Self>, CompileError> {
        let compiled = match keyword {
            "required" => ObjectKeyword::Required(string_list(keyword, value, location)?),
            "properties" => {
                let props = value.as_object().ok_or_else(|| {
                    CompileError::invalid_keyword(location, keyword, "expected an object")
                })?;
                let base = location.push_field(keyword);
                let nodes = props
                    .iter()
                    .map(|(name, schema)| {
                        compiler
                            .node(schema, base.push_field(name.as_str()))
                            .map(|node| (name.clone(), node))
                    })
                    .collect::<Result<IndexMap<_, _>, _>>()?;
                ObjectKeyword::Properties(nodes)
            }
            "additionalProperties" => {
                let policy = match value {
                    Value::Bool(true) => return Ok(None),
                    Value::Bool(false) => Additional::Deny,
                    schema => Additional::Validate(Box::new(
                        compiler.node(schema, location.push_field(keyword))?,
                    )),
                };
                let declared = siblings
                    .get("properties")
                    .and_then(Value::as_object)
                    .map(|props| props.keys().cloned().collect())
                    .unwrap_or_default();
                ObjectKeyword::AdditionalProperties { declared, policy }
            }
            "dependencies" | "dependentRequired" => {
                let map = value.as_object().ok_or_else(|| {
                    CompileError::invalid_keyword(location, keyword, "expected an object")
                })?;
                let keyword: &'static str = if keyword == "dependencies" {
                    "dependencies"
                } else {
                    "dependentRequired"
                };
                let base = location.push_field(keyword);
                let mut entries = IndexMap::new();
                for (property, dependency) in map {
                    let compiled = match dependency {
                        Value::Array(_) => {
                            Dependency::Properties(string_list(keyword, dependency, location)?)
                        }
                        schema if keyword == "dependencies" => Dependency::Schema(Box::new(
                            compiler.node(schema, base.push_field(property.as_str()))?,
                        )),
                        _ => {
                            return Err(CompileError::invalid_keyword(
                                location,
                                keyword,
                                "expected arrays of property names",
                            ))
                        }
                    };
                    entries.insert(property.clone(), compiled);
                }
                ObjectKeyword::Dependencies { keyword, entries }
            }
            "minProperties" => {
                ObjectKeyword::MinProperties(non_negative(keyword, value, location)?)
            }
            "maxProperties" => {
                ObjectKeyword::MaxProperties(non_negative(keyword, value, location)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(compiled))
    }

    /// Evaluates the keyword against an object instance.
    pub(crate) fn evaluate(
        &self,
        eval: &mut Evaluation<'_>,
        object: &Map<String, Value>,
        instance: &Value,
        data: &Pointer,
        node: &Pointer,
    ) {
        match self {
            ObjectKeyword::Required(names) => {
                for name in names.iter().filter(|name| !object.contains_key(*name)) {
                    eval.report(
                        raw_error(
                            "required",
                            data,
                            node,
                            format!("must have required property '{name}'"),
                        )
                        .with_param("missingProperty", name.as_str()),
                    );
                    if eval.halted() {
                        return;
                    }
                }
            }
            ObjectKeyword::Properties(nodes) => {
                for (name, child) in nodes {
                    if eval.halted() {
                        return;
                    }
                    if let Some(value) = object.get(name) {
                        eval.node(child, value, &data.push_field(name.as_str()));
                    }
                }
            }
            ObjectKeyword::AdditionalProperties { declared, policy } => {
                for (key, value) in object.iter().filter(|(key, _)| !declared.contains(*key)) {
                    if eval.halted() {
                        return;
                    }
                    match policy {
                        Additional::Deny => eval.report(
                            raw_error(
                                "additionalProperties",
                                data,
                                node,
                                "must NOT have additional properties",
                            )
                            .with_param("additionalProperty", key.as_str()),
                        ),
                        Additional::Validate(child) => {
                            eval.node(child, value, &data.push_field(key.as_str()));
                        }
                    }
                }
            }
            ObjectKeyword::Dependencies { keyword, entries } => {
                for (property, dependency) in entries {
                    if eval.halted() {
                        return;
                    }
                    if !object.contains_key(property) {
                        continue;
                    }
                    match dependency {
                        Dependency::Properties(deps) => {
                            for missing in deps.iter().filter(|d| !object.contains_key(*d)) {
                                eval.report(
                                    raw_error(
                                        keyword,
                                        data,
                                        node,
                                        dependency_message(missing, property),
                                    )
                                    .with_param("property", property.as_str())
                                    .with_param("missingProperty", missing.as_str())
                                    .with_param("deps", deps.join(", "))
                                    .with_param("depsCount", deps.len()),
                                );
                                if eval.halted() {
                                    return;
                                }
                            }
                        }
                        Dependency::Schema(child) => eval.node(child, instance, data),
                    }
                }
            }
            ObjectKeyword::MinProperties(min) => {
                if object.len() < *min {
                    eval.report(
                        raw_error(
                            "minProperties",
                            data,
                            node,
                            format!("must NOT have fewer than {min} properties"),
                        )
                        .with_param("limit", *min),
                    );
                }
            }
            ObjectKeyword::MaxProperties(max) => {
                if object.len() > *max {
                    eval.report(
                        raw_error(
                            "maxProperties",
                            data,
                            node,
                            format!("must NOT have more than {max} properties"),
                        )
                        .with_param("limit", *max),
                    );
                }
            }
        }
    }
}

fn dependency_message(missing: &str, property: &str) -> String {
    format!("must have property {missing} when property {property} is present")
}

fn string_list(
    keyword: &str,
    value: &Value,
    location: &Pointer,
) -> Result<Vec<String>, CompileError> {
    value
        .as_array()
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .ok_or_else(|| {
            CompileError::invalid_keyword(location, keyword, "expected an array of strings")
        })
}
