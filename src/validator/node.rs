//! Compiled schema nodes.
//!
//! A schema is compiled once into a tree of [`SchemaNode`]s. Each node knows
//! its schema location, its keywords in declaration order and, when the
//! message engine is attached, its parsed directive.

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::MESSAGE_KEYWORD;
use crate::messages::Directive;
use crate::path::Pointer;

use super::array::ArrayKeyword;
use super::numeric::NumericConstraint;
use super::object::ObjectKeyword;
use super::string::StringConstraint;
use super::{raw_error, CompileError, Evaluation};

/// The JSON types the `type` keyword can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JsonType {
    Null,
    Boolean,
    Object,
    Array,
    Number,
    Integer,
    String,
}

impl JsonType {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "null" => JsonType::Null,
            "boolean" => JsonType::Boolean,
            "object" => JsonType::Object,
            "array" => JsonType::Array,
            "number" => JsonType::Number,
            "integer" => JsonType::Integer,
            "string" => JsonType::String,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Object => "object",
            JsonType::Array => "array",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::String => "string",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (JsonType::Null, Value::Null)
            | (JsonType::Boolean, Value::Bool(_))
            | (JsonType::Object, Value::Object(_))
            | (JsonType::Array, Value::Array(_))
            | (JsonType::Number, Value::Number(_))
            | (JsonType::String, Value::String(_)) => true,
            (JsonType::Integer, Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum Keyword {
    Type(Vec<JsonType>),
    Enum(Vec<Value>),
    Const(Value),
    String(StringConstraint),
    Numeric(NumericConstraint),
    Object(ObjectKeyword),
    Array(ArrayKeyword),
    AllOf(Vec<SchemaNode>),
}

impl Keyword {
    pub(crate) fn evaluate(
        &self,
        eval: &mut Evaluation<'_>,
        instance: &Value,
        data: &Pointer,
        node: &Pointer,
    ) {
        match self {
            Keyword::Type(types) => {
                if !types.iter().any(|t| t.matches(instance)) {
                    let names = types
                        .iter()
                        .map(|t| t.name())
                        .collect::<Vec<_>>()
                        .join(",");
                    eval.report(
                        raw_error("type", data, node, format!("must be {names}"))
                            .with_param("type", names),
                    );
                }
            }
            Keyword::Enum(allowed) => {
                if !allowed.contains(instance) {
                    eval.report(
                        raw_error("enum", data, node, "must be equal to one of the allowed values")
                            .with_param("allowedValues", Value::Array(allowed.clone())),
                    );
                }
            }
            Keyword::Const(allowed) => {
                if allowed != instance {
                    eval.report(
                        raw_error("const", data, node, "must be equal to constant")
                            .with_param("allowedValue", allowed.clone()),
                    );
                }
            }
            Keyword::String(constraint) => {
                if let Some(error) = instance
                    .as_str()
                    .and_then(|s| constraint.check(s, data, node))
                {
                    eval.report(error);
                }
            }
            Keyword::Numeric(constraint) => {
                if let Some(error) = instance
                    .as_f64()
                    .and_then(|n| constraint.check(n, data, node))
                {
                    eval.report(error);
                }
            }
            Keyword::Object(keyword) => {
                if let Value::Object(object) = instance {
                    keyword.evaluate(eval, object, instance, data, node);
                }
            }
            Keyword::Array(keyword) => {
                if let Value::Array(items) = instance {
                    keyword.evaluate(eval, items, data, node);
                }
            }
            Keyword::AllOf(nodes) => {
                for child in nodes {
                    if eval.halted() {
                        return;
                    }
                    eval.node(child, instance, data);
                }
            }
        }
    }
}

/// A compiled schema (or subschema).
#[derive(Debug, Clone)]
pub(crate) struct SchemaNode {
    pub location: Pointer,
    /// Set for the boolean schema `false`.
    pub reject_all: bool,
    pub keywords: Vec<Keyword>,
    pub directive: Option<Directive>,
}

/// Compiles schema values into nodes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Compiler {
    /// Parse `errorMessage` directives; otherwise they are unknown keywords.
    pub messages: bool,
}

impl Compiler {
    pub(crate) fn node(
        &self,
        schema: &Value,
        location: Pointer,
    ) -> Result<SchemaNode, CompileError> {
        let map = match schema {
            Value::Bool(allow) => {
                return Ok(SchemaNode {
                    location,
                    reject_all: !allow,
                    keywords: Vec::new(),
                    directive: None,
                })
            }
            Value::Object(map) => map,
            other => {
                return Err(CompileError::InvalidSchema {
                    location,
                    got: crate::messages::type_name(other),
                })
            }
        };

        let mut keywords = Vec::new();
        let mut directive = None;
        for (name, value) in map {
            if name == MESSAGE_KEYWORD {
                if self.messages {
                    let parsed = Directive::parse(value).map_err(|source| CompileError::Directive {
                        location: location.push_field(name.as_str()),
                        source,
                    })?;
                    trace!(schema = %location, "compiled error message directive");
                    directive = Some(parsed);
                }
                continue;
            }
            if let Some(keyword) = self.keyword(name, value, map, &location)? {
                keywords.push(keyword);
            }
        }

        Ok(SchemaNode {
            location,
            reject_all: false,
            keywords,
            directive,
        })
    }

    fn keyword(
        &self,
        name: &str,
        value: &Value,
        siblings: &Map<String, Value>,
        location: &Pointer,
    ) -> Result<Option<Keyword>, CompileError> {
        let keyword = match name {
            "type" => Keyword::Type(types(value).ok_or_else(|| {
                CompileError::invalid_keyword(
                    location,
                    name,
                    "expected a type name or an array of type names",
                )
            })?),
            "enum" => Keyword::Enum(value.as_array().cloned().ok_or_else(|| {
                CompileError::invalid_keyword(location, name, "expected an array")
            })?),
            "const" => Keyword::Const(value.clone()),
            "allOf" => {
                let schemas = value.as_array().ok_or_else(|| {
                    CompileError::invalid_keyword(location, name, "expected an array")
                })?;
                let base = location.push_field(name);
                Keyword::AllOf(
                    schemas
                        .iter()
                        .enumerate()
                        .map(|(i, schema)| self.node(schema, base.push_index(i)))
                        .collect::<Result<_, _>>()?,
                )
            }
            _ => {
                if let Some(c) = StringConstraint::compile(name, value, location)? {
                    Keyword::String(c)
                } else if let Some(c) = NumericConstraint::compile(name, value, location)? {
                    Keyword::Numeric(c)
                } else if let Some(k) =
                    ObjectKeyword::compile(self, name, value, siblings, location)?
                {
                    Keyword::Object(k)
                } else if let Some(k) = ArrayKeyword::compile(self, name, value, location)? {
                    Keyword::Array(k)
                } else {
                    return Ok(None);
                }
            }
        };
        Ok(Some(keyword))
    }
}

fn types(value: &Value) -> Option<Vec<JsonType>> {
    match value {
        Value::String(name) => JsonType::parse(name).map(|t| vec![t]),
        Value::Array(names) => names
            .iter()
            .map(|name| name.as_str().and_then(JsonType::parse))
            .collect(),
        _ => None,
    }
}
