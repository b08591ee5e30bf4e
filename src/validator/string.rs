//! String keywords: `minLength`, `maxLength` and `pattern`.

use regex::Regex;
use serde_json::Value;

use crate::error::ValidationError;
use crate::path::Pointer;

use super::{raw_error, CompileError};

/// A constraint applied to string values.
#[derive(Debug, Clone)]
pub(crate) enum StringConstraint {
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
}

impl StringConstraint {
    /// Compiles a string keyword, or returns None if `keyword` is not one.
    pub(crate) fn compile(
        keyword: &str,
        value: &Value,
        location: &Pointer,
    ) -> Result<Option<Self>, CompileError> {
        let constraint = match keyword {
            "minLength" => {
                StringConstraint::MinLength(super::non_negative(keyword, value, location)?)
            }
            "maxLength" => {
                StringConstraint::MaxLength(super::non_negative(keyword, value, location)?)
            }
            "pattern" => {
                let source = value.as_str().ok_or_else(|| {
                    CompileError::invalid_keyword(location, keyword, "expected a string")
                })?;
                let regex = Regex::new(source).map_err(|source| CompileError::Pattern {
                    location: location.push_field(keyword),
                    source,
                })?;
                StringConstraint::Pattern(regex)
            }
            _ => return Ok(None),
        };
        Ok(Some(constraint))
    }

    /// Checks the constraint against a string and returns an error if it fails.
    pub(crate) fn check(
        &self,
        value: &str,
        data: &Pointer,
        node: &Pointer,
    ) -> Option<ValidationError> {
        match self {
            StringConstraint::MinLength(min) => {
                let len = value.chars().count();
                (len < *min).then(|| {
                    raw_error(
                        "minLength",
                        data,
                        node,
                        format!("must NOT have fewer than {min} characters"),
                    )
                    .with_param("limit", *min)
                })
            }
            StringConstraint::MaxLength(max) => {
                let len = value.chars().count();
                (len > *max).then(|| {
                    raw_error(
                        "maxLength",
                        data,
                        node,
                        format!("must NOT have more than {max} characters"),
                    )
                    .with_param("limit", *max)
                })
            }
            StringConstraint::Pattern(regex) => (!regex.is_match(value)).then(|| {
                raw_error(
                    "pattern",
                    data,
                    node,
                    format!("must match pattern \"{}\"", regex.as_str()),
                )
                .with_param("pattern", regex.as_str())
            }),
        }
    }
}
