//! Numeric keywords: `minimum`, `maximum`, `exclusiveMinimum`,
//! `exclusiveMaximum` and `multipleOf`.

use serde_json::{Number, Value};

use crate::error::ValidationError;
use crate::path::Pointer;

use super::{raw_error, CompileError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
}

impl Bound {
    fn keyword(self) -> &'static str {
        match self {
            Bound::Minimum => "minimum",
            Bound::Maximum => "maximum",
            Bound::ExclusiveMinimum => "exclusiveMinimum",
            Bound::ExclusiveMaximum => "exclusiveMaximum",
        }
    }

    fn comparison(self) -> &'static str {
        match self {
            Bound::Minimum => ">=",
            Bound::Maximum => "<=",
            Bound::ExclusiveMinimum => ">",
            Bound::ExclusiveMaximum => "<",
        }
    }

    fn holds(self, value: f64, limit: f64) -> bool {
        match self {
            Bound::Minimum => value >= limit,
            Bound::Maximum => value <= limit,
            Bound::ExclusiveMinimum => value > limit,
            Bound::ExclusiveMaximum => value < limit,
        }
    }
}

/// A constraint applied to numeric values.
#[derive(Debug, Clone)]
pub(crate) enum NumericConstraint {
    Limit { bound: Bound, limit: Number },
    MultipleOf(Number),
}

impl NumericConstraint {
    /// Compiles a numeric keyword, or returns None if `keyword` is not one.
    pub(crate) fn compile(
        keyword: &str,
        value: &Value,
        location: &Pointer,
    ) -> Result<Option<Self>, CompileError> {
        let bound = match keyword {
            "minimum" => Bound::Minimum,
            "maximum" => Bound::Maximum,
            "exclusiveMinimum" => Bound::ExclusiveMinimum,
            "exclusiveMaximum" => Bound::ExclusiveMaximum,
            "multipleOf" => {
                let divisor = number(keyword, value, location)?;
                if !matches!(divisor.as_f64(), Some(d) if d > 0.0) {
                    return Err(CompileError::invalid_keyword(
                        location,
                        keyword,
                        "expected a number greater than 0",
                    ));
                }
                return Ok(Some(NumericConstraint::MultipleOf(divisor)));
            }
            _ => return Ok(None),
        };
        let limit = number(keyword, value, location)?;
        Ok(Some(NumericConstraint::Limit { bound, limit }))
    }

    /// Checks the constraint against a number and returns an error if it fails.
    pub(crate) fn check(
        &self,
        value: f64,
        data: &Pointer,
        node: &Pointer,
    ) -> Option<ValidationError> {
        match self {
            NumericConstraint::Limit { bound, limit } => {
                let limit_f = limit.as_f64()?;
                (!bound.holds(value, limit_f)).then(|| {
                    raw_error(
                        bound.keyword(),
                        data,
                        node,
                        format!("must be {} {}", bound.comparison(), limit),
                    )
                    .with_param("comparison", bound.comparison())
                    .with_param("limit", limit.clone())
                })
            }
            NumericConstraint::MultipleOf(divisor) => {
                let quotient = value / divisor.as_f64()?;
                (quotient.fract() != 0.0).then(|| {
                    raw_error(
                        "multipleOf",
                        data,
                        node,
                        format!("must be multiple of {divisor}"),
                    )
                    .with_param("multipleOf", divisor.clone())
                })
            }
        }
    }
}

fn number(keyword: &str, value: &Value, location: &Pointer) -> Result<Number, CompileError> {
    match value {
        Value::Number(n) => Ok(n.clone()),
        _ => Err(CompileError::invalid_keyword(location, keyword, "expected a number")),
    }
}
