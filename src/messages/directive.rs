//! Message directives.
//!
//! A directive is the `errorMessage` value attached to a schema node. It is
//! parsed once, up front, into the tagged [`Directive`] so the matching
//! passes work on an explicit structure instead of probing JSON shapes.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Key of the fallback template in a structured directive.
pub const FALLBACK_KEY: &str = "_";

const PROPERTIES_KEY: &str = "properties";
const ITEMS_KEY: &str = "items";

/// Keywords that report one failure per property through a parameter,
/// paired with the name of that parameter.
const KEYWORD_PROPERTY_PARAMS: &[(&str, &str)] = &[
    ("required", "missingProperty"),
    ("dependencies", "property"),
    ("dependentRequired", "property"),
];

/// Returns the parameter that names the failing property for keywords that
/// accept a property-keyed template map.
pub fn keyword_property_param(keyword: &str) -> Option<&'static str> {
    KEYWORD_PROPERTY_PARAMS
        .iter()
        .find(|(k, _)| *k == keyword)
        .map(|(_, param)| *param)
}

/// Errors raised when a directive has an unsupported shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    /// The directive is neither a string nor an object.
    #[error("directive must be a string or an object, got {0}")]
    InvalidType(&'static str),

    /// A template slot did not hold a string.
    #[error("template for '{key}' must be a string, got {got}")]
    TemplateNotString { key: String, got: &'static str },

    /// `properties` was not an object of strings.
    #[error("'properties' must be an object of templates")]
    InvalidProperties,

    /// `items` was not an array of strings.
    #[error("'items' must be an array of templates")]
    InvalidItems,

    /// A property-keyed map was given for a keyword that has no property
    /// parameter to bucket by.
    #[error("keyword '{0}' does not support a property map")]
    UnsupportedPropertyMap(String),

    /// A keyword was given both a flat template and a property map.
    #[error("keyword '{0}' has both a template and a property map")]
    ConflictingKeyword(String),
}

/// The templates declared by a structured directive.
///
/// Every map keeps declaration order, which is also the order aggregated
/// messages are emitted in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rules {
    /// Template for errors no other rule claims.
    pub fallback: Option<String>,
    /// Keyword name to template.
    pub keywords: IndexMap<String, String>,
    /// Keyword name to (property name to template).
    pub keyword_properties: IndexMap<String, IndexMap<String, String>>,
    /// Property name to template; applies to object instances.
    pub properties: IndexMap<String, String>,
    /// Item index to template; applies to array instances.
    pub items: Vec<String>,
}

impl Rules {
    /// Returns true if the directive declares no template at all.
    pub fn is_empty(&self) -> bool {
        self.fallback.is_none()
            && self.keywords.is_empty()
            && self.keyword_properties.is_empty()
            && self.properties.is_empty()
            && self.items.is_empty()
    }
}

/// A parsed `errorMessage` directive.
///
/// # Example
///
/// ```rust
/// use errata::Directive;
/// use serde_json::json;
///
/// let plain = Directive::parse(&json!("bad value")).unwrap();
/// assert_eq!(plain, Directive::Plain("bad value".to_string()));
///
/// let structured = Directive::parse(&json!({
///     "type": "must be an object",
///     "required": { "name": "name is required" },
///     "properties": { "age": "age must be a number" },
///     "_": "something else is wrong"
/// }))
/// .unwrap();
///
/// let rules = structured.rules().unwrap();
/// assert_eq!(rules.fallback.as_deref(), Some("something else is wrong"));
/// assert_eq!(rules.keyword_properties["required"]["name"], "name is required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// One template for every error at or under the node.
    Plain(String),
    /// Per-keyword, per-property and per-item templates plus a fallback.
    Structured(Rules),
}

impl Directive {
    /// Parses a directive from its schema value.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError`] if the value or any nested slot has an
    /// unsupported shape.
    pub fn parse(value: &Value) -> Result<Self, DirectiveError> {
        match value {
            Value::String(template) => Ok(Directive::Plain(template.clone())),
            Value::Object(map) => parse_rules(map).map(Directive::Structured),
            other => Err(DirectiveError::InvalidType(type_name(other))),
        }
    }

    /// Starts building a structured directive.
    pub fn builder() -> DirectiveBuilder {
        DirectiveBuilder::default()
    }

    /// Returns the rules of a structured directive.
    pub fn rules(&self) -> Option<&Rules> {
        match self {
            Directive::Plain(_) => None,
            Directive::Structured(rules) => Some(rules),
        }
    }
}

fn parse_rules(map: &Map<String, Value>) -> Result<Rules, DirectiveError> {
    let mut rules = Rules::default();
    for (key, value) in map {
        match key.as_str() {
            FALLBACK_KEY => rules.fallback = Some(template(key, value)?),
            PROPERTIES_KEY => {
                let props = value.as_object().ok_or(DirectiveError::InvalidProperties)?;
                rules.properties = string_map(props).ok_or(DirectiveError::InvalidProperties)?;
            }
            ITEMS_KEY => {
                let items = value.as_array().ok_or(DirectiveError::InvalidItems)?;
                rules.items = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or(DirectiveError::InvalidItems)?;
            }
            keyword => match value {
                Value::Object(props) => {
                    if keyword_property_param(keyword).is_none() {
                        return Err(DirectiveError::UnsupportedPropertyMap(keyword.to_string()));
                    }
                    let templates = string_map(props).ok_or_else(|| {
                        DirectiveError::TemplateNotString {
                            key: keyword.to_string(),
                            got: "object with non-string values",
                        }
                    })?;
                    rules
                        .keyword_properties
                        .insert(keyword.to_string(), templates);
                }
                other => {
                    rules
                        .keywords
                        .insert(keyword.to_string(), template(keyword, other)?);
                }
            },
        }
    }
    Ok(rules)
}

fn template(key: &str, value: &Value) -> Result<String, DirectiveError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| DirectiveError::TemplateNotString {
            key: key.to_string(),
            got: type_name(value),
        })
}

fn string_map(map: &Map<String, Value>) -> Option<IndexMap<String, String>> {
    map.iter()
        .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect()
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Builder for structured directives.
///
/// ```rust
/// use errata::Directive;
///
/// let directive = Directive::builder()
///     .keyword("type", "must be an object")
///     .keyword_property("required", "id", "id is required")
///     .property("age", "age must be a number")
///     .fallback("invalid")
///     .build()
///     .unwrap();
///
/// assert!(directive.rules().is_some());
///
/// let conflict = Directive::builder()
///     .keyword("required", "something is missing")
///     .keyword_property("required", "id", "id is required")
///     .build();
/// assert!(conflict.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectiveBuilder {
    rules: Rules,
}

impl DirectiveBuilder {
    /// Sets the fallback template.
    pub fn fallback(mut self, template: impl Into<String>) -> Self {
        self.rules.fallback = Some(template.into());
        self
    }

    /// Adds a template for every error of `keyword` at the node.
    pub fn keyword(mut self, keyword: impl Into<String>, template: impl Into<String>) -> Self {
        self.rules.keywords.insert(keyword.into(), template.into());
        self
    }

    /// Adds a template for failures of `keyword` that name `property`.
    pub fn keyword_property(
        mut self,
        keyword: impl Into<String>,
        property: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.rules
            .keyword_properties
            .entry(keyword.into())
            .or_default()
            .insert(property.into(), template.into());
        self
    }

    /// Adds a template for errors under the given child property.
    pub fn property(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.rules.properties.insert(name.into(), template.into());
        self
    }

    /// Appends a template for errors under the next array index.
    pub fn item(mut self, template: impl Into<String>) -> Self {
        self.rules.items.push(template.into());
        self
    }

    /// Finishes the directive.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::ConflictingKeyword`] if a keyword has both a
    /// flat template and a property map, and
    /// [`DirectiveError::UnsupportedPropertyMap`] if a property map was given
    /// for a keyword without a property parameter.
    pub fn build(self) -> Result<Directive, DirectiveError> {
        for keyword in self.rules.keyword_properties.keys() {
            if self.rules.keywords.contains_key(keyword) {
                return Err(DirectiveError::ConflictingKeyword(keyword.clone()));
            }
            if keyword_property_param(keyword).is_none() {
                return Err(DirectiveError::UnsupportedPropertyMap(keyword.clone()));
            }
        }
        Ok(Directive::Structured(self.rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plain() {
        let directive = Directive::parse(&json!("nope")).unwrap();
        assert_eq!(directive, Directive::Plain("nope".to_string()));
        assert!(directive.rules().is_none());
    }

    #[test]
    fn test_parse_keeps_declaration_order() {
        let directive = Directive::parse(&json!({
            "minLength": "too short",
            "type": "not a string",
            "pattern": "bad format"
        }))
        .unwrap();
        let keys: Vec<_> = directive.rules().unwrap().keywords.keys().cloned().collect();
        assert_eq!(keys, vec!["minLength", "type", "pattern"]);
    }

    #[test]
    fn test_parse_all_slots() {
        let directive = Directive::parse(&json!({
            "type": "t",
            "required": { "a": "need a", "b": "need b" },
            "dependencies": "deps",
            "properties": { "x": "x bad" },
            "items": ["first", "second"],
            "_": "fallback"
        }))
        .unwrap();
        let rules = directive.rules().unwrap();

        assert_eq!(rules.keywords["type"], "t");
        assert_eq!(rules.keywords["dependencies"], "deps");
        assert_eq!(rules.keyword_properties["required"]["b"], "need b");
        assert_eq!(rules.properties["x"], "x bad");
        assert_eq!(rules.items, vec!["first", "second"]);
        assert_eq!(rules.fallback.as_deref(), Some("fallback"));
        assert!(!rules.is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        assert_eq!(
            Directive::parse(&json!(42)),
            Err(DirectiveError::InvalidType("number"))
        );
        assert_eq!(
            Directive::parse(&json!({ "type": 1 })),
            Err(DirectiveError::TemplateNotString {
                key: "type".to_string(),
                got: "number"
            })
        );
        assert_eq!(
            Directive::parse(&json!({ "properties": ["x"] })),
            Err(DirectiveError::InvalidProperties)
        );
        assert_eq!(
            Directive::parse(&json!({ "properties": { "x": 1 } })),
            Err(DirectiveError::InvalidProperties)
        );
        assert_eq!(
            Directive::parse(&json!({ "items": [1] })),
            Err(DirectiveError::InvalidItems)
        );
        assert_eq!(
            Directive::parse(&json!({ "minimum": { "x": "y" } })),
            Err(DirectiveError::UnsupportedPropertyMap("minimum".to_string()))
        );
        assert!(Directive::parse(&json!({ "_": false })).is_err());
    }

    #[test]
    fn test_keyword_property_params() {
        assert_eq!(keyword_property_param("required"), Some("missingProperty"));
        assert_eq!(keyword_property_param("dependencies"), Some("property"));
        assert_eq!(keyword_property_param("dependentRequired"), Some("property"));
        assert_eq!(keyword_property_param("type"), None);
    }

    #[test]
    fn test_builder_rejects_conflict() {
        let result = Directive::builder()
            .keyword("required", "missing")
            .keyword_property("required", "a", "need a")
            .build();
        assert_eq!(
            result,
            Err(DirectiveError::ConflictingKeyword("required".to_string()))
        );
    }

    #[test]
    fn test_builder_rejects_unsupported_property_map() {
        let result = Directive::builder()
            .keyword_property("maximum", "a", "x")
            .build();
        assert_eq!(
            result,
            Err(DirectiveError::UnsupportedPropertyMap("maximum".to_string()))
        );
    }

    #[test]
    fn test_builder_matches_parse() {
        let built = Directive::builder()
            .keyword("type", "t")
            .property("x", "x bad")
            .item("first")
            .fallback("fallback")
            .build()
            .unwrap();
        let parsed = Directive::parse(&json!({
            "type": "t",
            "properties": { "x": "x bad" },
            "items": ["first"],
            "_": "fallback"
        }))
        .unwrap();
        assert_eq!(built, parsed);
    }
}
