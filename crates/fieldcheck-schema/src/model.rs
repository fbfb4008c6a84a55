use std::collections::HashMap;
use std::fmt;

use regex::Regex;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the node every document is validated against first.
pub const ROOT: &str = "root";

/// Delimiters recognized around PCRE-style patterns (`/^a+$/i`).
const PATTERN_DELIMITERS: [char; 3] = ['/', '#', '~'];

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Boolean,
    Int,
    Float,
    Array,
    Object,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }

    /// Whether a `schema` reference applies to this type.
    pub fn is_container(self) -> bool {
        matches!(self, FieldType::Array | FieldType::Object)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when compiling a `pattern` rule.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error("unsupported pattern modifier {0:?}")]
    Modifier(char),
}

/// A compiled `pattern` rule.
///
/// Accepts both bare expressions (`^.+@.+$`) and delimited ones
/// (`/^.+@.+$/i`); trailing modifiers on a delimited pattern become
/// inline flags.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self, PatternError> {
        let expression = match split_delimited(source) {
            Some((body, modifiers)) => with_inline_flags(body, modifiers)?,
            None => source.to_string(),
        };

        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(&expression)?,
        })
    }

    /// The pattern as written in the schema.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source)
            .map_err(|err| de::Error::custom(format_args!("invalid pattern {source:?}: {err}")))
    }
}

fn split_delimited(source: &str) -> Option<(&str, &str)> {
    let delimiter = source
        .chars()
        .next()
        .filter(|c| PATTERN_DELIMITERS.contains(c))?;
    let rest = &source[delimiter.len_utf8()..];
    let end = rest.rfind(delimiter)?;
    let modifiers = &rest[end + delimiter.len_utf8()..];

    modifiers
        .chars()
        .all(|c| c.is_ascii_alphabetic())
        .then_some((&rest[..end], modifiers))
}

fn with_inline_flags(body: &str, modifiers: &str) -> Result<String, PatternError> {
    let mut flags = String::new();
    for modifier in modifiers.chars() {
        match modifier {
            'i' | 'm' | 's' | 'x' | 'U' => flags.push(modifier),
            // Unicode matching is already the default.
            'u' => {}
            other => return Err(PatternError::Modifier(other)),
        }
    }

    if flags.is_empty() {
        Ok(body.to_string())
    } else {
        Ok(format!("(?{flags}){body}"))
    }
}

/// The constraint set for a single field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldRule {
    pub required: bool,
    pub nullable: bool,
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    #[serde(rename = "in")]
    pub allowed: Option<Vec<Value>>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pattern: Option<Pattern>,
    pub schema: Option<String>,
}

impl FieldRule {
    /// A rule with only a declared type.
    pub fn typed(field_type: FieldType) -> Self {
        Self {
            field_type: Some(field_type),
            ..Self::default()
        }
    }

    pub fn require(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn allow_null(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn with_bounds(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    pub fn with_allowed(mut self, allowed: impl IntoIterator<Item = Value>) -> Self {
        self.allowed = Some(allowed.into_iter().collect());
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

/// One named rule-set: field name to rule, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    rules: Vec<(String, FieldRule)>,
}

impl SchemaNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, field: impl Into<String>, rule: FieldRule) -> Self {
        self.insert(field, rule);
        self
    }

    /// Insert or replace the rule for `field`, keeping its original position.
    pub fn insert(&mut self, field: impl Into<String>, rule: FieldRule) {
        let field = field.into();
        match self.rules.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = rule,
            None => self.rules.push((field, rule)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.rules
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rule)| rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'de> Deserialize<'de> for SchemaNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SchemaNodeVisitor)
    }
}

struct SchemaNodeVisitor;

impl<'de> Visitor<'de> for SchemaNodeVisitor {
    type Value = SchemaNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of field names to field rules")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SchemaNode, A::Error> {
        let mut node = SchemaNode::new();
        // A field declared with no rules (`name: ~`) carries no constraints.
        while let Some((field, rule)) = access.next_entry::<String, Option<FieldRule>>()? {
            if node.get(&field).is_some() {
                return Err(de::Error::custom(format_args!(
                    "duplicate field rule `{field}`"
                )));
            }
            node.rules.push((field, rule.unwrap_or_default()));
        }
        Ok(node)
    }
}

/// The full named collection of rule-sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    nodes: HashMap<String, SchemaNode>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.insert(name, node);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, node: SchemaNode) {
        self.nodes.insert(name.into(), node);
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.nodes.get(name)
    }

    /// The entry-point node.
    pub fn root(&self) -> Option<&SchemaNode> {
        self.get(ROOT)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Node names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the schema defines no nodes and so constrains nothing.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SchemaVisitor)
    }
}

struct SchemaVisitor;

impl<'de> Visitor<'de> for SchemaVisitor {
    type Value = Schema;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of schema names to schema nodes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Schema, A::Error> {
        let mut schema = Schema::new();
        while let Some((name, node)) = access.next_entry::<String, Option<SchemaNode>>()? {
            if schema.contains(&name) {
                return Err(de::Error::custom(format_args!(
                    "duplicate schema node `{name}`"
                )));
            }
            schema.insert(name, node.unwrap_or_default());
        }
        Ok(schema)
    }
}
