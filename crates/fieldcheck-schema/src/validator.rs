use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::ValidatorConfig;
use crate::error::{FieldError, FieldErrorKind};
use crate::model::{FieldRule, FieldType, Schema, SchemaNode, ROOT};
use crate::rules::{self, Violation};

/// Result of a validation call that raised no field error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The document satisfies every rule.
    Valid,
    /// No document was supplied; the caller decides whether that is acceptable.
    NoDocument,
    /// No schema is defined for the document; nothing was checked.
    NoSchema,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Valid => "valid",
            Outcome::NoDocument => "no_document",
            Outcome::NoSchema => "no_schema",
        }
    }
}

/// Validate `document` against `schema` with default settings.
pub fn validate(document: Option<&Value>, schema: &Schema) -> Result<Outcome, FieldError> {
    Validator::new(schema).validate(document)
}

/// Recursive validator bound to one schema.
///
/// Validation is fail-fast: the first violation is returned unchanged from
/// whatever depth it was found at.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    schema: &'a Schema,
    config: ValidatorConfig,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self::with_config(schema, ValidatorConfig::default())
    }

    pub fn with_config(schema: &'a Schema, config: ValidatorConfig) -> Self {
        Self { schema, config }
    }

    pub fn validate(&self, document: Option<&Value>) -> Result<Outcome, FieldError> {
        let Some(document) = document else {
            return Ok(Outcome::NoDocument);
        };
        if self.schema.is_empty() {
            return Ok(Outcome::Valid);
        }

        let root = self
            .schema
            .root()
            .ok_or_else(|| field_error(FieldErrorKind::MisconfiguredSchema, None, ROOT))?;
        let Value::Object(fields) = document else {
            return Err(FieldError::new(
                FieldErrorKind::InvalidType,
                "",
                "Invalid document; expected an object",
            ));
        };

        match self.validate_node(fields, root, None, 0) {
            Ok(()) => Ok(Outcome::Valid),
            Err(err) => {
                tracing::debug!(field = %err.field, kind = err.kind.as_str(), "document rejected");
                Err(err)
            }
        }
    }

    fn validate_node(
        &self,
        node: &Map<String, Value>,
        schema_node: &SchemaNode,
        parent: Option<&str>,
        depth: usize,
    ) -> Result<(), FieldError> {
        for (field, rule) in schema_node.iter() {
            let value = node.get(field);
            if rule.nullable && matches!(value, Some(Value::Null)) {
                continue;
            }
            if rule.required && is_blank(value) {
                return Err(field_error(FieldErrorKind::MissingField, parent, field));
            }
        }

        for (field, value) in node {
            let Some(rule) = schema_node.get(field) else {
                continue;
            };
            if rule.nullable && value.is_null() {
                continue;
            }

            rules::check(rule, value).map_err(|violation| match violation {
                Violation::NotAllowed => enum_error(rule, parent, field),
                Violation::InvalidType => field_error(FieldErrorKind::InvalidType, parent, field),
                Violation::NotBoolean => FieldError::new(
                    FieldErrorKind::InvalidType,
                    qualified(parent, field),
                    format!(
                        "Invalid boolean field value for {}",
                        display_name(parent, field)
                    ),
                ),
            })?;

            self.descend(field, rule, value, parent, depth)?;
        }

        Ok(())
    }

    /// Validate a container field against the node its `schema` names.
    fn descend(
        &self,
        field: &str,
        rule: &FieldRule,
        value: &Value,
        parent: Option<&str>,
        depth: usize,
    ) -> Result<(), FieldError> {
        let (Some(field_type), Some(target)) = (rule.field_type, rule.schema.as_deref()) else {
            return Ok(());
        };
        if !field_type.is_container() {
            return Ok(());
        }

        let child = self
            .schema
            .get(target)
            .ok_or_else(|| field_error(FieldErrorKind::MisconfiguredSchema, parent, field))?;

        match (field_type, value) {
            (FieldType::Array, Value::Array(items)) => {
                for item in items {
                    let Value::Object(element) = item else {
                        return Err(field_error(FieldErrorKind::InvalidType, parent, field));
                    };
                    self.check_depth(parent, field, depth)?;
                    self.validate_node(element, child, Some(target), depth + 1)?;
                }
                Ok(())
            }
            (FieldType::Object, Value::Object(object)) => {
                self.check_depth(parent, field, depth)?;
                self.validate_node(object, child, Some(target), depth + 1)
            }
            _ => Ok(()),
        }
    }

    /// Fails when entering a child node at `depth` would pass `max_depth`.
    fn check_depth(
        &self,
        parent: Option<&str>,
        field: &str,
        depth: usize,
    ) -> Result<(), FieldError> {
        if depth < self.config.max_depth {
            return Ok(());
        }
        Err(FieldError::new(
            FieldErrorKind::DepthExceeded,
            qualified(parent, field),
            format!(
                "Maximum nesting depth of {} exceeded at {}",
                self.config.max_depth,
                display_name(parent, field)
            ),
        ))
    }
}

/// Absent, null, and empty-string values all fail `required`.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

fn qualified(parent: Option<&str>, field: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}.{field}"),
        None => field.to_string(),
    }
}

/// Human-readable field name.
fn friendly(name: &str) -> String {
    name.replace('_', " ")
}

/// Message form of a field: the schema prefix stays raw, the field is friendly.
fn display_name(parent: Option<&str>, field: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}.{}", friendly(field)),
        None => friendly(field),
    }
}

fn field_error(kind: FieldErrorKind, parent: Option<&str>, field: &str) -> FieldError {
    let name = qualified(parent, field);
    let shown = display_name(parent, field);
    let message = match kind {
        FieldErrorKind::MissingField => format!("Missing {shown} field"),
        FieldErrorKind::MisconfiguredSchema => format!("Invalid validation config for {shown}"),
        _ => format!("Invalid field value for {shown}"),
    };
    FieldError::new(kind, name, message)
}

fn enum_error(rule: &FieldRule, parent: Option<&str>, field: &str) -> FieldError {
    let name = qualified(parent, field);
    let allowed = rule
        .allowed
        .iter()
        .flatten()
        .map(rules::literal_text)
        .collect::<Vec<_>>()
        .join(", ");
    let message = format!(
        "Invalid field value for {}; must be one of {allowed}",
        display_name(parent, field)
    );
    FieldError::new(FieldErrorKind::InvalidEnum, name, message)
}
