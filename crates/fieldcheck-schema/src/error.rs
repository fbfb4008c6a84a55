use serde::Serialize;

/// The rule class a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// A required field is absent, null, or an empty string.
    MissingField,
    /// The value is not one of the rule's `in` literals.
    InvalidEnum,
    /// The value fails the type, bound, or pattern check of its declared type.
    InvalidType,
    /// A `schema` reference names a node that does not exist.
    MisconfiguredSchema,
    /// Child schemas nest deeper than the configured maximum.
    DepthExceeded,
}

impl FieldErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldErrorKind::MissingField => "missing_field",
            FieldErrorKind::InvalidEnum => "invalid_enum",
            FieldErrorKind::InvalidType => "invalid_type",
            FieldErrorKind::MisconfiguredSchema => "misconfigured_schema",
            FieldErrorKind::DepthExceeded => "depth_exceeded",
        }
    }
}

/// The first rule violation found in a document.
///
/// `field` is the qualified field name (`tag.name` inside a child schema),
/// `message` is the human-readable form. Serializes as
/// `{"message", "field", "kind"}` so callers can use it directly as an
/// error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub message: String,
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(kind: FieldErrorKind, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: field.into(),
            kind,
        }
    }
}

/// Errors raised while loading schemas or validating through a registry.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema file or directory could not be read.
    #[error("failed to load schema: {0}")]
    LoadFailed(String),

    /// The schema text could not be decoded into the schema model.
    #[error("failed to parse schema {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// A route name is empty or would escape the schema directory.
    #[error("invalid route name: {0:?}")]
    InvalidRoute(String),

    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The document could not be decoded.
    #[error("failed to decode document: {0}")]
    InvalidDocument(String),

    /// No schema registered for the given route.
    #[error("no schema registered for route {0}")]
    NoSchema(String),

    /// No document was supplied for a route that requires one.
    #[error("no document supplied for route {0}")]
    MissingDocument(String),

    /// The document violated a field rule.
    #[error(transparent)]
    InvalidField(#[from] FieldError),
}

impl SchemaError {
    /// The field violation, when this error carries one.
    pub fn field_error(&self) -> Option<&FieldError> {
        match self {
            SchemaError::InvalidField(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
