//! Declarative field-rule schemas and a recursive validator for decoded
//! request bodies.
//!
//! A [`Schema`] is a set of named [`SchemaNode`]s, each mapping field names
//! to a [`FieldRule`] (required, nullable, type, bounds, enumeration,
//! pattern, child schema). Validation starts at the node named `root` and
//! descends into `array` and `object` fields that reference another node.
//! The first violation is returned as a [`FieldError`].
//!
//! ```
//! use fieldcheck_schema::{validate, FieldErrorKind, Outcome, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::from_yaml_str(
//!     "root:\n  email: { required: true, type: string, pattern: '^.+@.+$' }\n",
//! )
//! .unwrap()
//! .unwrap();
//!
//! assert_eq!(validate(Some(&json!({"email": "a@b.com"})), &schema), Ok(Outcome::Valid));
//!
//! let err = validate(Some(&json!({})), &schema).unwrap_err();
//! assert_eq!(err.kind, FieldErrorKind::MissingField);
//! assert_eq!(err.field, "email");
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod lint;
pub mod loader;
pub mod model;
pub mod registry;
mod rules;
pub mod validator;

pub use config::{RegistryConfig, ValidatorConfig};
pub use document::{document_from_json_slice, document_from_yaml_str};
pub use error::{FieldError, FieldErrorKind, Result, SchemaError};
pub use lint::{IssueKind, SchemaIssue};
pub use loader::SchemaFormat;
pub use model::{FieldRule, FieldType, Pattern, PatternError, Schema, SchemaNode, ROOT};
pub use registry::SchemaRegistry;
pub use validator::{validate, Outcome, Validator};
