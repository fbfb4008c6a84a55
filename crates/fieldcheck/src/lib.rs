//! Schema-driven validation of decoded request bodies.
//!
//! fieldcheck checks nested key-value documents against declarative,
//! route-keyed schemas: required and nullable fields, primitive types,
//! numeric and string bounds, enumerations, patterns, and child schemas for
//! arrays and objects. The first violation is reported as a structured
//! [`FieldError`] the caller can turn into a 4xx response.
//!
//! # Crate Structure
//!
//! - [`schema`] — Schema model, loader, linter, registry, and the recursive validator
//!
//! The most used types are re-exported at the crate root.

/// Re-export schema types.
pub mod schema {
    pub use fieldcheck_schema::*;
}

pub use fieldcheck_schema::{
    validate, FieldError, FieldErrorKind, Outcome, RegistryConfig, Schema, SchemaError,
    SchemaRegistry, Validator, ValidatorConfig,
};
