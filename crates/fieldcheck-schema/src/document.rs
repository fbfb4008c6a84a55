//! Decoding request bodies into documents.
//!
//! A document is a `serde_json::Value` tree. Mapping iteration follows the
//! order fields appear in the source text.

use serde_json::Value;

use crate::error::{Result, SchemaError};

/// Decode a raw JSON body.
///
/// A blank body or a literal `null` is `Ok(None)`, meaning no body was
/// supplied. Anything else that is not JSON is an error.
pub fn document_from_json_slice(body: &[u8]) -> Result<Option<Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let value: Value = serde_json::from_slice(body)?;
    Ok(present(value))
}

/// Decode a YAML document with the same absent-body rules as JSON.
pub fn document_from_yaml_str(text: &str) -> Result<Option<Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_yaml::from_str(text).map_err(|err| SchemaError::InvalidDocument(err.to_string()))?;
    Ok(present(value))
}

fn present(value: Value) -> Option<Value> {
    (!value.is_null()).then_some(value)
}
