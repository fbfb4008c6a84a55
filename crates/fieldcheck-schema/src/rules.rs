//! Per-field rule predicates.
//!
//! Each check looks at one value against one rule and knows nothing about
//! field names or nesting; the validator turns a [`Violation`] into a
//! [`FieldError`](crate::error::FieldError).

use std::borrow::Cow;

use serde_json::Value;

use crate::model::{FieldRule, FieldType};

/// A failed predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation {
    NotAllowed,
    InvalidType,
    NotBoolean,
}

/// Enumeration first, then the declared type.
pub(crate) fn check(rule: &FieldRule, value: &Value) -> Result<(), Violation> {
    check_allowed(rule, value)?;
    match rule.field_type {
        Some(field_type) => check_type(field_type, rule, value),
        None => Ok(()),
    }
}

fn check_allowed(rule: &FieldRule, value: &Value) -> Result<(), Violation> {
    match &rule.allowed {
        Some(allowed) if !allowed.iter().any(|literal| loosely_equal(value, literal)) => {
            Err(Violation::NotAllowed)
        }
        _ => Ok(()),
    }
}

fn check_type(field_type: FieldType, rule: &FieldRule, value: &Value) -> Result<(), Violation> {
    let passes = match field_type {
        FieldType::String => text_of(value).is_some_and(|text| {
            within_bounds(rule, text.chars().count() as f64)
                && rule
                    .pattern
                    .as_ref()
                    .map_or(true, |pattern| pattern.is_match(&text))
        }),
        FieldType::Boolean => {
            return if value.is_boolean() {
                Ok(())
            } else {
                Err(Violation::NotBoolean)
            };
        }
        FieldType::Int | FieldType::Float => {
            numeric(value).is_some_and(|number| within_bounds(rule, number))
        }
        FieldType::Array => value
            .as_array()
            .is_some_and(|items| within_bounds(rule, items.len() as f64)),
        FieldType::Object => value.is_object(),
    };

    if passes {
        Ok(())
    } else {
        Err(Violation::InvalidType)
    }
}

fn within_bounds(rule: &FieldRule, measure: f64) -> bool {
    rule.min.map_or(true, |min| measure >= min) && rule.max.map_or(true, |max| measure <= max)
}

/// Textual form used for string length and pattern checks.
///
/// Numbers measure by their decimal form and null as the empty string.
/// Booleans, sequences, and mappings have none.
fn text_of(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text)),
        Value::Number(number) => Some(Cow::Owned(number.to_string())),
        Value::Null => Some(Cow::Borrowed("")),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Numeric value of a number or numeric string.
pub(crate) fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_numeric(text),
        _ => None,
    }
}

/// Parse decimal notation with optional sign, fraction, and exponent,
/// tolerating surrounding whitespace. `inf`, `nan`, and hex are rejected;
/// magnitudes past the `f64` range saturate to infinity.
pub(crate) fn parse_numeric(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let decimal_only = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !decimal_only || !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    trimmed.parse::<f64>().ok()
}

/// Enumeration membership.
///
/// Values match literals exactly, or numerically when both sides are
/// numeric, so `5`, `5.0`, and `"5"` all match `5`. Null matches nothing;
/// nullable fields are skipped before enumeration is checked.
fn loosely_equal(value: &Value, literal: &Value) -> bool {
    if value.is_null() {
        return false;
    }
    if value == literal {
        return true;
    }
    match (numeric(value), numeric(literal)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

/// Render an enumeration literal for messages.
pub(crate) fn literal_text(literal: &Value) -> String {
    match literal {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
