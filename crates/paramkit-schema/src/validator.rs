//! Fail-fast evaluation of a [`ValueBag`] against a [`Schema`].
//!
//! Two modes share one rule pipeline:
//!
//! - [`validate`] walks the schema in field order and enforces required-ness.
//! - [`allowed`] walks the payload in key order and rejects undeclared keys.
//!
//! Per field the rules run as: presence, nullability escape, type or enum
//! membership, required content (validate only), email format, bounds,
//! pattern, custom validator. The first violation wins.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::debug;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::field::{FieldKind, FieldSchema, Schema};
use crate::value::{json_kind, ParamValue, Slot, ValueBag};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Required,
    ClosedSet,
}

/// The `{ error: string | null }` shape handed to response formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self { error: None }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl From<Result<(), ValidationError>> for ValidationResult {
    fn from(result: Result<(), ValidationError>) -> Self {
        Self {
            error: result.err().map(|err| err.message),
        }
    }
}

/// Check that `values` satisfies `schema`, including required fields.
///
/// Fields are visited in schema order. A required field that is absent or
/// explicitly undefined fails with "is required"; an optional field that is
/// explicitly undefined fails with "cannot be undefined"; an optional field
/// that is absent is skipped.
pub fn validate(values: &ValueBag, schema: &Schema) -> Result<(), ValidationError> {
    for (name, field) in schema.iter() {
        let value = match values.slot(name) {
            Slot::Absent | Slot::Undefined if field.required => {
                return Err(rejected(
                    name,
                    field,
                    ValidationErrorKind::MissingRequired,
                    format!("Parameter ({name}) is required"),
                ));
            }
            Slot::Absent => continue,
            Slot::Undefined => {
                return Err(rejected(
                    name,
                    field,
                    ValidationErrorKind::UndefinedValue,
                    format!("Parameter ({name}) cannot be undefined"),
                ));
            }
            Slot::Null => &NULL,
            Slot::Present(value) => value,
        };

        check_value(name, field, value, Mode::Required)?;
    }

    Ok(())
}

/// Check that every key in `values` is declared in `schema` and well-formed.
///
/// Keys are visited in payload order. Required-ness is not consulted: a
/// payload carrying a subset of the schema passes.
pub fn allowed(values: &ValueBag, schema: &Schema) -> Result<(), ValidationError> {
    for (name, param) in values.iter() {
        let Some(field) = schema.get(name) else {
            return Err(logged(ValidationError::new(
                name,
                ValidationErrorKind::UnknownParameter,
                format!("Parameter ({name}) is not allowed"),
            )));
        };

        let value = match param {
            ParamValue::Undefined => {
                return Err(rejected(
                    name,
                    field,
                    ValidationErrorKind::UndefinedValue,
                    format!("Parameter ({name}) cannot be undefined"),
                ));
            }
            ParamValue::Value(value) => value,
        };

        check_value(name, field, value, Mode::ClosedSet)?;
    }

    Ok(())
}

fn check_value(
    name: &str,
    field: &FieldSchema,
    value: &Value,
    mode: Mode,
) -> Result<(), ValidationError> {
    if field.nullable && value.is_null() {
        return Ok(());
    }

    check_shape(name, field, value)?;

    if mode == Mode::Required && field.required {
        check_required_content(name, field, value)?;
    }

    if field.kind == FieldKind::Email {
        check_email(name, field, value)?;
    }

    check_bounds(name, field, value)?;

    if let (FieldKind::String, Some(pattern), Some(text)) =
        (field.kind, field.pattern.as_ref(), value.as_str())
    {
        if !pattern.is_match(text) {
            return Err(rejected(
                name,
                field,
                ValidationErrorKind::FormatViolation,
                format!("Parameter ({name}) does not match pattern"),
            ));
        }
    }

    if let Some(validator) = &field.validator {
        if let Some(message) = validator.check(value, name).filter(|m| !m.is_empty()) {
            return Err(logged(ValidationError::new(
                name,
                ValidationErrorKind::CustomValidationFailure,
                message,
            )));
        }
    }

    Ok(())
}

fn check_shape(name: &str, field: &FieldSchema, value: &Value) -> Result<(), ValidationError> {
    let expected = match field.kind {
        FieldKind::Enum => {
            let member = value
                .as_str()
                .is_some_and(|text| field.enum_values.iter().any(|v| v == text));
            if member {
                return Ok(());
            }
            return Err(rejected(
                name,
                field,
                ValidationErrorKind::EnumViolation,
                format!(
                    "Parameter ({name}) need one of ({}), but got {}",
                    field.enum_values.join(", "),
                    display_value(value)
                ),
            ));
        }
        FieldKind::Email => "string",
        kind => kind.as_str(),
    };

    if json_kind(value) == expected {
        Ok(())
    } else {
        Err(rejected(
            name,
            field,
            ValidationErrorKind::TypeMismatch,
            format!("Parameter ({name}) type need {}", field.kind),
        ))
    }
}

fn check_required_content(
    name: &str,
    field: &FieldSchema,
    value: &Value,
) -> Result<(), ValidationError> {
    let message = match (field.kind, value) {
        (FieldKind::String, Value::String(text)) if text.trim().is_empty() => {
            format!("Parameter ({name}) can't be empty string")
        }
        (FieldKind::Email, Value::String(text)) if text.trim().is_empty() => {
            format!("Parameter ({name}) can't be empty email")
        }
        (FieldKind::Number, Value::Number(number)) if number.as_f64() == Some(0.0) => {
            format!("Parameter ({name}) can't be 0")
        }
        // Booleans are fully covered by the type check.
        _ => return Ok(()),
    };

    Err(rejected(
        name,
        field,
        ValidationErrorKind::EmptyRequiredValue,
        message,
    ))
}

fn check_email(name: &str, field: &FieldSchema, value: &Value) -> Result<(), ValidationError> {
    let Some(text) = value.as_str().map(str::trim) else {
        return Ok(());
    };
    if text.is_empty() || EMAIL_PATTERN.is_match(text) {
        return Ok(());
    }
    Err(rejected(
        name,
        field,
        ValidationErrorKind::FormatViolation,
        format!("Parameter ({name}) is not a valid email"),
    ))
}

fn check_bounds(name: &str, field: &FieldSchema, value: &Value) -> Result<(), ValidationError> {
    match (field.kind, value) {
        (kind, Value::String(text)) if kind.is_textual() => {
            // Lengths are UTF-16 code units, so a non-BMP character counts twice.
            let len = text.encode_utf16().count();
            if let Some(min) = field.min.filter(|min| (len as f64) < *min) {
                return Err(out_of_bounds(
                    name,
                    field,
                    format!("Parameter ({name}) length must be >= {}, got {len}", display_f64(min)),
                ));
            }
            if let Some(max) = field.max.filter(|max| (len as f64) > *max) {
                return Err(out_of_bounds(
                    name,
                    field,
                    format!("Parameter ({name}) length must be <= {}, got {len}", display_f64(max)),
                ));
            }
        }
        (FieldKind::Number, Value::Number(number)) => {
            let Some(val) = number.as_f64() else {
                return Ok(());
            };
            if let Some(min) = field.min.filter(|min| val < *min) {
                return Err(out_of_bounds(
                    name,
                    field,
                    format!(
                        "Parameter ({name}) must be >= {}, got {}",
                        display_f64(min),
                        display_number(number)
                    ),
                ));
            }
            if let Some(max) = field.max.filter(|max| val > *max) {
                return Err(out_of_bounds(
                    name,
                    field,
                    format!(
                        "Parameter ({name}) must be <= {}, got {}",
                        display_f64(max),
                        display_number(number)
                    ),
                ));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Render a JSON number as written: integers keep every digit.
fn display_number(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    number.as_f64().map_or_else(|| number.to_string(), display_f64)
}

/// Shortest round-trip form, switching to `1e+21` / `1e-7` style exponents
/// outside `[1e-7, 1e21)`.
fn display_f64(val: f64) -> String {
    if val == 0.0 {
        return "0".to_string();
    }
    let magnitude = val.abs();
    if (1e-7..1e21).contains(&magnitude) {
        return format!("{val}");
    }
    let text = format!("{val:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

fn out_of_bounds(name: &str, field: &FieldSchema, message: String) -> ValidationError {
    rejected(name, field, ValidationErrorKind::BoundsViolation, message)
}

/// A built-in rule failure, honouring the field's message override.
fn rejected(
    name: &str,
    field: &FieldSchema,
    kind: ValidationErrorKind,
    generated: String,
) -> ValidationError {
    let message = field.message.clone().unwrap_or(generated);
    logged(ValidationError::new(name, kind, message))
}

fn logged(err: ValidationError) -> ValidationError {
    debug!(field = %err.field, rule = %err.kind, "parameter rejected");
    err
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
