use std::fmt;

/// Which rule a parameter violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Required field absent (or explicitly undefined).
    MissingRequired,
    /// Field is present but explicitly undefined.
    UndefinedValue,
    /// Runtime type does not match the declared kind.
    TypeMismatch,
    /// Value is not one of the declared enum values.
    EnumViolation,
    /// Required string/email is blank, or required number is zero.
    EmptyRequiredValue,
    /// Email format or string pattern mismatch.
    FormatViolation,
    /// Below `min` or above `max`.
    BoundsViolation,
    /// A caller-supplied validator rejected the value.
    CustomValidationFailure,
    /// Key not declared in the schema (closed-set mode only).
    UnknownParameter,
}

impl ValidationErrorKind {
    /// Stable machine-readable name.
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationErrorKind::MissingRequired => "missing_required",
            ValidationErrorKind::UndefinedValue => "undefined_value",
            ValidationErrorKind::TypeMismatch => "type_mismatch",
            ValidationErrorKind::EnumViolation => "enum_violation",
            ValidationErrorKind::EmptyRequiredValue => "empty_required_value",
            ValidationErrorKind::FormatViolation => "format_violation",
            ValidationErrorKind::BoundsViolation => "bounds_violation",
            ValidationErrorKind::CustomValidationFailure => "custom_validation_failure",
            ValidationErrorKind::UnknownParameter => "unknown_parameter",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first rule violation found in a value bag.
///
/// `Display` yields exactly the caller-facing message, so the error can be
/// folded into a response body as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Offending parameter name.
    pub field: String,
    /// Violated rule.
    pub kind: ValidationErrorKind,
    /// Generated message, or the field's literal override.
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Errors raised while building, loading, or applying schemas.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A schema file could not be loaded.
    #[error("failed to load schema: {0}")]
    LoadFailed(String),

    /// A field definition is malformed.
    #[error("invalid definition for field {field}: {reason}")]
    InvalidDefinition { field: String, reason: String },

    /// A value bag or schema document is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A value bag or schema document is valid JSON but not an object.
    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The parameters failed validation against the schema for `action`.
    #[error("validation failed for {action}: {source}")]
    ValidationFailed {
        action: String,
        #[source]
        source: ValidationError,
    },

    /// No schema registered under the given name.
    #[error("no schema registered for {0}")]
    NoSchema(String),
}

impl SchemaError {
    pub(crate) fn invalid_definition(field: &str, reason: impl Into<String>) -> Self {
        SchemaError::InvalidDefinition {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// The underlying parameter violation, if this is a validation failure.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            SchemaError::ValidationFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
