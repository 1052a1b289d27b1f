//! Request-parameter validation, error taxonomy, and handler helpers.
//!
//! # Crate Structure
//!
//! - [`schema`]: field schemas, value bags, `validate`/`allowed`, and the per-action registry
//! - [`error`]: five-digit error codes and client-facing error bodies
//! - [`object`]: deep get/update/merge/prune over JSON values, locale lookup
//! - [`runtime`]: retry, sleep, TTL cache, client address
//!
//! [`check_params`] and [`check_allowed`] connect the first two: a rejected
//! parameter becomes an `INVALID_PARAMS` [`AppError`](error::AppError) whose
//! message is the validation message and whose info names the field and rule.

use serde_json::{Map, Value};

/// Re-export schema types.
pub mod schema {
    pub use paramkit_schema::*;
}

/// Re-export error taxonomy types.
pub mod error {
    pub use paramkit_error::*;
}

/// Re-export object and i18n helpers.
pub mod object {
    pub use paramkit_object::*;
}

/// Re-export runtime helpers.
pub mod runtime {
    pub use paramkit_runtime::*;
}

use paramkit_error::{AppError, ErrorCode};
use paramkit_schema::{Schema, SchemaError, ValidationError, ValueBag};

/// Validate `values` against `schema`, enforcing required fields.
pub fn check_params(values: &ValueBag, schema: &Schema) -> Result<(), AppError> {
    paramkit_schema::validate(values, schema).map_err(|err| invalid_params(&err))
}

/// Reject keys in `values` that `schema` does not declare.
pub fn check_allowed(values: &ValueBag, schema: &Schema) -> Result<(), AppError> {
    paramkit_schema::allowed(values, schema).map_err(|err| invalid_params(&err))
}

/// `INVALID_PARAMS` error carrying the validation message verbatim.
pub fn invalid_params(err: &ValidationError) -> AppError {
    let mut info = Map::new();
    info.insert("field".to_string(), Value::String(err.field.clone()));
    info.insert("rule".to_string(), Value::String(err.kind.as_str().to_string()));
    AppError::invalid_params(err.message.clone()).with_info(info)
}

/// Map a registry or schema loading failure onto the error taxonomy.
///
/// Parameter violations and malformed payloads are the caller's fault
/// (`INVALID_PARAMS`); a missing action is `NOT_SUPPORT`; anything else is a
/// server-side configuration problem.
pub fn schema_error(err: &SchemaError) -> AppError {
    match err {
        SchemaError::ValidationFailed { source, .. } => invalid_params(source),
        SchemaError::InvalidJson(_) | SchemaError::NotAnObject(_) => {
            AppError::invalid_params(err.to_string())
        }
        SchemaError::NoSchema(_) => AppError::new(ErrorCode::NotSupport, err.to_string()),
        SchemaError::LoadFailed(_) | SchemaError::InvalidDefinition { .. } => {
            AppError::internal(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{FieldSchema, SchemaRegistry};

    fn signup() -> Schema {
        Schema::new()
            .field("email", FieldSchema::email().required())
            .field("age", FieldSchema::number().min(18.0))
    }

    #[test]
    fn violations_become_invalid_params() {
        let values = ValueBag::new().with("age", json!(20));
        let err = check_params(&values, &signup()).unwrap_err();

        assert_eq!(err.code, ErrorCode::InvalidParams);
        assert_eq!(err.status, 400);
        assert_eq!(err.message, "Parameter (email) is required");
        let info = err.info.unwrap();
        assert_eq!(info["field"], json!("email"));
        assert_eq!(info["rule"], json!("missing_required"));
    }

    #[test]
    fn closed_set_check_reports_unknown_key() {
        let values = ValueBag::new()
            .with("email", json!("a@b.co"))
            .with("admin", json!(true));

        assert!(check_params(&values, &signup()).is_ok());
        let err = check_allowed(&values, &signup()).unwrap_err();
        assert_eq!(err.info.unwrap()["rule"], json!("unknown_parameter"));
    }

    #[test]
    fn registry_failures_map_onto_codes() {
        let registry = SchemaRegistry::from_embedded(&[(
            "signup",
            r#"{"email": {"type": "email", "required": true}}"#,
        )])
        .unwrap();

        let err = registry.validate_json("signup", br#"{"email": "nope"}"#).unwrap_err();
        let app = schema_error(&err);
        assert_eq!(app.code, ErrorCode::InvalidParams);
        assert_eq!(app.info.unwrap()["field"], json!("email"));

        let err = registry.validate_json("signup", b"[1]").unwrap_err();
        assert_eq!(schema_error(&err).code, ErrorCode::InvalidParams);

        let err = SchemaError::NoSchema("refund".into());
        assert_eq!(schema_error(&err).code, ErrorCode::NotSupport);
    }
}
