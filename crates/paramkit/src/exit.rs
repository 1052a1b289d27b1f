use std::io;
use std::path::Path;

use paramkit::schema::SchemaError;

// Exit codes follow sysexits-style ranges: 60 for rejected input data,
// 64 for command-line misuse.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

/// Failure that ends the process with `code`.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

pub fn io_error(path: &Path, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{}: {err}", path.display()))
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    let code = match err {
        SchemaError::InvalidJson(_)
        | SchemaError::NotAnObject(_)
        | SchemaError::InvalidDefinition { .. }
        | SchemaError::ValidationFailed { .. } => DATA_INVALID,
        SchemaError::NoSchema(_) => USAGE,
        SchemaError::LoadFailed(_) => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_by_kind() {
        let path = Path::new("values.json");
        assert_eq!(io_error(path, io::Error::from(io::ErrorKind::NotFound)).code, USAGE);
        assert_eq!(
            io_error(path, io::Error::from(io::ErrorKind::PermissionDenied)).code,
            PERMISSION_DENIED
        );
        assert_eq!(io_error(path, io::Error::other("boom")).code, INTERNAL);
    }

    #[test]
    fn schema_errors_map_by_variant() {
        assert_eq!(schema_error("values", SchemaError::NotAnObject("array")).code, DATA_INVALID);
        assert_eq!(schema_error("registry", SchemaError::NoSchema("x".into())).code, USAGE);
        let err = schema_error("registry", SchemaError::LoadFailed("too big".into()));
        assert_eq!(err.code, FAILURE);
        assert_eq!(err.to_string(), "registry: failed to load schema: too big");
    }
}
