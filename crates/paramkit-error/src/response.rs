use std::error::Error as StdError;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::code::ErrorCode;
use crate::error::AppError;

const UNKNOWN_ERROR: &str = "Unknown error";

/// Normalized view of an arbitrary error.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedError {
    pub error_code: u32,
    pub status: u16,
    pub message: String,
    pub info: Option<Map<String, Value>>,
}

/// JSON body returned to clients on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Code name, e.g. `"INVALID_PARAMS"`.
    pub error: String,
    pub message: String,
    pub error_code: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Map<String, Value>>,
}

/// Extract code, status, message, and info from an error.
///
/// The error and its `source()` chain are searched for an [`AppError`];
/// anything else maps to `INTERNAL_SERVER_ERROR` / 500 with the error's
/// display text as message.
pub fn parse_error(error: &(dyn StdError + 'static)) -> ParsedError {
    match find_app_error(error) {
        Some(app) => ParsedError {
            error_code: app.code.code(),
            status: app.status,
            message: app.message.clone(),
            info: app.info.clone(),
        },
        None => {
            let message = error.to_string();
            ParsedError {
                error_code: ErrorCode::InternalServerError.code(),
                status: ErrorCode::InternalServerError.status(),
                message: if message.is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    message
                },
                info: None,
            }
        }
    }
}

fn find_app_error<'e>(error: &'e (dyn StdError + 'static)) -> Option<&'e AppError> {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(app) = err.downcast_ref::<AppError>() {
            return Some(app);
        }
        current = err.source();
    }
    None
}

/// Turn an error into an HTTP status and response body.
pub fn error_to_response(error: &(dyn StdError + 'static)) -> (u16, ErrorResponse) {
    let parsed = parse_error(error);
    if parsed.status >= 500 {
        warn!(error_code = parsed.error_code, status = parsed.status, message = %parsed.message, "request failed with server error");
    }

    let name = ErrorCode::from_code(parsed.error_code)
        .unwrap_or(ErrorCode::InternalServerError)
        .name();

    (
        parsed.status,
        ErrorResponse {
            error: name.to_string(),
            message: parsed.message,
            error_code: parsed.error_code,
            info: parsed.info,
        },
    )
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: error.code.name().to_string(),
            message: error.message.clone(),
            error_code: error.code.code(),
            info: error.info.clone(),
        }
    }
}
