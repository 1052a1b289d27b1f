//! Application error taxonomy.
//!
//! Every [`AppError`] carries a five-digit [`ErrorCode`] whose first three
//! digits are the default HTTP status (`40001` → `400`). [`parse_error`]
//! and [`error_to_response`] turn any error into the JSON body clients see.
//! [`Role::require`] guards endpoints with `INSUFFICIENT_PERMISSIONS`.

pub mod code;
pub mod error;
pub mod response;
pub mod role;

pub use code::ErrorCode;
pub use error::{AppError, Result};
pub use response::{error_to_response, parse_error, ErrorResponse, ParsedError};
pub use role::{Role, UnknownRole};
