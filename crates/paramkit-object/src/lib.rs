//! Deep-object helpers and locale lookup over [`serde_json::Value`].
//!
//! - [`object`]: path-based `get`/`update`, recursive `merge` and `prune`
//! - [`json`]: lenient JSON parsing
//! - [`i18n`]: locale selection and `{placeholder}` translation

pub mod i18n;
pub mod json;
pub mod object;

pub use i18n::{get_locale, translate};
pub use json::parse_json;
pub use object::{get, get_in, get_or, is_object, merge, prune, update};
