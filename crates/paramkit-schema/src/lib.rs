//! Declarative request-parameter validation.
//!
//! Describe each parameter once as a [`FieldSchema`], collect them into a
//! [`Schema`], and check incoming [`ValueBag`]s with [`validate`] (required
//! fields enforced) or [`allowed`] (undeclared keys rejected). Evaluation is
//! fail-fast: the first violated rule is reported as a [`ValidationError`]
//! whose message is ready to hand back to a client.
//!
//! Schemas can also be written as JSON documents and grouped per action in a
//! [`SchemaRegistry`].

pub mod config;
pub mod definition;
pub mod error;
pub mod field;
pub mod registry;
pub mod validator;
pub mod value;

pub use config::RegistryConfig;
pub use definition::FieldDefinition;
pub use error::{Result, SchemaError, ValidationError, ValidationErrorKind};
pub use field::{FieldKind, FieldSchema, FieldValidator, Schema};
pub use registry::SchemaRegistry;
pub use validator::{allowed, validate, ValidationResult};
pub use value::{ParamValue, Slot, ValueBag};
