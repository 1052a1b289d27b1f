use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

/// Expected primitive shape of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Enum,
    /// A string that must look like an email address.
    Email,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum => "enum",
            FieldKind::Email => "email",
        }
    }

    /// Parse the lowercase name used in schema documents.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(FieldKind::String),
            "number" => Some(FieldKind::Number),
            "boolean" => Some(FieldKind::Boolean),
            "enum" => Some(FieldKind::Enum),
            "email" => Some(FieldKind::Email),
            _ => None,
        }
    }

    pub(crate) fn is_textual(self) -> bool {
        matches!(self, FieldKind::String | FieldKind::Email)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied check run after all built-in rules pass.
///
/// Returning `Some(message)` rejects the value with that exact message;
/// `None` (or an empty string) accepts it. Implementations must not panic
/// for ordinary input: a panic propagates straight to the caller.
pub trait FieldValidator: Send + Sync {
    fn check(&self, value: &Value, field: &str) -> Option<String>;
}

impl<F> FieldValidator for F
where
    F: Fn(&Value, &str) -> Option<String> + Send + Sync,
{
    fn check(&self, value: &Value, field: &str) -> Option<String> {
        self(value, field)
    }
}

/// Validation contract for one parameter.
#[derive(Clone)]
pub struct FieldSchema {
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
    /// Accepted values when `kind` is [`FieldKind::Enum`].
    pub enum_values: Vec<String>,
    /// Length bound for strings/emails, value bound for numbers.
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Only consulted for [`FieldKind::String`].
    pub pattern: Option<Regex>,
    /// Replaces every built-in failure message for this field.
    pub message: Option<String>,
    pub validator: Option<Arc<dyn FieldValidator>>,
}

impl FieldSchema {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            nullable: false,
            enum_values: Vec::new(),
            min: None,
            max: None,
            pattern: None,
            message: None,
            validator: None,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldKind::String)
    }

    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn email() -> Self {
        Self::new(FieldKind::Email)
    }

    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enum_values: values.into_iter().map(Into::into).collect(),
            ..Self::new(FieldKind::Enum)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Regex) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn validator(mut self, validator: impl FieldValidator + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl fmt::Debug for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSchema")
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("nullable", &self.nullable)
            .field("enum_values", &self.enum_values)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("pattern", &self.pattern.as_ref().map(Regex::as_str))
            .field("message", &self.message)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Ordered set of field contracts. Field order is validation order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldSchema)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field. A replaced field keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, field: FieldSchema) -> &mut Self {
        let name = name.into();
        match self.fields.iter().position(|(n, _)| *n == name) {
            Some(index) => self.fields[index].1 = field,
            None => self.fields.push((name, field)),
        }
        self
    }

    /// Builder-style [`Schema::insert`].
    pub fn field(mut self, name: impl Into<String>, field: FieldSchema) -> Self {
        self.insert(name, field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| field)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, FieldSchema)> for Schema {
    fn from_iter<I: IntoIterator<Item = (S, FieldSchema)>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for (name, field) in iter {
            schema.insert(name, field);
        }
        schema
    }
}
