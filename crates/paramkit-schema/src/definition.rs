use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::field::{FieldKind, FieldSchema, Schema};
use crate::value::document_kind;

/// Serializable form of a [`FieldSchema`].
///
/// ```json
/// { "type": "string", "required": true, "min": 3, "max": 10, "pattern": "^[a-z]+$" }
/// ```
///
/// Custom validators have no JSON form; attach them to the compiled
/// [`FieldSchema`] afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldDefinition {
    /// Check the definition and compile it into a [`FieldSchema`].
    pub fn compile(&self, name: &str) -> Result<FieldSchema> {
        let kind = FieldKind::parse(&self.kind).ok_or_else(|| {
            SchemaError::invalid_definition(name, format!("unknown type {:?}", self.kind))
        })?;

        let enum_values = match (kind, &self.enum_values) {
            (FieldKind::Enum, Some(values)) if !values.is_empty() => values.clone(),
            (FieldKind::Enum, _) => {
                return Err(SchemaError::invalid_definition(
                    name,
                    "enum type requires a non-empty \"enum\" list",
                ))
            }
            (_, Some(_)) => {
                return Err(SchemaError::invalid_definition(
                    name,
                    format!("\"enum\" is not valid for type {kind}"),
                ))
            }
            (_, None) => Vec::new(),
        };

        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(SchemaError::invalid_definition(
                    name,
                    format!("min ({min}) is greater than max ({max})"),
                ));
            }
        }

        let pattern = match &self.pattern {
            Some(_) if kind != FieldKind::String => {
                return Err(SchemaError::invalid_definition(
                    name,
                    format!("\"pattern\" is not valid for type {kind}"),
                ))
            }
            Some(source) => Some(Regex::new(source).map_err(|err| {
                SchemaError::invalid_definition(name, format!("invalid pattern: {err}"))
            })?),
            None => None,
        };

        Ok(FieldSchema {
            kind,
            required: self.required,
            nullable: self.nullable,
            enum_values,
            min: self.min,
            max: self.max,
            pattern,
            message: self.message.clone(),
            validator: None,
        })
    }
}

impl From<&FieldSchema> for FieldDefinition {
    fn from(field: &FieldSchema) -> Self {
        Self {
            kind: field.kind.as_str().to_string(),
            required: field.required,
            nullable: field.nullable,
            enum_values: (field.kind == FieldKind::Enum).then(|| field.enum_values.clone()),
            min: field.min,
            max: field.max,
            pattern: field.pattern.as_ref().map(|p| p.as_str().to_string()),
            message: field.message.clone(),
        }
    }
}

impl Schema {
    /// Compile a schema document: a JSON object of field definitions.
    pub fn from_json_value(document: &Value) -> Result<Self> {
        let Value::Object(map) = document else {
            return Err(SchemaError::NotAnObject(document_kind(document)));
        };

        let mut schema = Schema::new();
        for (name, raw) in map {
            let definition = FieldDefinition::deserialize(raw).map_err(|err| {
                SchemaError::invalid_definition(name, err.to_string())
            })?;
            schema.insert(name.clone(), definition.compile(name)?);
        }
        Ok(schema)
    }

    /// Parse and compile a schema document from JSON text.
    pub fn from_json_str(document: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(document)?;
        Self::from_json_value(&value)
    }

    /// Render the schema back to its document form, dropping custom validators.
    pub fn to_json_value(&self) -> Value {
        let map = self
            .iter()
            .map(|(name, field)| {
                let definition = FieldDefinition::from(field);
                let value = serde_json::to_value(definition).unwrap_or(Value::Null);
                (name.to_string(), value)
            })
            .collect();
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SIGNUP: &str = r#"{
        "username": { "type": "string", "required": true, "min": 3, "max": 10 },
        "age": { "type": "number", "required": true, "min": 18, "max": 60 },
        "email": { "type": "email", "required": true },
        "role": { "type": "enum", "enum": ["admin", "user"], "message": "pick a role" },
        "url": { "type": "string", "nullable": true, "pattern": "^https?://" }
    }"#;

    #[test]
    fn compiles_document_in_order() {
        let schema = Schema::from_json_str(SIGNUP).unwrap();
        assert_eq!(
            schema.names().collect::<Vec<_>>(),
            vec!["username", "age", "email", "role", "url"]
        );

        let role = schema.get("role").unwrap();
        assert_eq!(role.kind, FieldKind::Enum);
        assert_eq!(role.enum_values, vec!["admin", "user"]);
        assert_eq!(role.message.as_deref(), Some("pick a role"));

        let url = schema.get("url").unwrap();
        assert!(url.nullable);
        assert!(url.pattern.as_ref().unwrap().is_match("https://x"));
    }

    #[test]
    fn rejects_malformed_definitions() {
        let cases = [
            json!({"f": {"type": "integer"}}),
            json!({"f": {"type": "enum"}}),
            json!({"f": {"type": "enum", "enum": []}}),
            json!({"f": {"type": "string", "enum": ["a"]}}),
            json!({"f": {"type": "number", "pattern": "^a"}}),
            json!({"f": {"type": "string", "pattern": "("}}),
            json!({"f": {"type": "string", "min": 5, "max": 1}}),
            json!({"f": {"type": "string", "requred": true}}),
            json!({"f": "string"}),
        ];

        for case in cases {
            assert!(
                matches!(
                    Schema::from_json_value(&case),
                    Err(SchemaError::InvalidDefinition { ref field, .. }) if field == "f"
                ),
                "expected definition error for {case}"
            );
        }
    }

    #[test]
    fn rejects_non_object_document() {
        assert!(matches!(
            Schema::from_json_str("[]"),
            Err(SchemaError::NotAnObject(_))
        ));
        assert!(matches!(
            Schema::from_json_str("{"),
            Err(SchemaError::InvalidJson(_))
        ));
    }

    #[test]
    fn renders_back_to_document() {
        let schema = Schema::from_json_str(SIGNUP).unwrap();
        let rendered = schema.to_json_value();
        assert_eq!(
            rendered["role"],
            json!({"type": "enum", "required": false, "nullable": false,
                   "enum": ["admin", "user"], "message": "pick a role"})
        );
        assert_eq!(rendered["username"]["min"], json!(3.0));
    }
}
