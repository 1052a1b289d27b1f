use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::config::RegistryConfig;
use crate::error::{Result, SchemaError};
use crate::field::Schema;
use crate::validator::{allowed, validate};
use crate::value::ValueBag;

const SCHEMA_SUFFIX: &str = ".schema.json";

/// Action-keyed registry of parameter schemas.
///
/// An action is whatever name the request handler dispatches on (a mutation
/// or query name). Each action has at most one schema.
#[derive(Debug)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
    config: RegistryConfig,
}

impl SchemaRegistry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            schemas: HashMap::new(),
            config,
        }
    }

    /// Register a schema for an action from a JSON document.
    pub fn register(&mut self, action: &str, schema_json: &str) -> Result<()> {
        let schema = Schema::from_json_str(schema_json)?;
        self.register_schema(action, schema);
        Ok(())
    }

    /// Register an already-built schema, replacing any previous one.
    pub fn register_schema(&mut self, action: &str, schema: Schema) {
        debug!(action, fields = schema.len(), "registered schema");
        self.schemas.insert(action.to_string(), schema);
    }

    /// Load schemas from a directory.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, RegistryConfig::default())
    }

    /// Load schemas from a directory with explicit config.
    ///
    /// Every regular file named `<action>.schema.json` becomes the schema for
    /// `<action>`; other files are ignored. Symlinked schema files are refused.
    pub fn from_directory_with_config(path: &Path, config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);
        let mut loaded_schema_count = 0usize;

        let entries = std::fs::read_dir(path)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;

        for entry in entries {
            let entry = entry.map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            let is_schema_file = file_name.ends_with(SCHEMA_SUFFIX);
            let entry_path = entry.path();
            let path_metadata = std::fs::symlink_metadata(&entry_path)
                .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            let file_type = path_metadata.file_type();

            if file_type.is_symlink() {
                if is_schema_file {
                    return Err(SchemaError::LoadFailed(format!(
                        "refusing to load schema symlink: {file_name}"
                    )));
                }
                continue;
            }
            if !file_type.is_file() || !is_schema_file {
                continue;
            }

            let action = action_from_file_name(&file_name).ok_or_else(|| {
                SchemaError::LoadFailed(format!("unrecognized schema filename: {file_name}"))
            })?;

            loaded_schema_count = loaded_schema_count.saturating_add(1);
            if loaded_schema_count > registry.config.max_schemas_from_directory {
                return Err(SchemaError::LoadFailed(format!(
                    "schema count exceeds configured max ({}): {}",
                    registry.config.max_schemas_from_directory, loaded_schema_count
                )));
            }

            let content = read_limited(
                &entry_path,
                &path_metadata,
                &file_name,
                registry.config.max_schema_file_size,
            )?;
            let schema = Schema::from_json_str(&content).map_err(|err| match err {
                SchemaError::InvalidJson(source) => {
                    SchemaError::LoadFailed(format!("{file_name}: {source}"))
                }
                other => other,
            })?;
            registry.register_schema(action, schema);
        }

        debug!(path = %path.display(), count = loaded_schema_count, "loaded schema directory");
        Ok(registry)
    }

    /// Load from embedded schema documents.
    pub fn from_embedded(schemas: &[(&str, &str)]) -> Result<Self> {
        let mut registry = Self::new();
        for (action, schema) in schemas {
            registry.register(action, schema)?;
        }
        Ok(registry)
    }

    /// Validate a value bag against the schema registered for `action`.
    ///
    /// In strict mode the closed-set check runs first, so an unexpected key
    /// is reported before any missing required field.
    pub fn validate(&self, action: &str, values: &ValueBag) -> Result<()> {
        let Some(schema) = self.schemas.get(action) else {
            return if self.config.fail_on_missing_schema {
                Err(SchemaError::NoSchema(action.to_string()))
            } else {
                Ok(())
            };
        };

        let outcome = if self.config.strict_mode {
            allowed(values, schema).and_then(|()| validate(values, schema))
        } else {
            validate(values, schema)
        };

        outcome.map_err(|source| SchemaError::ValidationFailed {
            action: action.to_string(),
            source,
        })
    }

    /// Validate a JSON object payload against the schema for `action`.
    pub fn validate_json(&self, action: &str, payload: &[u8]) -> Result<()> {
        let values = ValueBag::from_json_slice(payload)?;
        self.validate(action, &values)
    }

    /// Look up the schema registered for `action`.
    pub fn get(&self, action: &str) -> Option<&Schema> {
        self.schemas.get(action)
    }

    /// Check if an action has a registered schema.
    pub fn has_schema(&self, action: &str) -> bool {
        self.schemas.contains_key(action)
    }

    /// Registered action names, sorted.
    pub fn actions(&self) -> Vec<&str> {
        let mut actions: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        actions.sort_unstable();
        actions
    }

    /// Get registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn action_from_file_name(file_name: &str) -> Option<&str> {
    let action = file_name.strip_suffix(SCHEMA_SUFFIX)?;
    if action.is_empty() || action.chars().any(char::is_whitespace) {
        return None;
    }
    Some(action)
}

/// Read a schema file opened by path, refusing it if the opened file is not
/// the one `path_metadata` was taken from.
fn read_limited(
    path: &Path,
    path_metadata: &std::fs::Metadata,
    file_name: &str,
    max_bytes: usize,
) -> Result<String> {
    let file = std::fs::File::open(path).map_err(|err| {
        SchemaError::LoadFailed(format!("failed opening schema {}: {err}", path.display()))
    })?;
    let metadata = file
        .metadata()
        .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;

    #[cfg(unix)]
    {
        if !same_file_identity(path_metadata, &metadata) {
            return Err(SchemaError::LoadFailed(format!(
                "schema file changed during load: {file_name}"
            )));
        }
    }
    #[cfg(not(unix))]
    let _ = path_metadata;

    if metadata.len() > max_bytes as u64 {
        return Err(SchemaError::LoadFailed(format!(
            "schema file too large ({} bytes): {file_name}",
            metadata.len()
        )));
    }

    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| {
            SchemaError::LoadFailed(format!("failed reading schema {}: {err}", path.display()))
        })?;
    if content.len() > max_bytes {
        return Err(SchemaError::LoadFailed(format!(
            "schema file too large while reading: {file_name}"
        )));
    }
    Ok(content)
}

#[cfg(unix)]
fn same_file_identity(path_metadata: &std::fs::Metadata, opened_metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}
