/// Controls how a [`SchemaRegistry`](crate::SchemaRegistry) applies schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, payload keys not declared in the schema are rejected
    /// (closed-set check) before required fields are enforced.
    pub strict_mode: bool,
    /// When true, actions without a schema return `SchemaError::NoSchema`.
    pub fail_on_missing_schema: bool,
    /// Maximum number of schemas loaded from a directory.
    ///
    /// One schema per action; 256 covers a large API surface, and a directory
    /// holding more is almost certainly the wrong directory.
    pub max_schemas_from_directory: usize,
    /// Maximum bytes allowed per schema file loaded from a directory.
    ///
    /// A field definition is well under 1 KiB, so 256 KiB leaves room for
    /// hundreds of parameters while bounding what a stray file can allocate.
    pub max_schema_file_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            fail_on_missing_schema: false,
            max_schemas_from_directory: 256,
            max_schema_file_size: 256 * 1024,
        }
    }
}
