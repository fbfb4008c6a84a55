/// Default maximum nesting of child schemas below `root`.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default maximum bytes read from a single schema file.
pub const DEFAULT_MAX_SCHEMA_FILE_SIZE: usize = 256 * 1024;

/// Controls the recursive validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Maximum number of child-schema levels entered below `root`.
    pub max_depth: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Controls registry loading and validation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// When true, routes without a schema return `SchemaError::NoSchema`.
    pub fail_on_missing_schema: bool,
    /// When true, a blank body returns `SchemaError::MissingDocument`.
    pub fail_on_missing_document: bool,
    /// Maximum number of schemas loaded from a directory.
    pub max_schemas_from_directory: usize,
    /// Maximum bytes allowed per schema file loaded from a directory.
    pub max_schema_file_size: usize,
    /// Settings passed to every validation run.
    pub validator: ValidatorConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            fail_on_missing_schema: false,
            fail_on_missing_document: false,
            max_schemas_from_directory: 256,
            max_schema_file_size: DEFAULT_MAX_SCHEMA_FILE_SIZE,
            validator: ValidatorConfig::default(),
        }
    }
}
