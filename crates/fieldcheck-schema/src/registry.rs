use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::config::RegistryConfig;
use crate::document::document_from_json_slice;
use crate::error::{Result, SchemaError};
use crate::loader::{read_schema_file, SchemaFormat};
use crate::model::Schema;
use crate::validator::{Outcome, Validator};

/// Route-keyed collection of schemas.
///
/// A route is the name a request is dispatched under; its schema lives in
/// `<route>.yml` (or `.yaml`, `.json`) inside a schema directory.
#[derive(Debug, Clone)]
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

    /// Register a schema for a route from YAML text.
    ///
    /// Blank or null text registers an empty schema, which accepts every
    /// document.
    pub fn register(&mut self, route: &str, yaml: &str) -> Result<()> {
        let schema = Schema::parse(yaml, SchemaFormat::Yaml, route)?.unwrap_or_default();
        self.register_schema(route, schema)
    }

    /// Register an already decoded schema for a route.
    pub fn register_schema(&mut self, route: &str, schema: Schema) -> Result<()> {
        validate_route(route)?;
        self.schemas.insert(route.to_string(), schema);
        Ok(())
    }

    /// Load schemas from a directory.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, RegistryConfig::default())
    }

    /// Load schemas from a directory with explicit config.
    pub fn from_directory_with_config(path: &Path, config: RegistryConfig) -> Result<Self> {
        let mut registry = Self::with_config(config);
        let mut loaded_schema_count = 0usize;

        let entries = std::fs::read_dir(path)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;

        for entry in entries {
            let entry = entry.map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            let entry_path = entry.path();
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();

            let Some((route, format)) = resolve_route_from_file_name(&file_name) else {
                continue;
            };
            let path_metadata = std::fs::symlink_metadata(&entry_path)
                .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
            let file_type = path_metadata.file_type();

            if file_type.is_symlink() {
                return Err(SchemaError::LoadFailed(format!(
                    "refusing to load schema symlink: {file_name}"
                )));
            }
            if !file_type.is_file() {
                continue;
            }
            if validate_route(route).is_err() {
                return Err(SchemaError::LoadFailed(format!(
                    "unrecognized schema filename: {file_name}"
                )));
            }
            if registry.has_schema(route) {
                return Err(SchemaError::LoadFailed(format!(
                    "duplicate schema for route {route}: {file_name}"
                )));
            }

            loaded_schema_count = loaded_schema_count.saturating_add(1);
            if loaded_schema_count > registry.config.max_schemas_from_directory {
                return Err(SchemaError::LoadFailed(format!(
                    "schema count exceeds configured max ({}): {}",
                    registry.config.max_schemas_from_directory, loaded_schema_count
                )));
            }

            let file = std::fs::File::open(&entry_path).map_err(|err| {
                SchemaError::LoadFailed(format!(
                    "failed opening schema {}: {err}",
                    entry_path.display()
                ))
            })?;

            #[cfg(unix)]
            {
                let opened_metadata = file
                    .metadata()
                    .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
                if !same_file_identity(&path_metadata, &opened_metadata) {
                    return Err(SchemaError::LoadFailed(format!(
                        "schema file changed during load: {file_name}"
                    )));
                }
            }

            let content =
                read_schema_file(file, &entry_path, registry.config.max_schema_file_size)?;
            let schema = Schema::parse(&content, format, &file_name)?.unwrap_or_default();
            tracing::debug!(route, nodes = schema.len(), "loaded schema");
            registry.register_schema(route, schema)?;
        }

        Ok(registry)
    }

    /// Load from embedded YAML schema strings.
    pub fn from_embedded(schemas: &[(&str, &str)]) -> Result<Self> {
        let mut registry = Self::new();
        for (route, yaml) in schemas {
            registry.register(route, yaml)?;
        }
        Ok(registry)
    }

    /// Validate a raw JSON request body against the route's schema.
    pub fn validate(&self, route: &str, body: &[u8]) -> Result<Outcome> {
        let document = document_from_json_slice(body)?;
        self.validate_value(route, document.as_ref())
    }

    /// Validate a decoded document against the route's schema.
    pub fn validate_value(&self, route: &str, document: Option<&Value>) -> Result<Outcome> {
        let Some(schema) = self.schemas.get(route) else {
            if self.config.fail_on_missing_schema {
                return Err(SchemaError::NoSchema(route.to_string()));
            }
            tracing::debug!(route, "no schema registered; skipping validation");
            return Ok(Outcome::NoSchema);
        };

        let outcome = Validator::with_config(schema, self.config.validator).validate(document)?;
        if outcome == Outcome::NoDocument && self.config.fail_on_missing_document {
            return Err(SchemaError::MissingDocument(route.to_string()));
        }
        Ok(outcome)
    }

    /// Check if a route has a registered schema.
    pub fn has_schema(&self, route: &str) -> bool {
        self.schemas.contains_key(route)
    }

    pub fn get(&self, route: &str) -> Option<&Schema> {
        self.schemas.get(route)
    }

    /// Get routes that have registered schemas.
    pub fn routes(&self) -> Vec<&str> {
        let mut routes: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        routes.sort_unstable();
        routes
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

/// Split `create_user.yml` into its route and format.
///
/// Hidden files and unrelated extensions are not schema files.
fn resolve_route_from_file_name(file_name: &str) -> Option<(&str, SchemaFormat)> {
    if file_name.starts_with('.') {
        return None;
    }
    let format = SchemaFormat::from_path(Path::new(file_name))?;
    let (stem, _) = file_name.rsplit_once('.')?;
    Some((stem, format))
}

fn validate_route(route: &str) -> Result<()> {
    let escapes = route.contains(['/', '\\']) || route.split('.').any(|part| part.is_empty());
    if route.is_empty() || escapes || route.chars().any(char::is_control) {
        return Err(SchemaError::InvalidRoute(route.to_string()));
    }
    Ok(())
}

#[cfg(unix)]
fn same_file_identity(
    path_metadata: &std::fs::Metadata,
    opened_metadata: &std::fs::Metadata,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}
