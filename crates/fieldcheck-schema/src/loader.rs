use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::config::DEFAULT_MAX_SCHEMA_FILE_SIZE;
use crate::error::{Result, SchemaError};
use crate::model::Schema;

/// Text format of a schema definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Yaml,
    Json,
}

impl SchemaFormat {
    /// Pick the format from a file extension (`.yml`, `.yaml`, `.json`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yml" | "yaml" => Some(SchemaFormat::Yaml),
            "json" => Some(SchemaFormat::Json),
            _ => None,
        }
    }
}

impl Schema {
    /// Decode schema text.
    ///
    /// Returns `Ok(None)` when the text is blank or decodes to null, which
    /// callers treat as "no constraints". Malformed text is an error, kept
    /// distinct from the absent case.
    pub fn parse(text: &str, format: SchemaFormat, source_name: &str) -> Result<Option<Schema>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        match format {
            SchemaFormat::Yaml => {
                let value: serde_yaml::Value =
                    serde_yaml::from_str(text).map_err(|err| parse_error(source_name, err))?;
                if value.is_null() {
                    return Ok(None);
                }
                serde_yaml::from_value(value)
                    .map(Some)
                    .map_err(|err| parse_error(source_name, err))
            }
            SchemaFormat::Json => {
                serde_json::from_str(text).map_err(|err| parse_error(source_name, err))
            }
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Option<Schema>> {
        Self::parse(text, SchemaFormat::Yaml, "<inline>")
    }

    pub fn from_json_str(text: &str) -> Result<Option<Schema>> {
        Self::parse(text, SchemaFormat::Json, "<inline>")
    }

    /// Load a schema file, choosing the decoder by extension.
    ///
    /// A missing file is `Ok(None)`, like an empty one.
    pub fn from_path(path: &Path) -> Result<Option<Schema>> {
        let format = SchemaFormat::from_path(path).ok_or_else(|| {
            SchemaError::LoadFailed(format!("unrecognized schema extension: {}", path.display()))
        })?;

        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "schema file not found");
                return Ok(None);
            }
            Err(err) => {
                return Err(SchemaError::LoadFailed(format!(
                    "failed opening schema {}: {err}",
                    path.display()
                )))
            }
        };

        let content = read_schema_file(file, path, DEFAULT_MAX_SCHEMA_FILE_SIZE)?;
        Self::parse(&content, format, &path.display().to_string())
    }
}

/// Read an opened schema file, refusing anything over `max_bytes`.
pub(crate) fn read_schema_file(file: File, path: &Path, max_bytes: usize) -> Result<String> {
    let metadata = file
        .metadata()
        .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;
    if metadata.len() > max_bytes as u64 {
        return Err(SchemaError::LoadFailed(format!(
            "schema file too large ({} bytes): {}",
            metadata.len(),
            path.display()
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
            "schema file too large while reading: {}",
            path.display()
        )));
    }

    Ok(content)
}

fn parse_error(source_name: &str, err: impl std::fmt::Display) -> SchemaError {
    SchemaError::Parse {
        source_name: source_name.to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::model::{FieldType, ROOT};

    use super::*;

    #[test]
    fn decodes_yaml_rules_in_declaration_order() {
        let schema = Schema::from_yaml_str(
            r#"
root:
  email: { required: true, type: string, pattern: "^.+@.+$" }
  status: { in: [active, closed] }
  age: { type: int, min: 0, max: 130.5, nullable: true }
  tags: { type: array, schema: tag }
tag:
  name: { type: string }
"#,
        )
        .unwrap()
        .unwrap();

        let root = schema.root().unwrap();
        let order: Vec<&str> = root.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["email", "status", "age", "tags"]);

        let email = root.get("email").unwrap();
        assert!(email.required);
        assert_eq!(email.field_type, Some(FieldType::String));
        assert!(email.pattern.as_ref().unwrap().is_match("a@b"));

        let age = root.get("age").unwrap();
        assert!(age.nullable);
        assert_eq!(age.min, Some(0.0));
        assert_eq!(age.max, Some(130.5));

        assert_eq!(root.get("status").unwrap().allowed.as_ref().unwrap().len(), 2);
        assert_eq!(root.get("tags").unwrap().schema.as_deref(), Some("tag"));
        assert!(schema.contains("tag"));
    }

    #[test]
    fn null_rules_and_nodes_carry_no_constraints() {
        let schema = Schema::from_yaml_str("root:\n  note: ~\nextra: ~\n")
            .unwrap()
            .unwrap();

        assert_eq!(schema.root().unwrap().get("note"), Some(&Default::default()));
        assert!(schema.get("extra").unwrap().is_empty());
    }

    #[test]
    fn blank_and_null_documents_are_absent() {
        assert!(Schema::from_yaml_str("").unwrap().is_none());
        assert!(Schema::from_yaml_str("   \n").unwrap().is_none());
        assert!(Schema::from_yaml_str("~").unwrap().is_none());
        assert!(Schema::from_json_str("null").unwrap().is_none());
    }

    #[test]
    fn empty_mapping_is_an_empty_schema() {
        let schema = Schema::from_yaml_str("{}").unwrap().unwrap();
        assert!(schema.is_empty());
    }

    #[test]
    fn json_schema_text_is_accepted() {
        let schema = Schema::from_json_str(
            r#"{"root":{"flag":{"type":"boolean","required":true}}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            schema.get(ROOT).unwrap().get("flag").unwrap().field_type,
            Some(FieldType::Boolean)
        );
    }

    #[test]
    fn malformed_schema_is_a_parse_error() {
        for yaml in [
            "root: [unclosed",
            "root:\n  a: { type: integer }\n",
            "root:\n  a: { requird: true }\n",
            "root:\n  a: { type: string, pattern: \"(\" }\n",
            "- not\n- a\n- mapping\n",
        ] {
            assert!(
                matches!(Schema::from_yaml_str(yaml), Err(SchemaError::Parse { .. })),
                "expected parse error for {yaml:?}"
            );
        }
    }

    #[test]
    fn duplicate_json_field_rule_is_rejected() {
        let result = Schema::from_json_str(r#"{"root":{"a":{},"a":{"required":true}}}"#);
        assert!(matches!(result, Err(SchemaError::Parse { .. })));
    }

    #[test]
    fn duplicate_json_schema_node_is_rejected() {
        let result = Schema::from_json_str(r#"{"root":{"a":{"required":true}},"root":{}}"#);
        match result {
            Err(SchemaError::Parse { message, .. }) => {
                assert!(message.contains("duplicate schema node `root`"), "{message}");
            }
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn from_path_handles_missing_and_unknown_files() {
        let dir = make_temp_dir("from-path");

        assert!(Schema::from_path(&dir.join("absent.yml")).unwrap().is_none());
        assert!(matches!(
            Schema::from_path(&dir.join("schema.toml")),
            Err(SchemaError::LoadFailed(_))
        ));

        let path = dir.join("create_user.yaml");
        std::fs::write(&path, "root:\n  name: { required: true }\n").unwrap();
        let schema = Schema::from_path(&path).unwrap().unwrap();
        assert!(schema.root().unwrap().get("name").unwrap().required);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn read_limit_is_enforced() {
        let dir = make_temp_dir("read-limit");
        let path = dir.join("big.yml");
        std::fs::write(&path, "root:\n  name: { required: true }\n").unwrap();

        let file = File::open(&path).unwrap();
        assert!(matches!(
            read_schema_file(file, &path, 8),
            Err(SchemaError::LoadFailed(_))
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    fn make_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "fieldcheck-loader-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }
}
