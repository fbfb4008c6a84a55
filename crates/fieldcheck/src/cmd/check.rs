use std::path::Path;

use fieldcheck_schema::{Schema, SchemaRegistry};

use crate::cmd::{report_validation, CheckArgs};
use crate::exit::{schema_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

/// Route label used when the schema file stem is not a usable route name.
const FALLBACK_ROUTE: &str = "schema";

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    if !args.schema.is_file() {
        return Err(CliError::new(
            USAGE,
            format!("schema file not found: {}", args.schema.display()),
        ));
    }

    let schema = Schema::from_path(&args.schema)
        .map_err(|err| schema_error("failed loading schema", err))?
        .unwrap_or_default();
    tracing::debug!(path = %args.schema.display(), nodes = schema.len(), "loaded schema");

    let mut registry = SchemaRegistry::with_config(args.validation.registry_config());
    let stem = route_for(&args.schema).unwrap_or(FALLBACK_ROUTE);
    let route = if registry.register_schema(stem, schema.clone()).is_ok() {
        stem
    } else {
        registry
            .register_schema(FALLBACK_ROUTE, schema)
            .map_err(|err| schema_error("failed registering schema", err))?;
        FALLBACK_ROUTE
    };

    report_validation(
        &registry,
        route,
        args.document.as_deref(),
        args.input,
        format,
    )
}

fn route_for(path: &Path) -> Option<&str> {
    path.file_stem()?.to_str()
}
