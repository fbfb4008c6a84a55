use fieldcheck_schema::SchemaRegistry;

use crate::cmd::{report_validation, RouteArgs};
use crate::exit::{schema_error, CliResult};
use crate::output::OutputFormat;

pub fn run(args: RouteArgs, format: OutputFormat) -> CliResult<i32> {
    let registry =
        SchemaRegistry::from_directory_with_config(&args.dir, args.validation.registry_config())
            .map_err(|err| {
                schema_error(
                    &format!("failed loading schemas from {}", args.dir.display()),
                    err,
                )
            })?;
    tracing::debug!(
        dir = %args.dir.display(),
        routes = registry.routes().len(),
        "loaded schema directory"
    );

    report_validation(
        &registry,
        &args.route,
        args.document.as_deref(),
        args.input,
        format,
    )
}
