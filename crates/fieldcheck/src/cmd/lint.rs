use fieldcheck_schema::{Schema, SchemaRegistry};

use crate::cmd::LintArgs;
use crate::exit::{io_error, schema_error, CliResult};
use crate::output::{print_lint, LintEntry, LintReport, OutputFormat};

pub fn run(args: LintArgs, format: OutputFormat) -> CliResult<i32> {
    let metadata = std::fs::metadata(&args.path)
        .map_err(|err| io_error(&format!("failed reading {}", args.path.display()), err))?;

    let entries: Vec<LintEntry> = if metadata.is_dir() {
        let registry = SchemaRegistry::from_directory(&args.path)
            .map_err(|err| schema_error("failed loading schemas", err))?;
        registry
            .routes()
            .into_iter()
            .filter_map(|route| registry.get(route).map(|schema| lint_entries(route, schema)))
            .flatten()
            .collect()
    } else {
        let schema = Schema::from_path(&args.path)
            .map_err(|err| schema_error("failed loading schema", err))?
            .unwrap_or_default();
        lint_entries(&args.path.display().to_string(), &schema)
    };

    let report = LintReport::new(entries);
    print_lint(&report, format);
    Ok(report.exit_code())
}

fn lint_entries(source: &str, schema: &Schema) -> Vec<LintEntry> {
    schema
        .lint()
        .into_iter()
        .map(|issue| {
            tracing::debug!(source, kind = ?issue.kind, "schema issue");
            LintEntry {
                source: source.to_string(),
                issue,
            }
        })
        .collect()
}
