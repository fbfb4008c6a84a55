use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand, ValueEnum};
use fieldcheck_schema::config::DEFAULT_MAX_DEPTH;
use fieldcheck_schema::{
    document_from_json_slice, document_from_yaml_str, RegistryConfig, SchemaError, SchemaFormat,
    SchemaRegistry, ValidatorConfig,
};
use serde_json::Value;

use crate::exit::{io_error, schema_error, CliError, CliResult, DATA_INVALID};
use crate::output::{print_report, OutputFormat, ValidationReport};

pub mod check;
pub mod envinfo;
pub mod lint;
pub mod route;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a document against a single schema file.
    Check(CheckArgs),
    /// Validate a document against a route's schema in a schema directory.
    Route(RouteArgs),
    /// Report misconfigured schemas in a file or directory.
    Lint(LintArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Route(args) => route::run(args, format),
        Command::Lint(args) => lint::run(args, format),
        Command::Version(args) => version::run(args),
        Command::Envinfo(args) => envinfo::run(args, format),
    }
}

/// Decoder for the document being validated.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum InputFormat {
    Json,
    Yaml,
}

#[derive(Args, Debug)]
pub struct PolicyArgs {
    /// Maximum child-schema nesting below root.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
    /// Fail when the schema or the document is missing instead of skipping.
    #[arg(long)]
    pub strict: bool,
}

impl PolicyArgs {
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            fail_on_missing_schema: self.strict,
            fail_on_missing_document: self.strict,
            validator: ValidatorConfig {
                max_depth: self.max_depth,
            },
            ..RegistryConfig::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema file (.yml, .yaml, or .json).
    #[arg(long, short = 's', value_name = "FILE")]
    pub schema: PathBuf,
    /// Document to validate (JSON or YAML). Reads stdin when omitted or `-`.
    pub document: Option<PathBuf>,
    /// Document format. Default: by extension, JSON for stdin.
    #[arg(long, value_name = "FORMAT")]
    pub input: Option<InputFormat>,
    #[command(flatten)]
    pub validation: PolicyArgs,
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Route name; its schema is `<DIR>/<ROUTE>.yml`.
    pub route: String,
    /// Document to validate (JSON or YAML). Reads stdin when omitted or `-`.
    pub document: Option<PathBuf>,
    /// Schema directory.
    #[arg(long, value_name = "DIR", env = "FIELDCHECK_SCHEMA_DIR")]
    pub dir: PathBuf,
    /// Document format. Default: by extension, JSON for stdin.
    #[arg(long, value_name = "FORMAT")]
    pub input: Option<InputFormat>,
    #[command(flatten)]
    pub validation: PolicyArgs,
}

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Schema file or directory of schema files.
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {}

/// Read and decode the document named on the command line.
///
/// A blank document decodes to `None`, the same as an absent request body.
pub fn read_document(path: Option<&Path>, input: Option<InputFormat>) -> CliResult<Option<Value>> {
    let path = path.filter(|path| *path != Path::new("-"));
    let bytes = match path {
        Some(path) => std::fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?,
        None => {
            let mut bytes = Vec::new();
            std::io::stdin()
                .read_to_end(&mut bytes)
                .map_err(|err| io_error("failed reading stdin", err))?;
            bytes
        }
    };

    let format = input.unwrap_or_else(|| match path.and_then(SchemaFormat::from_path) {
        Some(SchemaFormat::Yaml) => InputFormat::Yaml,
        _ => InputFormat::Json,
    });

    let decoded = match format {
        InputFormat::Json => document_from_json_slice(&bytes),
        InputFormat::Yaml => {
            let text = String::from_utf8(bytes).map_err(|err| {
                CliError::new(DATA_INVALID, format!("document is not UTF-8: {err}"))
            })?;
            document_from_yaml_str(&text)
        }
    };

    decoded.map_err(|err| schema_error("failed decoding document", err))
}

/// Validate the document through `registry` and print the report.
///
/// Field violations are reported, not raised; policy failures (strict mode,
/// undecodable input) become a `CliError`.
pub fn report_validation(
    registry: &SchemaRegistry,
    route: &str,
    document: Option<&Path>,
    input: Option<InputFormat>,
    format: OutputFormat,
) -> CliResult<i32> {
    let label = document_label(document);
    let value = read_document(document, input)?;

    let result = match registry.validate_value(route, value.as_ref()) {
        Ok(outcome) => Ok(outcome),
        Err(SchemaError::InvalidField(err)) => Err(err),
        Err(err) => return Err(schema_error("validation failed", err)),
    };

    let report = ValidationReport::new(route, &label, &result);
    match &result {
        Ok(outcome) => tracing::info!(route, outcome = outcome.as_str(), "document checked"),
        Err(err) => tracing::info!(route, field = %err.field, kind = err.kind.as_str(), "document rejected"),
    }
    print_report(&report, format);
    Ok(report.exit_code())
}

/// Label used in reports for the document source.
pub fn document_label(path: Option<&Path>) -> String {
    match path {
        Some(path) if path != Path::new("-") => path.display().to_string(),
        _ => "<stdin>".to_string(),
    }
}
