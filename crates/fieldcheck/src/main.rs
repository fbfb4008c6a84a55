mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "fieldcheck", version, about = "Schema-driven request body validation")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "FIELDCHECK_LOG_LEVEL",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::try_parse_from([
            "fieldcheck",
            "check",
            "--schema",
            "create_user.yml",
            "body.json",
            "--max-depth",
            "4",
        ])
        .expect("check args should parse");

        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.document.as_deref(), Some(std::path::Path::new("body.json")));
                assert_eq!(args.validation.max_depth, 4);
                assert!(!args.validation.strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn check_requires_schema() {
        let err = Cli::try_parse_from(["fieldcheck", "check", "body.json"])
            .expect_err("missing --schema should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_route_subcommand() {
        let cli = Cli::try_parse_from([
            "fieldcheck",
            "--format",
            "json",
            "route",
            "create_user",
            "--dir",
            "config/schema_validator",
            "--strict",
        ])
        .expect("route args should parse");

        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        match cli.command {
            Command::Route(args) => {
                assert_eq!(args.route, "create_user");
                assert!(args.validation.strict);
                assert!(args.document.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_lint_subcommand() {
        let cli = Cli::try_parse_from(["fieldcheck", "lint", "schemas/"])
            .expect("lint args should parse");
        assert!(matches!(cli.command, Command::Lint(_)));
    }
}
