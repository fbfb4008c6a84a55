use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use fieldcheck_schema::{FieldError, Outcome, SchemaIssue};
use serde::Serialize;

use crate::exit::{CONFIG_INVALID, DATA_INVALID, SUCCESS};

const VALIDATION_REPORT_SCHEMA: &str =
    "https://schemas.3leaps.dev/fieldcheck/cli/v1/validation-report.schema.json";
const LINT_REPORT_SCHEMA: &str =
    "https://schemas.3leaps.dev/fieldcheck/cli/v1/lint-report.schema.json";

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Valid,
    NoDocument,
    NoSchema,
    Invalid,
}

impl ReportStatus {
    fn as_str(self) -> &'static str {
        match self {
            ReportStatus::Valid => "valid",
            ReportStatus::NoDocument => "no_document",
            ReportStatus::NoSchema => "no_schema",
            ReportStatus::Invalid => "invalid",
        }
    }
}

impl From<Outcome> for ReportStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Valid => ReportStatus::Valid,
            Outcome::NoDocument => ReportStatus::NoDocument,
            Outcome::NoSchema => ReportStatus::NoSchema,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationReport<'a> {
    schema_id: &'static str,
    route: &'a str,
    document: &'a str,
    status: ReportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a FieldError>,
}

impl<'a> ValidationReport<'a> {
    pub fn new(route: &'a str, document: &'a str, result: &'a Result<Outcome, FieldError>) -> Self {
        let (status, error) = match result {
            Ok(outcome) => (ReportStatus::from(*outcome), None),
            Err(err) => (ReportStatus::Invalid, Some(err)),
        };
        Self {
            schema_id: VALIDATION_REPORT_SCHEMA,
            route,
            document,
            status,
            error,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.status {
            ReportStatus::Invalid => DATA_INVALID,
            _ => SUCCESS,
        }
    }
}

pub fn print_report(report: &ValidationReport<'_>, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let (field, message) = report
                .error
                .map(|err| (err.field.clone(), err.message.clone()))
                .unwrap_or_default();
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ROUTE", "DOCUMENT", "STATUS", "FIELD", "MESSAGE"])
                .add_row(vec![
                    report.route.to_string(),
                    report.document.to_string(),
                    report.status.as_str().to_string(),
                    field,
                    message,
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => match report.error {
            Some(err) => println!(
                "route={} document={} status={} field={} kind={} message={}",
                report.route,
                report.document,
                report.status.as_str(),
                err.field,
                err.kind.as_str(),
                err.message
            ),
            None => println!(
                "route={} document={} status={}",
                report.route,
                report.document,
                report.status.as_str()
            ),
        },
        OutputFormat::Raw => match report.error {
            Some(err) => println!("{}", err.message),
            None => println!("{}", report.status.as_str()),
        },
    }
}

#[derive(Debug, Serialize)]
pub struct LintEntry {
    pub source: String,
    #[serde(flatten)]
    pub issue: SchemaIssue,
}

#[derive(Debug, Serialize)]
pub struct LintReport {
    schema_id: &'static str,
    issues: Vec<LintEntry>,
    overall: &'static str,
}

impl LintReport {
    pub fn new(issues: Vec<LintEntry>) -> Self {
        let overall = if issues.iter().any(|entry| entry.issue.is_error()) {
            "fail"
        } else if issues.is_empty() {
            "pass"
        } else {
            "warn"
        };
        Self {
            schema_id: LINT_REPORT_SCHEMA,
            issues,
            overall,
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.overall == "fail" {
            CONFIG_INVALID
        } else {
            SUCCESS
        }
    }
}

pub fn print_lint(report: &LintReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(report).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SOURCE", "LEVEL", "NODE", "FIELD", "MESSAGE"]);
            for entry in &report.issues {
                table.add_row(vec![
                    entry.source.clone(),
                    level_text(&entry.issue).to_string(),
                    entry.issue.node.clone(),
                    entry.issue.field.clone().unwrap_or_default(),
                    entry.issue.message.clone(),
                ]);
            }
            println!("{table}");
            println!("overall: {}", report.overall);
        }
        OutputFormat::Pretty => {
            println!("fieldcheck lint\n");
            for entry in &report.issues {
                println!(
                    "  [{:>5}] {:<24} {}",
                    level_text(&entry.issue),
                    entry.source,
                    entry.issue.message
                );
            }
            match report.overall {
                "pass" => println!("\n  Result: no issues found"),
                "warn" => println!("\n  Result: warnings only"),
                _ => println!("\n  Result: one or more schemas are misconfigured"),
            }
        }
        OutputFormat::Raw => {
            println!("{}", report.overall);
        }
    }
}

fn level_text(issue: &SchemaIssue) -> &'static str {
    if issue.is_error() {
        "ERROR"
    } else {
        "WARN"
    }
}
