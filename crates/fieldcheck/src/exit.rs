use std::fmt;
use std::io;

use fieldcheck_schema::SchemaError;

// Exit codes follow the sysexits-style ranges used across 3leaps CLIs.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const CONFIG_INVALID: i32 = 78;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        io::ErrorKind::InvalidData => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    let code = match &err {
        SchemaError::LoadFailed(_) | SchemaError::Parse { .. } => CONFIG_INVALID,
        SchemaError::InvalidRoute(_) => USAGE,
        SchemaError::NoSchema(_) => FAILURE,
        SchemaError::InvalidJson(_)
        | SchemaError::InvalidDocument(_)
        | SchemaError::MissingDocument(_)
        | SchemaError::InvalidField(_) => DATA_INVALID,
    };
    CliError::new(code, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use fieldcheck_schema::{FieldError, FieldErrorKind};

    use super::*;

    #[test]
    fn schema_errors_map_to_exit_codes() {
        let cases = [
            (SchemaError::LoadFailed("x".into()), CONFIG_INVALID),
            (
                SchemaError::Parse {
                    source_name: "a.yml".into(),
                    message: "bad".into(),
                },
                CONFIG_INVALID,
            ),
            (SchemaError::InvalidRoute("../x".into()), USAGE),
            (SchemaError::NoSchema("r".into()), FAILURE),
            (SchemaError::MissingDocument("r".into()), DATA_INVALID),
            (
                SchemaError::InvalidField(FieldError::new(
                    FieldErrorKind::MissingField,
                    "email",
                    "Missing email field",
                )),
                DATA_INVALID,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(schema_error("ctx", err).code, code);
        }
    }

    #[test]
    fn io_errors_map_to_exit_codes() {
        let not_found = io::Error::new(io::ErrorKind::NotFound, "gone");
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "no");
        assert_eq!(io_error("read", not_found).code, USAGE);
        assert_eq!(io_error("read", denied).code, PERMISSION_DENIED);
    }
}
