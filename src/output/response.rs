//! CLI response formatting and output.
//!
//! Success prints one summary line, or the JSON envelope under `--json`.
//! Failures print a one-line diagnostic on stderr, or the envelope.

use pkgshift::error::Hint;
use pkgshift::{Error, ErrorCode, Result};
use serde::Serialize;

/// One-line, human-readable description of a finished pass.
pub trait Summary {
    fn summary(&self) -> String;

    /// Per-entry failures, one line each. Always printed to stderr.
    fn failures(&self) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Serialize)]
pub struct CliResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<CliError>,
}

#[derive(Debug, Serialize)]
pub struct CliError {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hints: Option<Vec<Hint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retryable: Option<bool>,
}

impl<T: Serialize> CliResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize response".to_string()))
        })
    }
}

impl CliResponse<()> {
    pub fn from_error(err: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(CliError {
                code: err.code.as_str().to_string(),
                message: err.message.clone(),
                details: err.details.clone(),
                hints: if err.hints.is_empty() {
                    None
                } else {
                    Some(err.hints.clone())
                },
                retryable: err.retryable,
            }),
        }
    }
}

fn print_response<T: Serialize>(response: &CliResponse<T>) -> Result<()> {
    use std::io::{self, Write};

    let payload = response.to_json()?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", payload) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            return Ok(()); // Exit gracefully on SIGPIPE
        }
        return Err(Error::internal_io(
            e.to_string(),
            Some("write stdout".to_string()),
        ));
    }
    Ok(())
}

/// Print a command result and return the process exit code.
pub fn emit<T: Serialize + Summary>(result: Result<(T, i32)>, json: bool) -> i32 {
    match result {
        Ok((data, exit_code)) => {
            for line in data.failures() {
                eprintln!("pkgshift: {}", line);
            }
            if json {
                if let Err(err) = print_response(&CliResponse::success(data)) {
                    print_diagnostic(&err);
                    return exit_code_for_error(err.code);
                }
            } else {
                println!("{}", data.summary());
            }
            exit_code
        }
        Err(err) => {
            if json {
                // Envelope failures fall back to stderr.
                if print_response(&CliResponse::<()>::from_error(&err)).is_err() {
                    print_diagnostic(&err);
                }
            } else {
                print_diagnostic(&err);
            }
            exit_code_for_error(err.code)
        }
    }
}

fn print_diagnostic(err: &Error) {
    match err.hints.first() {
        Some(hint) => eprintln!(
            "pkgshift: {} [{}] (hint: {})",
            err.message,
            err.code.as_str(),
            hint.message
        ),
        None => eprintln!("pkgshift: {} [{}]", err.message, err.code.as_str()),
    }
}

pub fn exit_code_for_error(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::ConfigMissingKey
        | ErrorCode::ConfigInvalidJson
        | ErrorCode::ConfigInvalidValue
        | ErrorCode::ValidationInvalidArgument => 2,

        ErrorCode::ArtifactMissing | ErrorCode::ArtifactEmpty => 3,

        ErrorCode::GitCommandFailed => 20,

        ErrorCode::InternalIoError
        | ErrorCode::InternalJsonError
        | ErrorCode::InternalUnexpected => 1,

        // Recoverable per-entry codes that still reached the top level.
        recoverable if recoverable.is_recoverable() => 4,
        _ => 1,
    }
}
