//! Command execution primitives with consistent error handling.

use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Run a command in a directory and return its raw output.
///
/// Only spawn failures are errors; a non-zero exit is left to the caller.
pub fn output_in(dir: &Path, program: &str, args: &[&str], context: &str) -> Result<Output> {
    Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| {
            Error::internal_io(
                format!("Failed to run {}: {}", context, e),
                Some(context.to_string()),
            )
        })
}

/// Run a command in a directory and return trimmed stdout on success.
pub fn run_in(dir: &Path, program: &str, args: &[&str], context: &str) -> Result<String> {
    let output = output_in(dir, program, args, context)?;

    if !output.status.success() {
        return Err(Error::internal_io(
            format!("{} failed: {}", context, error_text(&output)),
            Some(context.to_string()),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Check if a command succeeds in a directory without capturing output.
pub fn succeeded_in(dir: &Path, program: &str, args: &[&str]) -> bool {
    Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Extract error text from command output.
///
/// Prefers stderr, falls back to stdout if stderr is empty.
pub fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}
