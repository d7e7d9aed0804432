//! Local command execution helpers

use crate::error::BootstrapError;
use anyhow::{Context, Result};
use std::process::{Command, Output, Stdio};

/// Execute a command and capture its output.
pub fn run(program: &str, args: &[&str]) -> Result<Output> {
    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("Failed to execute command: {}", program))
}

/// Execute a command and return its trimmed stdout.
/// Fails with the child's exit code on nonzero exit.
pub fn run_captured(program: &str, args: &[&str]) -> Result<String> {
    let output = run(program, args)?;
    if !output.status.success() {
        eprint!("{}", String::from_utf8_lossy(&output.stderr));
        return Err(command_failed(program, output.status.code()).into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Execute a command with stdio inherited so the operator sees its output
/// directly. Fails with the child's exit code on nonzero exit.
pub fn run_interactive(program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .with_context(|| format!("Failed to execute command: {}", program))?;

    if !status.success() {
        return Err(command_failed(program, status.code()).into());
    }
    Ok(())
}

/// Check if a command is available on PATH.
pub fn command_exists(command: &str) -> bool {
    which::which(command).is_ok()
}

fn command_failed(program: &str, code: Option<i32>) -> BootstrapError {
    BootstrapError::CommandFailed {
        program: program.to_string(),
        // A killed child has no exit code
        code: code.unwrap_or(1),
    }
}
