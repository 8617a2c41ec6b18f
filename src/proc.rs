use std::ffi::OsStr;
use std::process::Command;
use anyhow::{bail, Context, Result};

/// Runs a command to completion with inherited stdio.
///
/// The child's output goes straight to the user. A nonzero exit status
/// is an error; there are no retries and no timeout.
pub fn run_streamed<S: AsRef<OsStr>>(program: S, args: &[&str]) -> Result<()> {
    let status = Command::new(&program)
        .args(args)
        .status()
        .with_context(|| format!("Could not run {}", program.as_ref().to_string_lossy()))?;
    if !status.success() {
        bail!(
            "{} {} failed with {}",
            program.as_ref().to_string_lossy(),
            args.join(" "),
            status
        );
    }
    Ok(())
}

/// Runs a command to completion and returns its captured stdout.
///
/// A nonzero exit status is an error carrying the child's stderr.
pub fn run_captured<S: AsRef<OsStr>>(program: S, args: &[&str]) -> Result<String> {
    let output = Command::new(&program)
        .args(args)
        .output()
        .with_context(|| format!("Could not run {}", program.as_ref().to_string_lossy()))?;
    if !output.status.success() {
        bail!(
            "{} {} failed with {}: {}",
            program.as_ref().to_string_lossy(),
            args.join(" "),
            output.status,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    String::from_utf8(output.stdout).context("Command output is not valid UTF-8")
}
