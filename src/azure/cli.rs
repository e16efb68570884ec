//! Azure CLI command execution.
//!
//! Provides utilities for running Azure CLI commands and capturing their output.

use crate::config::MAX_OUTPUT_BYTES;
use crate::error::CliError;
use colored::Colorize;
use itertools::Itertools;
use tokio::process::Command;

/// Run `program` with `args` and return its stdout.
///
/// Arguments are passed as-is, no shell is involved.
///
/// # Returns
/// * `Ok(String)` - The stdout output on success
/// * `Err(CliError::Failed)` - Non-zero exit, carrying stderr verbatim
/// * `Err` - If the command cannot be started or produces too much output
pub async fn run(program: &str, args: &[String]) -> Result<String, CliError> {
    let cmd = render_command(program, args);
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|source| {
            log::error!("Command execution failed: {}", source);
            CliError::Spawn {
                program: program.to_string(),
                source,
            }
        })?;

    if output.status.success() {
        log::debug!("Success cmd: {cmd}");
        log::debug!("Success output.stdout.len(): {}", output.stdout.len());
        log::debug!("Success output.status.code(): {:?}", output.status.code());

        if output.stdout.len() > MAX_OUTPUT_BYTES {
            return Err(CliError::TooLarge(output.stdout.len()));
        }
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        log::trace!(
            "code={code:?}, status={status}\n┎######\nstderr=\n{stderr}\n┖######",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(CliError::Failed {
            code: output.status.code(),
            stderr,
        });
    }

    let stdout = String::from_utf8(output.stdout)?;
    log::trace!("stdout={stdout}");
    Ok(stdout)
}

/// Render a command line for logs, single-quoting arguments that need it.
pub fn render_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .map(quote_arg)
        .join(" ")
}

fn quote_arg(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| !c.is_whitespace() && !matches!(c, '\'' | '"' | '$' | '`' | '\\'));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
